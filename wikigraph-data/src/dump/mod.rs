//! Streaming reader and writers for Wikidata JSON dump files.
//!
//! A dump is a single JSON array with one entity per line, optionally
//! compressed with bzip2 or gzip. [`JsonDump`] reads it lazily,
//! [`JsonDump::create_chunks`] splits it into smaller files and
//! [`write_entities`] writes a selection back out in the same layout.

mod chunk;
mod compress;
mod error;
mod reader;
mod types;
mod writer;

pub use chunk::chunk_path;
pub use compress::Compressor;
pub use error::DumpError;
pub use reader::{DumpEntities, DumpLine, DumpLines, DumpValues, JsonDump};
pub use types::{ChunkFormat, ChunkOptions, Compression, DEFAULT_LINES_PER_CHUNK};
pub use writer::write_entities;

#[cfg(test)]
mod tests;
