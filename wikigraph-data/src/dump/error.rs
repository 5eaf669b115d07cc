//! Error types produced while reading, chunking and writing dump files.

use std::{io, process::ExitStatus, string::FromUtf8Error};

use camino::Utf8PathBuf;
use thiserror::Error;
use wikigraph_core::SchemaError;

/// Errors produced by [`JsonDump`](super::JsonDump) and the dump writers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DumpError {
    /// The file name does not end in `.json`, `.json.bz2` or `.json.gz`.
    #[error("dump file name {path} must end with .json, .json.bz2 or .json.gz")]
    UnsupportedFileName {
        /// The rejected path.
        path: Utf8PathBuf,
    },
    /// The dump file could not be opened.
    #[error("failed to open dump {path}: {source}")]
    Open {
        /// Dump path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Reading or decompressing a line failed.
    #[error("failed to read {path} at line {line}: {source}")]
    ReadLine {
        /// Dump path.
        path: Utf8PathBuf,
        /// 1-based line number.
        line: usize,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// A line was not valid UTF-8.
    #[error("line {line} of {path} is not valid UTF-8")]
    InvalidUtf8 {
        /// Dump path.
        path: Utf8PathBuf,
        /// 1-based line number.
        line: usize,
        /// Decoding failure.
        #[source]
        source: FromUtf8Error,
    },
    /// A line was not valid JSON.
    #[error("line {line} of {path} is not valid JSON: {source}")]
    ParseLine {
        /// Dump path.
        path: Utf8PathBuf,
        /// 1-based line number.
        line: usize,
        /// Parser failure.
        #[source]
        source: simd_json::Error,
    },
    /// A line held JSON that is not a valid entity.
    #[error("line {line} of {path} is not a valid entity: {source}")]
    Decode {
        /// Dump path.
        path: Utf8PathBuf,
        /// 1-based line number.
        line: usize,
        /// Schema failure.
        #[source]
        source: SchemaError,
    },
    /// An output file could not be created.
    #[error("failed to create {path}: {source}")]
    CreateChunk {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing, flushing or renaming an output file failed.
    #[error("failed to write {path}: {source}")]
    WriteChunk {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The external compressor could not be started.
    #[error("failed to start compressor {program}: {source}")]
    SpawnCompressor {
        /// Program name or path.
        program: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The external compressor exited unsuccessfully.
    #[error("{program} failed to compress {path} ({status}): {stderr}")]
    Compress {
        /// Program name or path.
        program: String,
        /// The chunk that was being compressed.
        path: Utf8PathBuf,
        /// Exit status reported by the process.
        status: ExitStatus,
        /// Captured standard error, lossily decoded.
        stderr: String,
    },
    /// `lines_per_chunk` was zero.
    #[error("lines per chunk must be at least 1")]
    InvalidChunkSize,
}
