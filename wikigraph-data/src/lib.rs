//! Dump processing and remote access for Wikidata entities.
//!
//! [`dump`] streams, chunks and writes JSON dumps, [`filter`] selects items
//! from a dump by claim value, and `remote` (behind the `remote` feature)
//! fetches single entities and runs SPARQL queries.

#![forbid(unsafe_code)]

pub mod dump;
pub mod filter;
#[cfg(feature = "remote")]
pub mod remote;
