//! Facade crate for the wikigraph Wikidata toolkit.
//!
//! This crate re-exports the entity model and the dump tooling, and exposes
//! the remote collaborators behind the `remote` feature.

#![forbid(unsafe_code)]

pub use wikigraph_core::{
    Claim, ClaimGroup, ClaimSource, ClaimType, Datavalue, DatavalueType, Entity, EntityId,
    EntityIdError, EntityJson, EntityKind, Form, Item, Lexeme, ParsedTime, Property, PropertyMap,
    Qualifier, Rank, Reference, SchemaError, Sense, Sitelink, Snak, SnakType, Terms,
};
pub use wikigraph_data::{
    dump::{ChunkFormat, ChunkOptions, Compression, Compressor, DumpError, JsonDump, write_entities},
    filter::{ItemFilter, select_items},
};

#[cfg(feature = "remote")]
pub use wikigraph_data::remote::{
    EntitySource, HttpEntitySource, HttpSparqlEndpoint, LinkedDataError, RemoteConfig,
    RemoteError, SparqlEndpoint, SparqlError, get_entity_by_id, select_ids, subclasses_of_item,
};
