//! Core data model for Wikidata entity JSON.
//!
//! This crate decodes the Wikidata JSON export format into typed records:
//! datavalues, snaks, claims with their qualifiers and references, claim
//! groups with truthy rank resolution, and items, properties and lexemes.
//! Decoders validate required keys and closed tag sets and keep the source
//! JSON so records can be written back out unchanged.
#![forbid(unsafe_code)]

pub mod claim;
pub mod datavalue;
pub mod entity;
mod error;
mod id;
mod json;
mod property_map;
pub mod snak;
pub mod terms;

pub use claim::{Claim, ClaimGroup, ClaimType, Qualifier, Rank, Reference};
pub use datavalue::{Datavalue, DatavalueType, ParsedTime};
pub use entity::{
    ClaimSource, DEFAULT_SITELINK_PREFIX, Entity, EntityJson, Form, Item, Lexeme, Property, Sense,
    Sitelink, Terms,
};
pub use error::SchemaError;
pub use id::{EntityId, EntityIdError, EntityKind};
pub use property_map::PropertyMap;
pub use snak::{Snak, SnakType};
pub use terms::DEFAULT_LANGUAGE;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
