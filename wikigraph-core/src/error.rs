//! Error types raised while decoding Wikidata JSON.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::EntityIdError;

/// Errors raised when a JSON document does not match the Wikidata schema.
///
/// Every variant is fatal to the decode call that produced it. Soft misses
/// such as an absent language are reported as empty values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The decoder expected a JSON object.
    #[error("{context} JSON must be an object")]
    NotAnObject {
        /// Name of the record being decoded.
        context: &'static str,
    },
    /// The decoder expected a JSON array.
    #[error("{context} JSON must be an array")]
    NotAnArray {
        /// Name of the record being decoded.
        context: &'static str,
    },
    /// A required key was absent.
    #[error("{context} JSON is missing required key `{key}` (found keys: {found:?})")]
    MissingKey {
        /// Name of the record being decoded.
        context: &'static str,
        /// The absent key.
        key: String,
        /// Keys present on the object.
        found: Vec<String>,
    },
    /// A tag field held a value outside its closed set.
    #[error("unknown {field} `{value}` (expected one of {expected:?})")]
    UnknownTag {
        /// Name of the tag field.
        field: &'static str,
        /// The value found in the document.
        value: String,
        /// The values accepted for the field.
        expected: &'static [&'static str],
    },
    /// A key was present but held the wrong JSON type.
    #[error("{context} key `{key}` must be {expected}")]
    UnexpectedType {
        /// Name of the record being decoded.
        context: &'static str,
        /// The offending key.
        key: String,
        /// Description of the accepted JSON type.
        expected: &'static str,
    },
    /// Claims in a group referred to more than one property.
    #[error("claim group mixes property ids {property_ids:?}")]
    MixedPropertyIds {
        /// Distinct property ids in first-seen order.
        property_ids: Vec<String>,
    },
    /// An entity id failed validation.
    #[error("{context} carries an invalid entity id")]
    InvalidId {
        /// Name of the record being decoded.
        context: &'static str,
        /// Validation failure.
        #[source]
        source: EntityIdError,
    },
}

impl SchemaError {
    pub(crate) fn missing_key(
        context: &'static str,
        key: &str,
        object: &Map<String, Value>,
    ) -> Self {
        Self::MissingKey {
            context,
            key: key.to_owned(),
            found: object.keys().cloned().collect(),
        }
    }

    pub(crate) fn unexpected_type(context: &'static str, key: &str, expected: &'static str) -> Self {
        Self::UnexpectedType {
            context,
            key: key.to_owned(),
            expected,
        }
    }
}
