//! Entity identifiers and the entity kinds they imply.

use std::{fmt, ops::Deref, str::FromStr};

use thiserror::Error;

use crate::SchemaError;

/// The three top-level record kinds found in Wikidata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    /// Items, identified by `Q` ids.
    Item,
    /// Properties, identified by `P` ids.
    Property,
    /// Lexemes, identified by `L` ids.
    Lexeme,
}

impl EntityKind {
    const TAGS: &'static [&'static str] = &["item", "property", "lexeme"];

    /// The `type` tag used for this kind in entity JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Property => "property",
            Self::Lexeme => "lexeme",
        }
    }

    /// The identifier prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Item => 'Q',
            Self::Property => 'P',
            Self::Lexeme => 'L',
        }
    }

    const fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'Q' => Some(Self::Item),
            'P' => Some(Self::Property),
            'L' => Some(Self::Lexeme),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "item" => Ok(Self::Item),
            "property" => Ok(Self::Property),
            "lexeme" => Ok(Self::Lexeme),
            other => Err(SchemaError::UnknownTag {
                field: "entity type",
                value: other.to_owned(),
                expected: Self::TAGS,
            }),
        }
    }
}

/// Errors raised when validating an [`EntityId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityIdError {
    /// The identifier was empty.
    #[error("entity id must not be empty")]
    Empty,
    /// The identifier did not start with `Q`, `P` or `L`.
    #[error("entity id `{id}` must start with one of Q, P or L")]
    UnknownPrefix {
        /// The rejected identifier.
        id: String,
    },
}

/// A validated Wikidata entity identifier such as `Q42`, `P31` or `L7`.
///
/// Only the prefix is checked; sub-entity ids like `L7-F1` are accepted and
/// report the kind of their parent lexeme.
///
/// # Examples
/// ```
/// use wikigraph_core::{EntityId, EntityKind};
///
/// let id = EntityId::parse("Q42")?;
/// assert_eq!(id.kind(), EntityKind::Item);
/// assert_eq!(id.as_str(), "Q42");
/// assert!(EntityId::parse("X1").is_err());
/// # Ok::<(), wikigraph_core::EntityIdError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct EntityId {
    raw: String,
    kind: EntityKind,
}

impl EntityId {
    /// Validate `value` and wrap it as an [`EntityId`].
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError`] when the value is empty or carries an
    /// unknown prefix.
    pub fn parse(value: impl Into<String>) -> Result<Self, EntityIdError> {
        let raw = value.into();
        let first = raw.chars().next().ok_or(EntityIdError::Empty)?;
        let kind =
            EntityKind::from_prefix(first).ok_or_else(|| EntityIdError::UnknownPrefix {
                id: raw.clone(),
            })?;
        Ok(Self { raw, kind })
    }

    /// Entity kind implied by the identifier prefix.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.raw
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Deref for EntityId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Q42", EntityKind::Item)]
    #[case("P735", EntityKind::Property)]
    #[case("L7", EntityKind::Lexeme)]
    #[case("L7-F1", EntityKind::Lexeme)]
    fn parse_reports_kind_from_prefix(#[case] raw: &str, #[case] kind: EntityKind) {
        let id = EntityId::parse(raw).expect("valid id");
        assert_eq!(id.kind(), kind);
        assert_eq!(id, raw);
    }

    #[rstest]
    #[case("")]
    #[case("X1")]
    #[case("q42")]
    fn parse_rejects_unknown_prefixes(#[case] raw: &str) {
        let err = EntityId::parse(raw).expect_err("invalid id");
        if raw.is_empty() {
            assert_eq!(err, EntityIdError::Empty);
        } else {
            assert!(matches!(err, EntityIdError::UnknownPrefix { id } if id == raw));
        }
    }

    #[rstest]
    fn entity_kind_round_trips_through_tags(
        #[values(EntityKind::Item, EntityKind::Property, EntityKind::Lexeme)] kind: EntityKind,
    ) {
        assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
    }

    #[rstest]
    fn entity_kind_rejects_unknown_tags() {
        let err = "form".parse::<EntityKind>().expect_err("unknown tag");
        assert!(matches!(err, SchemaError::UnknownTag { field: "entity type", .. }));
    }
}
