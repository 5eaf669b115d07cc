//! Top-level entity records: items, properties and lexemes.
//!
//! Entities are immutable views over the JSON mapping they were decoded
//! from. Only required keys are checked up front; claims are decoded on each
//! accessor call so a single malformed statement does not prevent reading
//! labels or sitelinks.

mod item;
mod lexeme;
mod property;

use std::fmt;

use serde_json::Value;

use crate::{
    ClaimGroup, EntityId, EntityKind, PropertyMap, SchemaError,
    json::{Object, as_object, entity_id_field, require_keys, str_field},
    terms::{term, term_list},
};

pub use item::{DEFAULT_SITELINK_PREFIX, Item, Sitelink};
pub use lexeme::{Form, Lexeme, Sense};
pub use property::Property;

/// Access to the JSON mapping a record was decoded from.
pub trait EntityJson {
    /// Borrow the source mapping.
    fn as_json(&self) -> &Value;
}

impl EntityJson for Value {
    fn as_json(&self) -> &Value {
        self
    }
}

impl<T: EntityJson + ?Sized> EntityJson for &T {
    fn as_json(&self) -> &Value {
        (**self).as_json()
    }
}

/// Records whose JSON carries a `claims` mapping.
///
/// A `claims` value that is not an object reads as no claims.
pub trait ClaimSource: EntityJson {
    /// Every claim group keyed by property id, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when any claim fails to decode.
    fn claim_groups(&self) -> Result<PropertyMap<ClaimGroup>, SchemaError> {
        claims_object(self.as_json())
            .map(|claims| {
                claims
                    .iter()
                    .map(|(property_id, list)| {
                        ClaimGroup::decode(list).map(|group| (property_id.clone(), group))
                    })
                    .collect::<Result<PropertyMap<_>, _>>()
            })
            .unwrap_or_else(|| Ok(PropertyMap::new()))
    }

    /// The claim group for `property_id`, empty when the entity has none.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a claim in the group fails to decode.
    fn claim_group(&self, property_id: &str) -> Result<ClaimGroup, SchemaError> {
        claims_object(self.as_json())
            .and_then(|claims| claims.get(property_id))
            .map_or_else(|| Ok(ClaimGroup::empty()), ClaimGroup::decode)
    }

    /// Every truthy claim group keyed by property id.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when any claim fails to decode.
    fn truthy_claim_groups(&self) -> Result<PropertyMap<ClaimGroup>, SchemaError> {
        Ok(self
            .claim_groups()?
            .into_iter()
            .map(|(property_id, group)| (property_id, group.truthy()))
            .collect())
    }

    /// The truthy subset of the claim group for `property_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a claim in the group fails to decode.
    fn truthy_claim_group(&self, property_id: &str) -> Result<ClaimGroup, SchemaError> {
        self.claim_group(property_id).map(|group| group.truthy())
    }
}

/// Labels, descriptions and aliases shared by items and properties.
///
/// Missing languages read as `""` or an empty list.
pub trait Terms: EntityJson {
    /// Primary name in `lang`.
    fn label(&self, lang: &str) -> &str {
        term(self.as_json().get("labels"), lang)
    }

    /// Short description in `lang`.
    fn description(&self, lang: &str) -> &str {
        term(self.as_json().get("descriptions"), lang)
    }

    /// Alternative names in `lang`.
    fn aliases(&self, lang: &str) -> Vec<&str> {
        term_list(self.as_json().get("aliases"), lang)
    }
}

fn claims_object(json: &Value) -> Option<&Object> {
    json.get("claims").and_then(Value::as_object)
}

/// Validate the keys shared by every entity and check the `type` tag.
fn decode_header(
    json: &Value,
    expected: EntityKind,
    context: &'static str,
) -> Result<EntityId, SchemaError> {
    let object = as_object(json, "entity")?;
    require_keys(object, "entity", &["id", "type"])?;
    let tag = str_field(object, "entity", "type")?;
    if tag != expected.as_str() {
        return Err(SchemaError::UnknownTag {
            field: context,
            value: tag.to_owned(),
            expected: match expected {
                EntityKind::Item => &["item"],
                EntityKind::Property => &["property"],
                EntityKind::Lexeme => &["lexeme"],
            },
        });
    }
    entity_id_field(object, "entity")
}

/// A decoded entity of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// An item (`Q` id).
    Item(Item),
    /// A property (`P` id).
    Property(Property),
    /// A lexeme (`L` id).
    Lexeme(Lexeme),
}

impl Entity {
    /// Decode an entity mapping, dispatching on its `type` tag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an object, lacks `id` or
    /// `type`, names an unknown type, or is missing a key its type requires.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wikigraph_core::{ClaimSource, Entity, EntityKind};
    ///
    /// let entity = Entity::decode(json!({
    ///     "type": "item", "id": "Q1",
    ///     "labels": {}, "descriptions": {}, "aliases": {},
    /// }))?;
    /// assert_eq!(entity.kind(), EntityKind::Item);
    /// assert!(entity.claim_group("P31")?.is_empty());
    /// # Ok::<(), wikigraph_core::SchemaError>(())
    /// ```
    pub fn decode(json: Value) -> Result<Self, SchemaError> {
        let object = as_object(&json, "entity")?;
        require_keys(object, "entity", &["id", "type"])?;
        let kind: EntityKind = str_field(object, "entity", "type")?.parse()?;
        Ok(match kind {
            EntityKind::Item => Self::Item(Item::decode(json)?),
            EntityKind::Property => Self::Property(Property::decode(json)?),
            EntityKind::Lexeme => Self::Lexeme(Lexeme::decode(json)?),
        })
    }

    /// Entity id.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        match self {
            Self::Item(item) => item.entity_id(),
            Self::Property(property) => property.entity_id(),
            Self::Lexeme(lexeme) => lexeme.entity_id(),
        }
    }

    /// Entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Item(_) => EntityKind::Item,
            Self::Property(_) => EntityKind::Property,
            Self::Lexeme(_) => EntityKind::Lexeme,
        }
    }

    /// Borrow the item, if this is one.
    #[must_use]
    pub const fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Borrow the property, if this is one.
    #[must_use]
    pub const fn as_property(&self) -> Option<&Property> {
        match self {
            Self::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Borrow the lexeme, if this is one.
    #[must_use]
    pub const fn as_lexeme(&self) -> Option<&Lexeme> {
        match self {
            Self::Lexeme(lexeme) => Some(lexeme),
            _ => None,
        }
    }

    /// Consume the entity and return its source mapping.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Item(item) => item.into_json(),
            Self::Property(property) => property.into_json(),
            Self::Lexeme(lexeme) => lexeme.into_json(),
        }
    }
}

impl TryFrom<Value> for Entity {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

impl EntityJson for Entity {
    fn as_json(&self) -> &Value {
        match self {
            Self::Item(item) => item.as_json(),
            Self::Property(property) => property.as_json(),
            Self::Lexeme(lexeme) => lexeme.as_json(),
        }
    }
}

impl ClaimSource for Entity {}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(item) => item.fmt(f),
            Self::Property(property) => property.fmt(f),
            Self::Lexeme(lexeme) => lexeme.fmt(f),
        }
    }
}
