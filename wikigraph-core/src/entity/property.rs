use std::fmt;

use serde_json::Value;

use super::{ClaimSource, EntityJson, Terms, decode_header};
use crate::{
    EntityId, EntityKind, SchemaError, json::require_keys, terms::DEFAULT_LANGUAGE,
    terms::fmt_quoted,
};

/// A Wikidata property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    entity_id: EntityId,
    raw: Value,
}

impl Property {
    const CONTEXT: &'static str = "property";

    /// Decode a property mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an object, lacks `id`,
    /// `type`, `labels`, `descriptions`, `aliases` or `claims`, or its `type`
    /// is not `property`.
    pub fn decode(json: Value) -> Result<Self, SchemaError> {
        let entity_id = decode_header(&json, EntityKind::Property, "property type")?;
        if let Some(object) = json.as_object() {
            require_keys(
                object,
                Self::CONTEXT,
                &["labels", "descriptions", "aliases", "claims"],
            )?;
        }
        Ok(Self {
            entity_id,
            raw: json,
        })
    }

    /// Property id, e.g. `P279`.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Always [`EntityKind::Property`].
    #[must_use]
    pub const fn entity_type(&self) -> EntityKind {
        EntityKind::Property
    }

    /// Semantic datatype of values for this property, e.g. `wikibase-item`.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        self.raw.get("datatype").and_then(Value::as_str)
    }

    /// Consume the property and return its source mapping.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for Property {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

impl EntityJson for Property {
    fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl ClaimSource for Property {}
impl Terms for Property {}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataProperty(label={}, id={}, description={}, aliases=",
            self.label(DEFAULT_LANGUAGE),
            self.entity_id,
            self.description(DEFAULT_LANGUAGE),
        )?;
        fmt_quoted(f, &self.aliases(DEFAULT_LANGUAGE))?;
        f.write_str(")")
    }
}
