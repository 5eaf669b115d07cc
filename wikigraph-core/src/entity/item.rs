use std::fmt;

use serde_json::Value;

use super::{ClaimSource, EntityJson, Terms, decode_header};
use crate::{
    EntityId, EntityKind, SchemaError, json::require_keys, terms::DEFAULT_LANGUAGE,
    terms::fmt_quoted,
};

/// Site-name prefix used when callers do not name one.
pub const DEFAULT_SITELINK_PREFIX: &str = "enwiki";

/// A link from an item to a page on a Wikimedia site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sitelink<'a> {
    /// Site name, e.g. `enwiki`.
    pub site: &'a str,
    /// The raw sitelink mapping.
    pub raw: &'a Value,
}

impl<'a> Sitelink<'a> {
    /// Page title on the site.
    #[must_use]
    pub fn title(&self) -> &'a str {
        self.raw
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Badge item ids such as featured-article markers.
    #[must_use]
    pub fn badges(&self) -> Vec<&'a str> {
        self.raw
            .get("badges")
            .and_then(Value::as_array)
            .map(|badges| badges.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A Wikidata item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    entity_id: EntityId,
    raw: Value,
}

impl Item {
    const CONTEXT: &'static str = "item";

    /// Decode an item mapping.
    ///
    /// `claims` and `sitelinks` are optional and read as empty when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an object, lacks `id`,
    /// `type`, `labels`, `descriptions` or `aliases`, or its `type` is not
    /// `item`.
    pub fn decode(json: Value) -> Result<Self, SchemaError> {
        let entity_id = decode_header(&json, EntityKind::Item, "item type")?;
        if let Some(object) = json.as_object() {
            require_keys(object, Self::CONTEXT, &["labels", "descriptions", "aliases"])?;
        }
        Ok(Self {
            entity_id,
            raw: json,
        })
    }

    /// Item id, e.g. `Q42`.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Always [`EntityKind::Item`].
    #[must_use]
    pub const fn entity_type(&self) -> EntityKind {
        EntityKind::Item
    }

    /// Sitelinks whose site name starts with `prefix`, in document order.
    ///
    /// The prefix may name a language (`en`) or a language and site
    /// (`enwiki`).
    #[must_use]
    pub fn sitelinks(&self, prefix: &str) -> Vec<Sitelink<'_>> {
        self.raw
            .get("sitelinks")
            .and_then(Value::as_object)
            .map(|sitelinks| {
                sitelinks
                    .iter()
                    .filter(|(site, _)| site.starts_with(prefix))
                    .map(|(site, raw)| Sitelink { site, raw })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Title of the English Wikipedia page, or `""` when there is none.
    #[must_use]
    pub fn enwiki_title(&self) -> &str {
        self.raw
            .get("sitelinks")
            .and_then(|sitelinks| sitelinks.get(DEFAULT_SITELINK_PREFIX))
            .and_then(|sitelink| sitelink.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Consume the item and return its source mapping.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for Item {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

impl EntityJson for Item {
    fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl ClaimSource for Item {}
impl Terms for Item {}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataItem(label={}, id={}, description={}, aliases=",
            self.label(DEFAULT_LANGUAGE),
            self.entity_id,
            self.description(DEFAULT_LANGUAGE),
        )?;
        fmt_quoted(f, &self.aliases(DEFAULT_LANGUAGE))?;
        write!(f, ", enwiki_title={})", self.enwiki_title())
    }
}
