//! Claims (statements) with their qualifiers and references.
//!
//! Qualifiers and reference snaks are grouped by property and iterate in the
//! order given by the record's `qualifiers-order` / `snaks-order` arrays, not
//! the order of the object keys.

mod group;

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{
    PropertyMap, SchemaError, Snak,
    json::{Object, array_field, as_object, field, require_keys, str_field},
    property_map::fmt_grouped,
};

pub use group::ClaimGroup;

/// Statement rank.
///
/// Parsing is case-insensitive. Unrecognised strings are kept as
/// [`Rank::Other`] and treated as non-deprecated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rank {
    /// `preferred`
    Preferred,
    /// `normal`
    Normal,
    /// `deprecated`
    Deprecated,
    /// Any other rank string, verbatim.
    Other(String),
}

impl Rank {
    /// Interpret a rank string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("preferred") {
            Self::Preferred
        } else if raw.eq_ignore_ascii_case("normal") {
            Self::Normal
        } else if raw.eq_ignore_ascii_case("deprecated") {
            Self::Deprecated
        } else {
            Self::Other(raw.to_owned())
        }
    }

    /// The canonical rank string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preferred => "preferred",
            Self::Normal => "normal",
            Self::Deprecated => "deprecated",
            Self::Other(raw) => raw,
        }
    }

    /// Report whether this is the preferred rank.
    #[must_use]
    pub const fn is_preferred(&self) -> bool {
        matches!(self, Self::Preferred)
    }

    /// Report whether this is the deprecated rank.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a record is a bare claim or a statement that may carry references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// `claim`
    Claim,
    /// `statement`
    Statement,
}

impl ClaimType {
    const TAGS: &'static [&'static str] = &["claim", "statement"];

    /// The tag as written in claim JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Statement => "statement",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "claim" => Ok(Self::Claim),
            "statement" => Ok(Self::Statement),
            other => Err(SchemaError::UnknownTag {
                field: "claim type",
                value: other.to_owned(),
                expected: Self::TAGS,
            }),
        }
    }
}

/// A group of snaks supporting a claim.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    hash: String,
    snaks: PropertyMap<Vec<Snak>>,
}

impl Reference {
    const CONTEXT: &'static str = "reference";

    /// Decode a reference mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `hash`, `snaks` or `snaks-order` is
    /// missing, or `snaks-order` names a property absent from `snaks`.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, Self::CONTEXT)?;
        require_keys(object, Self::CONTEXT, &["hash", "snaks", "snaks-order"])?;
        let hash = str_field(object, Self::CONTEXT, "hash")?.to_owned();
        let snaks_by_property = keyed_object(object, Self::CONTEXT, "snaks")?;
        let mut snaks = PropertyMap::new();
        for property_id in order_field(object, Self::CONTEXT, "snaks-order")? {
            let group = array_field(snaks_by_property, "reference snaks", property_id)?
                .iter()
                .map(Snak::decode)
                .collect::<Result<Vec<_>, _>>()?;
            snaks.insert(property_id, group);
        }
        Ok(Self { hash, snaks })
    }

    /// Reference hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Snaks grouped by property in `snaks-order` order.
    #[must_use]
    pub const fn snaks(&self) -> &PropertyMap<Vec<Snak>> {
        &self.snaks
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WikidataReference(hash={}, snaks=", self.hash)?;
        fmt_grouped(f, &self.snaks)?;
        f.write_str(")")
    }
}

/// A snak attached to a claim that adds context such as a start date.
#[derive(Debug, Clone, PartialEq)]
pub struct Qualifier {
    hash: String,
    snak: Snak,
}

impl Qualifier {
    const CONTEXT: &'static str = "qualifier";

    /// Decode a qualifier mapping.
    ///
    /// Qualifiers must carry a datavalue; `somevalue`/`novalue` qualifiers
    /// without `datavalue` and `datatype` are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when any of `hash`, `snaktype`, `property`,
    /// `datavalue` or `datatype` is missing or the snak is malformed.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, Self::CONTEXT)?;
        require_keys(
            object,
            Self::CONTEXT,
            &["hash", "snaktype", "property", "datavalue", "datatype"],
        )?;
        let hash = str_field(object, Self::CONTEXT, "hash")?.to_owned();
        let snak = Snak::decode_object(object, Self::CONTEXT)?;
        Ok(Self { hash, snak })
    }

    /// Qualifier hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The qualifying snak.
    #[must_use]
    pub const fn snak(&self) -> &Snak {
        &self.snak
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WikidataQualifier(hash={}, snak={})", self.hash, self.snak)
    }
}

/// A claim about an entity: a main snak with rank, qualifiers and references.
///
/// The source mapping is retained so truthy subsets can be re-serialised
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    claim_id: String,
    claim_type: ClaimType,
    rank: Rank,
    mainsnak: Snak,
    qualifiers: PropertyMap<Vec<Qualifier>>,
    references: Vec<Reference>,
    raw: Value,
}

impl Claim {
    const CONTEXT: &'static str = "claim";

    /// Decode a claim mapping.
    ///
    /// Qualifiers are read only when both `qualifiers` and
    /// `qualifiers-order` are present; references are read in array order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `id`, `type`, `rank` or `mainsnak` is
    /// missing, the claim type is unknown, or a nested record is malformed.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wikigraph_core::{Claim, Rank};
    ///
    /// let claim = Claim::decode(&json!({
    ///     "id": "Q42$1",
    ///     "type": "statement",
    ///     "rank": "Preferred",
    ///     "mainsnak": {"snaktype": "somevalue", "property": "P570"},
    /// }))?;
    /// assert_eq!(claim.property_id(), "P570");
    /// assert_eq!(claim.rank(), &Rank::Preferred);
    /// assert!(claim.qualifiers().is_empty());
    /// # Ok::<(), wikigraph_core::SchemaError>(())
    /// ```
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, Self::CONTEXT)?;
        require_keys(object, Self::CONTEXT, &["id", "type", "rank", "mainsnak"])?;
        let claim_id = str_field(object, Self::CONTEXT, "id")?.to_owned();
        let claim_type: ClaimType = str_field(object, Self::CONTEXT, "type")?.parse()?;
        let rank = Rank::parse(str_field(object, Self::CONTEXT, "rank")?);
        let mainsnak = Snak::decode(field(object, Self::CONTEXT, "mainsnak")?)?;
        let qualifiers = decode_qualifiers(object)?;
        let references = match object.get("references") {
            Some(_) => array_field(object, Self::CONTEXT, "references")?
                .iter()
                .map(Reference::decode)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self {
            claim_id,
            claim_type,
            rank,
            mainsnak,
            qualifiers,
            references,
            raw: json.clone(),
        })
    }

    /// Claim id, e.g. `Q42$8f4e0b1c-...`.
    #[must_use]
    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    /// Property of the main snak.
    #[must_use]
    pub fn property_id(&self) -> &str {
        self.mainsnak.property_id()
    }

    /// Claim type tag.
    #[must_use]
    pub const fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    /// Statement rank.
    #[must_use]
    pub const fn rank(&self) -> &Rank {
        &self.rank
    }

    /// The main snak.
    #[must_use]
    pub const fn mainsnak(&self) -> &Snak {
        &self.mainsnak
    }

    /// Qualifiers grouped by property in `qualifiers-order` order.
    #[must_use]
    pub const fn qualifiers(&self) -> &PropertyMap<Vec<Qualifier>> {
        &self.qualifiers
    }

    /// References in document order.
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The source mapping this claim was decoded from.
    #[must_use]
    pub const fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataClaim(type={}, rank={}, mainsnak={}, qualifiers=",
            self.claim_type, self.rank, self.mainsnak
        )?;
        fmt_grouped(f, &self.qualifiers)?;
        f.write_str(")")
    }
}

fn decode_qualifiers(object: &Object) -> Result<PropertyMap<Vec<Qualifier>>, SchemaError> {
    let mut qualifiers = PropertyMap::new();
    if !object.contains_key("qualifiers") || !object.contains_key("qualifiers-order") {
        return Ok(qualifiers);
    }
    let by_property = keyed_object(object, Claim::CONTEXT, "qualifiers")?;
    for property_id in order_field(object, Claim::CONTEXT, "qualifiers-order")? {
        let group = array_field(by_property, "claim qualifiers", property_id)?
            .iter()
            .map(Qualifier::decode)
            .collect::<Result<Vec<_>, _>>()?;
        qualifiers.insert(property_id, group);
    }
    Ok(qualifiers)
}

fn keyed_object<'a>(
    object: &'a Object,
    context: &'static str,
    key: &str,
) -> Result<&'a Object, SchemaError> {
    field(object, context, key)?
        .as_object()
        .ok_or_else(|| SchemaError::unexpected_type(context, key, "an object"))
}

fn order_field<'a>(
    object: &'a Object,
    context: &'static str,
    key: &str,
) -> Result<Vec<&'a str>, SchemaError> {
    array_field(object, context, key)?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .ok_or_else(|| SchemaError::unexpected_type(context, key, "an array of strings"))
        })
        .collect()
}

#[cfg(test)]
mod tests;
