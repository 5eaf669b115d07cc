//! Tagged datavalues carried by `value` snaks.
//!
//! Each variant keeps the `value` payload exactly as it appeared in the source
//! document and offers typed accessors that return `None` instead of failing
//! when a nested field is absent.

use std::{fmt, str::FromStr, sync::LazyLock};

use geo::Coord;
use regex::Regex;
use serde_json::Value;

use crate::{
    SchemaError,
    json::{as_object, display_scalar, field, require_keys, str_field},
};

const CONTEXT: &str = "datavalue";

/// Structural type tag of a datavalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DatavalueType {
    /// `globecoordinate`
    #[cfg_attr(feature = "serde", serde(rename = "globecoordinate"))]
    GlobeCoordinate,
    /// `monolingualtext`
    #[cfg_attr(feature = "serde", serde(rename = "monolingualtext"))]
    MonolingualText,
    /// `quantity`
    Quantity,
    /// `string`
    String,
    /// `time`
    Time,
    /// `wikibase-entityid`
    #[cfg_attr(feature = "serde", serde(rename = "wikibase-entityid"))]
    WikibaseEntityId,
    /// `wikibase-unmapped-entityid`
    #[cfg_attr(feature = "serde", serde(rename = "wikibase-unmapped-entityid"))]
    WikibaseUnmappedEntityId,
}

impl DatavalueType {
    /// Every tag accepted by the decoder.
    pub const TAGS: &'static [&'static str] = &[
        "globecoordinate",
        "monolingualtext",
        "quantity",
        "string",
        "time",
        "wikibase-entityid",
        "wikibase-unmapped-entityid",
    ];

    /// The tag as written in datavalue JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GlobeCoordinate => "globecoordinate",
            Self::MonolingualText => "monolingualtext",
            Self::Quantity => "quantity",
            Self::String => "string",
            Self::Time => "time",
            Self::WikibaseEntityId => "wikibase-entityid",
            Self::WikibaseUnmappedEntityId => "wikibase-unmapped-entityid",
        }
    }
}

impl fmt::Display for DatavalueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatavalueType {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "globecoordinate" => Ok(Self::GlobeCoordinate),
            "monolingualtext" => Ok(Self::MonolingualText),
            "quantity" => Ok(Self::Quantity),
            "string" => Ok(Self::String),
            "time" => Ok(Self::Time),
            "wikibase-entityid" => Ok(Self::WikibaseEntityId),
            "wikibase-unmapped-entityid" => Ok(Self::WikibaseUnmappedEntityId),
            other => Err(SchemaError::UnknownTag {
                field: "datavalue type",
                value: other.to_owned(),
                expected: Self::TAGS,
            }),
        }
    }
}

macro_rules! raw_datavalue {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Value);

        impl $name {
            /// Borrow the raw `value` payload.
            #[must_use]
            pub const fn raw(&self) -> &Value {
                &self.0
            }

            /// Consume the wrapper and return the raw `value` payload.
            #[must_use]
            pub fn into_raw(self) -> Value {
                self.0
            }

            fn key(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }
        }
    };
}

raw_datavalue!(
    /// A position on a globe: `latitude`, `longitude`, `precision`, `globe`.
    GlobeCoordinate
);
raw_datavalue!(
    /// Text in a single language: `text` and `language`.
    MonolingualText
);
raw_datavalue!(
    /// A decimal amount with bounds and a unit URI.
    Quantity
);
raw_datavalue!(
    /// A plain string value.
    StringValue
);
raw_datavalue!(
    /// A point in time with precision and calendar model.
    Time
);
raw_datavalue!(
    /// A reference to another entity: `entity-type`, `id`, `numeric-id`.
    WikibaseEntityId
);
raw_datavalue!(
    /// A reference to an entity the repository cannot resolve.
    WikibaseUnmappedEntityId
);

impl GlobeCoordinate {
    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.key("latitude").and_then(Value::as_f64)
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.key("longitude").and_then(Value::as_f64)
    }

    /// The coordinate as `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn coord(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: self.longitude()?,
            y: self.latitude()?,
        })
    }
}

impl fmt::Display for GlobeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GlobeCoordinate(latitude={}, longitude={})",
            display_scalar(self.key("latitude")),
            display_scalar(self.key("longitude"))
        )
    }
}

impl MonolingualText {
    /// The text itself.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.key("text").and_then(Value::as_str)
    }

    /// Language code of the text.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.key("language").and_then(Value::as_str)
    }
}

impl fmt::Display for MonolingualText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MonolingualText(text={}, language={})",
            display_scalar(self.key("text")),
            display_scalar(self.key("language"))
        )
    }
}

impl Quantity {
    /// Signed decimal amount, kept as text to avoid precision loss.
    #[must_use]
    pub fn amount(&self) -> Option<&str> {
        self.key("amount").and_then(Value::as_str)
    }

    /// Unit URI, or `"1"` for unitless quantities.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.key("unit").and_then(Value::as_str)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quantity(amount={}, unit={})",
            display_scalar(self.key("amount")),
            display_scalar(self.key("unit"))
        )
    }
}

impl StringValue {
    /// The string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "String(value={})", display_scalar(Some(&self.0)))
    }
}

/// Calendar fields extracted from a Wikidata time string.
///
/// Month and day may be zero when unknown; years may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedTime {
    /// Signed year.
    pub year: i64,
    /// Month, `0` when unknown.
    pub month: u8,
    /// Day of month, `0` when unknown.
    pub day: u8,
    /// Hour.
    pub hour: u8,
    /// Minute.
    pub minute: u8,
    /// Second.
    pub second: u8,
}

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal exercised by unit tests"
)]
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<year>[+-]?[0-9]+?)-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})Z?$",
    )
    .expect("time pattern should compile")
});

impl Time {
    /// The raw time string, e.g. `+1952-03-11T00:00:00Z`.
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        self.key("time").and_then(Value::as_str)
    }

    /// Precision code from `0` (gigayear) to `14` (second).
    #[must_use]
    pub fn precision(&self) -> Option<u64> {
        self.key("precision").and_then(Value::as_u64)
    }

    /// Calendar model URI.
    #[must_use]
    pub fn calendar_model(&self) -> Option<&str> {
        self.key("calendarmodel").and_then(Value::as_str)
    }

    /// Parse the time string into calendar fields.
    ///
    /// Strings that do not match the fixed date pattern, including truncated
    /// dates, yield `None`.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wikigraph_core::Datavalue;
    ///
    /// let value = Datavalue::decode(&json!({
    ///     "type": "time",
    ///     "value": {"time": "-0044-03-15T00:00:00Z", "precision": 11},
    /// }))?;
    /// let Datavalue::Time(time) = value else { unreachable!() };
    /// let parsed = time.parse().expect("matches the pattern");
    /// assert_eq!((parsed.year, parsed.month, parsed.day), (-44, 3, 15));
    /// # Ok::<(), wikigraph_core::SchemaError>(())
    /// ```
    #[must_use]
    pub fn parse(&self) -> Option<ParsedTime> {
        parse_time_string(self.time()?)
    }
}

fn parse_time_string(text: &str) -> Option<ParsedTime> {
    let captures = TIME_PATTERN.captures(text)?;
    let part = |name: &str| captures.name(name).map(|found| found.as_str());
    Some(ParsedTime {
        year: part("year")?.parse().ok()?,
        month: part("month")?.parse().ok()?,
        day: part("day")?.parse().ok()?,
        hour: part("hour")?.parse().ok()?,
        minute: part("minute")?.parse().ok()?,
        second: part("second")?.parse().ok()?,
    })
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time(time={}, precision={})",
            display_scalar(self.key("time")),
            display_scalar(self.key("precision"))
        )
    }
}

impl WikibaseEntityId {
    /// Identifier of the referenced entity, e.g. `Q42`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.key("id").and_then(Value::as_str)
    }

    /// The `entity-type` tag of the referenced entity.
    #[must_use]
    pub fn entity_type(&self) -> Option<&str> {
        self.key("entity-type").and_then(Value::as_str)
    }
}

impl fmt::Display for WikibaseEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WikibaseEntityId(id={})", display_scalar(self.key("id")))
    }
}

impl fmt::Display for WikibaseUnmappedEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikibaseUnmappedEntityId(value={})",
            display_scalar(Some(&self.0))
        )
    }
}

/// A decoded datavalue, one variant per structural type.
#[derive(Debug, Clone, PartialEq)]
pub enum Datavalue {
    /// `globecoordinate`
    GlobeCoordinate(GlobeCoordinate),
    /// `monolingualtext`
    MonolingualText(MonolingualText),
    /// `quantity`
    Quantity(Quantity),
    /// `string`
    String(StringValue),
    /// `time`
    Time(Time),
    /// `wikibase-entityid`
    WikibaseEntityId(WikibaseEntityId),
    /// `wikibase-unmapped-entityid`
    WikibaseUnmappedEntityId(WikibaseUnmappedEntityId),
}

impl Datavalue {
    /// Decode a `{"type": ..., "value": ...}` mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an object, lacks `type`
    /// or `value`, or carries an unknown `type` tag.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wikigraph_core::{Datavalue, DatavalueType};
    ///
    /// let value = Datavalue::decode(&json!({
    ///     "type": "wikibase-entityid",
    ///     "value": {"entity-type": "item", "id": "Q5", "numeric-id": 5},
    /// }))?;
    /// assert_eq!(value.datatype(), DatavalueType::WikibaseEntityId);
    /// assert_eq!(value.entity_id(), Some("Q5"));
    /// # Ok::<(), wikigraph_core::SchemaError>(())
    /// ```
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, CONTEXT)?;
        require_keys(object, CONTEXT, &["type", "value"])?;
        let datatype: DatavalueType = str_field(object, CONTEXT, "type")?.parse()?;
        let raw = field(object, CONTEXT, "value")?.clone();
        Ok(match datatype {
            DatavalueType::GlobeCoordinate => Self::GlobeCoordinate(GlobeCoordinate(raw)),
            DatavalueType::MonolingualText => Self::MonolingualText(MonolingualText(raw)),
            DatavalueType::Quantity => Self::Quantity(Quantity(raw)),
            DatavalueType::String => Self::String(StringValue(raw)),
            DatavalueType::Time => Self::Time(Time(raw)),
            DatavalueType::WikibaseEntityId => Self::WikibaseEntityId(WikibaseEntityId(raw)),
            DatavalueType::WikibaseUnmappedEntityId => {
                Self::WikibaseUnmappedEntityId(WikibaseUnmappedEntityId(raw))
            }
        })
    }

    /// Structural type tag of this value.
    #[must_use]
    pub const fn datatype(&self) -> DatavalueType {
        match self {
            Self::GlobeCoordinate(_) => DatavalueType::GlobeCoordinate,
            Self::MonolingualText(_) => DatavalueType::MonolingualText,
            Self::Quantity(_) => DatavalueType::Quantity,
            Self::String(_) => DatavalueType::String,
            Self::Time(_) => DatavalueType::Time,
            Self::WikibaseEntityId(_) => DatavalueType::WikibaseEntityId,
            Self::WikibaseUnmappedEntityId(_) => DatavalueType::WikibaseUnmappedEntityId,
        }
    }

    /// Borrow the raw `value` payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::GlobeCoordinate(inner) => inner.raw(),
            Self::MonolingualText(inner) => inner.raw(),
            Self::Quantity(inner) => inner.raw(),
            Self::String(inner) => inner.raw(),
            Self::Time(inner) => inner.raw(),
            Self::WikibaseEntityId(inner) => inner.raw(),
            Self::WikibaseUnmappedEntityId(inner) => inner.raw(),
        }
    }

    /// Referenced entity id when this is a `wikibase-entityid` value.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Self::WikibaseEntityId(inner) => inner.id(),
            _ => None,
        }
    }
}

impl fmt::Display for Datavalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobeCoordinate(inner) => inner.fmt(f),
            Self::MonolingualText(inner) => inner.fmt(f),
            Self::Quantity(inner) => inner.fmt(f),
            Self::String(inner) => inner.fmt(f),
            Self::Time(inner) => inner.fmt(f),
            Self::WikibaseEntityId(inner) => inner.fmt(f),
            Self::WikibaseUnmappedEntityId(inner) => inner.fmt(f),
        }
    }
}
