//! Snaks: the atomic property/value assertions inside claims.

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{
    Datavalue, SchemaError,
    json::{Object, as_object, field, require_keys, str_field},
};

const CONTEXT: &str = "snak";

/// Whether a snak carries a known value, an unknown value or no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SnakType {
    /// A known value is present.
    Value,
    /// Some value exists but is unknown.
    SomeValue,
    /// No value exists.
    NoValue,
}

impl SnakType {
    const TAGS: &'static [&'static str] = &["value", "somevalue", "novalue"];

    /// The tag as written in snak JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::SomeValue => "somevalue",
            Self::NoValue => "novalue",
        }
    }
}

impl fmt::Display for SnakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnakType {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "value" => Ok(Self::Value),
            "somevalue" => Ok(Self::SomeValue),
            "novalue" => Ok(Self::NoValue),
            other => Err(SchemaError::UnknownTag {
                field: "snak type",
                value: other.to_owned(),
                expected: Self::TAGS,
            }),
        }
    }
}

/// A decoded snak.
///
/// `snak_datatype`, `value_datatype` and `datavalue` are all present when
/// the snak type is [`SnakType::Value`] and all absent otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Snak {
    snak_type: SnakType,
    property_id: String,
    snak_datatype: Option<String>,
    datavalue: Option<Datavalue>,
}

impl Snak {
    /// Decode a snak mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `snaktype` or `property` is missing, the
    /// snak type is unknown, or a `value` snak lacks `datavalue`/`datatype`.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        Self::decode_object(as_object(json, CONTEXT)?, CONTEXT)
    }

    pub(crate) fn decode_object(
        object: &Object,
        context: &'static str,
    ) -> Result<Self, SchemaError> {
        require_keys(object, context, &["snaktype", "property"])?;
        let snak_type: SnakType = str_field(object, context, "snaktype")?.parse()?;
        let property_id = str_field(object, context, "property")?.to_owned();
        let (snak_datatype, datavalue) = match snak_type {
            SnakType::Value => {
                require_keys(object, context, &["datavalue", "datatype"])?;
                let snak_datatype = str_field(object, context, "datatype")?.to_owned();
                let datavalue = Datavalue::decode(field(object, context, "datavalue")?)?;
                (Some(snak_datatype), Some(datavalue))
            }
            SnakType::SomeValue | SnakType::NoValue => (None, None),
        };
        Ok(Self {
            snak_type,
            property_id,
            snak_datatype,
            datavalue,
        })
    }

    /// Snak type tag.
    #[must_use]
    pub const fn snak_type(&self) -> SnakType {
        self.snak_type
    }

    /// Property this snak asserts, e.g. `P735`.
    #[must_use]
    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    /// Semantic datatype of the property, e.g. `wikibase-item` or `url`.
    #[must_use]
    pub fn snak_datatype(&self) -> Option<&str> {
        self.snak_datatype.as_deref()
    }

    /// Structural datatype of the datavalue, e.g. `wikibase-entityid`.
    #[must_use]
    pub fn value_datatype(&self) -> Option<&'static str> {
        self.datavalue
            .as_ref()
            .map(|value| value.datatype().as_str())
    }

    /// The datavalue, present only for `value` snaks.
    #[must_use]
    pub const fn datavalue(&self) -> Option<&Datavalue> {
        self.datavalue.as_ref()
    }
}

impl fmt::Display for Snak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataSnak(snaktype={}, property_id={}, snak_datatype={}, value_datatype={}, datavalue=",
            self.snak_type,
            self.property_id,
            self.snak_datatype().unwrap_or("None"),
            self.value_datatype().unwrap_or("None"),
        )?;
        match &self.datavalue {
            Some(value) => write!(f, "{value})"),
            None => f.write_str("None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn value_snak_records_both_datatypes() {
        let snak = Snak::decode(&json!({
            "snaktype": "value",
            "property": "P735",
            "datatype": "wikibase-item",
            "datavalue": {
                "type": "wikibase-entityid",
                "value": {"entity-type": "item", "id": "Q463035", "numeric-id": 463_035},
            },
        }))
        .expect("value snak");

        assert_eq!(snak.snak_type(), SnakType::Value);
        assert_eq!(snak.property_id(), "P735");
        assert_eq!(snak.snak_datatype(), Some("wikibase-item"));
        assert_eq!(snak.value_datatype(), Some("wikibase-entityid"));
        assert_eq!(
            snak.datavalue().and_then(Datavalue::entity_id),
            Some("Q463035")
        );
    }

    #[rstest]
    fn placeholder_snaks_carry_no_value(
        #[values("somevalue", "novalue")] snak_type: &str,
    ) {
        let snak = Snak::decode(&json!({"snaktype": snak_type, "property": "P570"}))
            .expect("placeholder snak");

        assert_eq!(snak.snak_type().as_str(), snak_type);
        assert_eq!(snak.snak_datatype(), None);
        assert_eq!(snak.value_datatype(), None);
        assert!(snak.datavalue().is_none());
    }

    #[rstest]
    #[case(json!({"property": "P1"}), "snaktype")]
    #[case(json!({"snaktype": "novalue"}), "property")]
    #[case(json!({"snaktype": "value", "property": "P1", "datatype": "string"}), "datavalue")]
    #[case(
        json!({"snaktype": "value", "property": "P1", "datavalue": {"type": "string", "value": "x"}}),
        "datatype"
    )]
    fn decode_reports_missing_keys(#[case] input: Value, #[case] missing: &str) {
        let err = Snak::decode(&input).expect_err("missing key");
        assert!(
            matches!(err, SchemaError::MissingKey { ref key, .. } if key == missing),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn decode_rejects_unknown_snak_types() {
        let err = Snak::decode(&json!({"snaktype": "maybe", "property": "P1"}))
            .expect_err("unknown snak type");
        assert!(matches!(err, SchemaError::UnknownTag { field: "snak type", .. }));
    }

    #[rstest]
    fn display_mirrors_snak_fields() {
        let snak = Snak::decode(&json!({"snaktype": "novalue", "property": "P40"}))
            .expect("novalue snak");
        assert_eq!(
            snak.to_string(),
            "WikidataSnak(snaktype=novalue, property_id=P40, snak_datatype=None, value_datatype=None, datavalue=None)"
        );
    }
}
