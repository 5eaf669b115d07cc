//! JSON builders for entity records used by unit and behaviour tests.

use serde_json::{Map, Value, json};

/// A `value` snak pointing at `target`.
#[must_use]
pub fn entity_snak(property_id: &str, target: &str) -> Value {
    let numeric_id = target
        .get(1..)
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or_default();
    json!({
        "snaktype": "value",
        "property": property_id,
        "datatype": "wikibase-item",
        "datavalue": {
            "type": "wikibase-entityid",
            "value": {"entity-type": "item", "id": target, "numeric-id": numeric_id},
        },
    })
}

/// A statement whose main snak points at `target`.
#[must_use]
pub fn claim_json(claim_id: &str, property_id: &str, rank: &str, target: &str) -> Value {
    json!({
        "id": claim_id,
        "type": "statement",
        "rank": rank,
        "mainsnak": entity_snak(property_id, target),
    })
}

/// Group claim mappings by their main snak property, keeping first-seen order.
#[must_use]
pub fn claims_map(claims: Vec<Value>) -> Value {
    let mut grouped: Map<String, Value> = Map::new();
    for claim in claims {
        let property_id = claim
            .pointer("/mainsnak/property")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let slot = grouped
            .entry(property_id)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = slot {
            list.push(claim);
        }
    }
    Value::Object(grouped)
}

/// A minimal item with an English label and the supplied claims.
#[must_use]
pub fn item_json(id: &str, label: &str, claims: Vec<Value>) -> Value {
    json!({
        "type": "item",
        "id": id,
        "labels": {"en": {"language": "en", "value": label}},
        "descriptions": {},
        "aliases": {},
        "claims": claims_map(claims),
        "sitelinks": {},
    })
}
