//! Unit tests for claim, qualifier, reference and claim-group decoding.

use super::*;
use crate::test_support::{claim_json, entity_snak};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use serde_json::json;

fn qualifier_json(property_id: &str, hash: &str, target: &str) -> Value {
    let mut qualifier = entity_snak(property_id, target);
    if let Value::Object(object) = &mut qualifier {
        object.insert("hash".to_owned(), json!(hash));
    }
    qualifier
}

#[fixture]
fn qualified_claim() -> Value {
    json!({
        "id": "Q42$1",
        "type": "statement",
        "rank": "normal",
        "mainsnak": entity_snak("P69", "Q691283"),
        "qualifiers": {
            "P1": [qualifier_json("P1", "h1", "Q10")],
            "P2": [qualifier_json("P2", "h2", "Q20"), qualifier_json("P2", "h3", "Q21")],
        },
        "qualifiers-order": ["P2", "P1"],
        "references": [
            {
                "hash": "r1",
                "snaks": {
                    "P248": [entity_snak("P248", "Q5375741")],
                    "P143": [entity_snak("P143", "Q328")],
                },
                "snaks-order": ["P143", "P248"],
            },
            {
                "hash": "r2",
                "snaks": {"P854": [{"snaktype": "novalue", "property": "P854"}]},
                "snaks-order": ["P854"],
            },
        ],
    })
}

#[rstest]
fn qualifiers_follow_qualifiers_order(qualified_claim: Value) {
    let claim = Claim::decode(&qualified_claim).expect("claim");

    assert_eq!(claim.qualifiers().keys().collect::<Vec<_>>(), ["P2", "P1"]);
    let p2 = claim.qualifiers().get("P2").expect("P2 qualifiers");
    assert_eq!(
        p2.iter().map(Qualifier::hash).collect::<Vec<_>>(),
        ["h2", "h3"]
    );
    assert!(p2.iter().all(|qualifier| qualifier.snak().property_id() == "P2"));
}

#[rstest]
fn references_keep_array_and_snaks_order(qualified_claim: Value) {
    let claim = Claim::decode(&qualified_claim).expect("claim");

    let hashes: Vec<_> = claim.references().iter().map(Reference::hash).collect();
    assert_eq!(hashes, ["r1", "r2"]);
    let first = claim.references().first().expect("first reference");
    assert_eq!(first.snaks().keys().collect::<Vec<_>>(), ["P143", "P248"]);
}

#[rstest]
fn qualifiers_without_order_are_ignored(mut qualified_claim: Value) {
    if let Value::Object(object) = &mut qualified_claim {
        object.remove("qualifiers-order");
    }
    let claim = Claim::decode(&qualified_claim).expect("claim");
    assert!(claim.qualifiers().is_empty());
}

#[rstest]
fn claim_without_references_has_none() {
    let claim = Claim::decode(&claim_json("c", "P31", "normal", "Q5")).expect("claim");
    assert!(claim.references().is_empty());
    assert_eq!(claim.claim_type(), ClaimType::Statement);
    assert_eq!(claim.property_id(), "P31");
    assert_eq!(claim.as_json(), &claim_json("c", "P31", "normal", "Q5"));
}

#[rstest]
#[case("id")]
#[case("type")]
#[case("rank")]
#[case("mainsnak")]
fn claim_requires_core_keys(#[case] missing: &str) {
    let mut input = claim_json("c", "P31", "normal", "Q5");
    if let Value::Object(object) = &mut input {
        object.remove(missing);
    }
    let err = Claim::decode(&input).expect_err("missing key");
    assert!(
        matches!(err, SchemaError::MissingKey { context: "claim", ref key, .. } if key == missing),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn claim_rejects_unknown_claim_types() {
    let mut input = claim_json("c", "P31", "normal", "Q5");
    input["type"] = json!("opinion");
    let err = Claim::decode(&input).expect_err("unknown type");
    assert!(matches!(err, SchemaError::UnknownTag { field: "claim type", .. }));
}

#[rstest]
fn reference_order_entry_must_exist_in_snaks() {
    let err = Reference::decode(&json!({
        "hash": "r",
        "snaks": {},
        "snaks-order": ["P248"],
    }))
    .expect_err("dangling order entry");
    assert!(matches!(err, SchemaError::MissingKey { context: "reference snaks", .. }));
}

#[rstest]
#[case("hash")]
#[case("datavalue")]
#[case("datatype")]
fn qualifier_requires_value_keys(#[case] missing: &str) {
    let mut input = qualifier_json("P580", "h", "Q1");
    if let Value::Object(object) = &mut input {
        object.remove(missing);
    }
    let err = Qualifier::decode(&input).expect_err("missing key");
    assert!(
        matches!(err, SchemaError::MissingKey { context: "qualifier", ref key, .. } if key == missing),
        "unexpected error {err:?}"
    );
}

#[rstest]
#[case("preferred", Rank::Preferred)]
#[case("Preferred", Rank::Preferred)]
#[case("NORMAL", Rank::Normal)]
#[case("deprecated", Rank::Deprecated)]
#[case("unknown", Rank::Other("unknown".to_owned()))]
fn rank_parsing_is_case_insensitive(#[case] raw: &str, #[case] expected: Rank) {
    assert_eq!(Rank::parse(raw), expected);
}

fn group_of(ranks: &[&str]) -> ClaimGroup {
    let claims: Vec<Value> = ranks
        .iter()
        .enumerate()
        .map(|(index, rank)| claim_json(&format!("c{index}"), "P735", rank, &format!("Q{index}")))
        .collect();
    ClaimGroup::decode(&Value::Array(claims)).expect("claim group")
}

fn truthy_ids(group: &ClaimGroup) -> Vec<String> {
    group
        .truthy()
        .iter()
        .map(|claim| claim.claim_id().to_owned())
        .collect()
}

#[rstest]
#[case(&["preferred", "normal"], &["c0"])]
#[case(&["normal", "deprecated"], &["c0"])]
#[case(&["normal", "normal"], &["c0", "c1"])]
#[case(&["deprecated", "Preferred", "preferred"], &["c1", "c2"])]
#[case(&["custom", "deprecated"], &["c0"])]
#[case(&["deprecated"], &[])]
fn truthy_selects_best_non_deprecated_rank(#[case] ranks: &[&str], #[case] expected: &[&str]) {
    let group = group_of(ranks);
    assert_eq!(truthy_ids(&group), expected);
}

#[rstest]
fn truthy_of_fully_deprecated_group_has_no_property() {
    let group = group_of(&["deprecated", "deprecated"]);
    assert_eq!(group.property_id(), Some("P735"));
    assert_eq!(group.truthy().property_id(), None);
}

#[rstest]
fn empty_group_has_no_property_id() {
    let group = ClaimGroup::decode(&json!([])).expect("empty group");
    assert!(group.is_empty());
    assert_eq!(group.property_id(), None);
}

#[rstest]
#[case(&[], 0)]
#[case(&["normal"], 1)]
#[case(&["preferred", "normal", "deprecated"], 3)]
fn group_length_counts_every_rank(#[case] ranks: &[&str], #[case] expected: usize) {
    let group = group_of(ranks);
    assert_eq!(ClaimGroup::len(&group), expected);
    assert_eq!(group.is_empty(), expected == 0);
    assert_eq!(
        [group.clone(), group.truthy()].iter().map(ClaimGroup::len).max(),
        Some(expected)
    );
}

#[rstest]
fn mixed_property_ids_are_rejected() {
    let err = ClaimGroup::decode(&json!([
        claim_json("a", "P31", "normal", "Q5"),
        claim_json("b", "P279", "normal", "Q5"),
        claim_json("c", "P31", "normal", "Q6"),
    ]))
    .expect_err("mixed ids");
    assert_eq!(
        err,
        SchemaError::MixedPropertyIds {
            property_ids: vec!["P31".to_owned(), "P279".to_owned()],
        }
    );
}

#[rstest]
fn group_decode_requires_an_array() {
    let err = ClaimGroup::decode(&json!({"P31": []})).expect_err("object input");
    assert_eq!(err, SchemaError::NotAnArray { context: "claim group" });
}

#[rstest]
fn entity_ids_skip_placeholder_snaks() {
    let group = ClaimGroup::decode(&json!([
        claim_json("a", "P106", "normal", "Q36180"),
        {
            "id": "b",
            "type": "statement",
            "rank": "normal",
            "mainsnak": {"snaktype": "somevalue", "property": "P106"},
        },
        claim_json("c", "P106", "normal", "Q82955"),
    ]))
    .expect("group");

    assert_eq!(group.entity_ids().collect::<Vec<_>>(), ["Q36180", "Q82955"]);
    assert!(group.references_entity("Q82955"));
    assert!(!group.references_entity("Q5"));
}

fn rank_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("preferred"),
        Just("normal"),
        Just("deprecated"),
        Just("Preferred"),
        Just("DEPRECATED"),
    ]
}

proptest! {
    #[test]
    fn groups_share_one_property(properties in prop::collection::vec(prop_oneof![Just("P1"), Just("P2")], 0..6)) {
        let claims: Vec<Value> = properties
            .iter()
            .enumerate()
            .map(|(index, property)| claim_json(&format!("c{index}"), property, "normal", "Q1"))
            .collect();
        let mut distinct = properties.clone();
        distinct.sort_unstable();
        distinct.dedup();

        match ClaimGroup::decode(&Value::Array(claims)) {
            Ok(group) => {
                prop_assert!(distinct.len() <= 1);
                prop_assert_eq!(group.property_id(), distinct.first().copied());
                prop_assert!(group.iter().all(|claim| Some(claim.property_id()) == group.property_id()));
            }
            Err(err) => {
                prop_assert!(distinct.len() > 1);
                let is_mixed = matches!(err, SchemaError::MixedPropertyIds { .. });
                prop_assert!(is_mixed);
            }
        }
    }

    #[test]
    fn truthy_is_an_ordered_subset(ranks in prop::collection::vec(rank_strategy(), 0..8)) {
        let group = group_of(&ranks);
        let truthy = group.truthy();
        let any_preferred = group.iter().any(|claim| claim.rank().is_preferred());

        let mut source = group.iter();
        for claim in truthy.iter() {
            prop_assert!(!claim.rank().is_deprecated());
            prop_assert_eq!(claim.rank().is_preferred(), any_preferred);
            prop_assert!(source.any(|candidate| candidate == claim));
        }
        let expected = group
            .iter()
            .filter(|claim| if any_preferred { claim.rank().is_preferred() } else { !claim.rank().is_deprecated() })
            .count();
        prop_assert_eq!(truthy.len(), expected);
    }
}
