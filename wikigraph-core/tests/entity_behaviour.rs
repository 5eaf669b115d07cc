//! Behaviour tests for truthy claim resolution on a decoded item.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use wikigraph_core::{ClaimGroup, ClaimSource, Item};

#[derive(Debug, Default)]
struct TruthyWorld {
    item: RefCell<Option<Value>>,
    truthy: RefCell<Option<ClaimGroup>>,
}

#[fixture]
fn world() -> TruthyWorld {
    TruthyWorld::default()
}

#[given("the Douglas Adams item")]
fn given_item(world: &TruthyWorld) {
    let json: Value =
        serde_json::from_str(include_str!("fixtures/wd_Q42.json")).expect("Q42 fixture parses");
    world.item.replace(Some(json));
}

#[given("the {property} claim pointing at {target} has rank {rank}")]
fn given_rank(world: &TruthyWorld, property: String, target: String, rank: String) {
    let mut borrowed = world.item.borrow_mut();
    let json = borrowed.as_mut().expect("item should be loaded");
    let claims = json
        .pointer_mut(&format!("/claims/{property}"))
        .and_then(Value::as_array_mut)
        .expect("property should have claims");
    let claim = claims
        .iter_mut()
        .find(|claim| {
            claim
                .pointer("/mainsnak/datavalue/value/id")
                .and_then(Value::as_str)
                == Some(target.as_str())
        })
        .expect("a claim should point at the target");
    if let Some(object) = claim.as_object_mut() {
        object.insert("rank".to_owned(), json!(rank));
    }
}

#[when("the {property} claims are resolved")]
fn when_resolved(world: &TruthyWorld, property: String) {
    let json = world
        .item
        .borrow()
        .clone()
        .expect("item should be loaded");
    let item = Item::decode(json).expect("item decodes");
    let truthy = item
        .truthy_claim_group(&property)
        .expect("claims decode");
    world.truthy.replace(Some(truthy));
}

#[then("the truthy group holds {count} claims")]
fn then_count(world: &TruthyWorld, count: usize) {
    let borrowed = world.truthy.borrow();
    let truthy = borrowed.as_ref().expect("truthy group should be recorded");
    assert_eq!(truthy.len(), count);
}

#[then("the truthy group points at {target}")]
fn then_points_at(world: &TruthyWorld, target: String) {
    let borrowed = world.truthy.borrow();
    let truthy = borrowed.as_ref().expect("truthy group should be recorded");
    assert!(
        truthy.references_entity(&target),
        "expected {target} among {:?}",
        truthy.entity_ids().collect::<Vec<_>>()
    );
}

#[then("the truthy group does not point at {target}")]
fn then_not_points_at(world: &TruthyWorld, target: String) {
    let borrowed = world.truthy.borrow();
    let truthy = borrowed.as_ref().expect("truthy group should be recorded");
    assert!(!truthy.references_entity(&target));
}

#[then("the truthy group names no property")]
fn then_no_property(world: &TruthyWorld) {
    let borrowed = world.truthy.borrow();
    let truthy = borrowed.as_ref().expect("truthy group should be recorded");
    assert_eq!(truthy.property_id(), None);
}

#[scenario(path = "tests/features/truthy_claims.feature", index = 0)]
fn normal_claims_are_truthy(world: TruthyWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/truthy_claims.feature", index = 1)]
fn preferred_claim_hides_peers(world: TruthyWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/truthy_claims.feature", index = 2)]
fn deprecated_claims_are_dropped(world: TruthyWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/truthy_claims.feature", index = 3)]
fn fully_deprecated_property(world: TruthyWorld) {
    let _ = world;
}
