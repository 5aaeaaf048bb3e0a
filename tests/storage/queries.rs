//! Integration tests for find, list, count, and aggregate
//!
//! Tests lookups by id and by searchable field, paging, and reference
//! aggregation through abstract entities.

use entigen_foundation::Value;
use entigen_storage::{Operation, StoreConfig, StoreError};

use crate::{garage, garage_with, owner, sedan, truck};

// =============================================================================
// Find
// =============================================================================

#[test]
fn zero_id_finds_nothing() {
    let mut store = garage();
    owner(&mut store, "Sam");
    assert_eq!(store.find_by_id("Owner", 0), Ok(None));
    assert_eq!(store.find_by_id("Vehicle", 0), Ok(None));
}

#[test]
fn find_by_searchable_field_dispatches_to_concrete_entity() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let id = truck(&mut store, "BBB-2", sam);

    let found = store
        .find("Vehicle", "plate", &Value::from("BBB-2"))
        .expect("find")
        .expect("present");
    assert_eq!(found.entity(), "Truck");
    assert_eq!(found.id(), id);
    assert_eq!(found.get("fuel"), Some(&Value::UInt(4)));
}

#[test]
fn find_checks_key_and_value() {
    let store = garage();
    assert!(matches!(
        store.find("Vehicle", "fuel", &Value::UInt(0)),
        Err(StoreError::NotSearchable { .. })
    ));
    assert!(matches!(
        store.find("Vehicle", "colour", &Value::UInt(0)),
        Err(StoreError::UnknownField { .. })
    ));
    assert!(matches!(
        store.find("Owner", "name", &Value::UInt(3)),
        Err(StoreError::TypeMismatch { .. })
    ));
    assert!(matches!(
        store.find("Boat", "ID", &Value::UInt(1)),
        Err(StoreError::UnknownEntity(_))
    ));
}

#[test]
fn find_through_wrong_branch_is_none() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let id = truck(&mut store, "BBB-2", sam);
    assert_eq!(store.find_by_id("Car", id), Ok(None));
    assert_eq!(store.find_by_id("Owner", id), Ok(None));
}

// =============================================================================
// List and Count
// =============================================================================

#[test]
fn list_pages_in_id_order() {
    let mut store = garage_with(StoreConfig::new().with_page_size(2));
    let sam = owner(&mut store, "Sam");
    let ids: Vec<u64> = (0..5)
        .map(|i| sedan(&mut store, &format!("S-{i}"), sam))
        .collect();

    let page = |store: &entigen_storage::MemoryStore, n| -> Vec<u64> {
        store
            .list("Sedan", n, None)
            .expect("list")
            .iter()
            .map(entigen_storage::Instance::id)
            .collect()
    };
    assert_eq!(page(&store, 0), ids[0..2]);
    assert_eq!(page(&store, 1), ids[2..4]);
    assert_eq!(page(&store, 2), ids[4..5]);
    assert!(page(&store, 3).is_empty());
    assert_eq!(store.list("Sedan", 0, Some(10)).expect("list").len(), 5);
}

#[test]
fn abstract_entities_are_not_listed() {
    let store = garage();
    assert_eq!(
        store.list("Vehicle", 0, None),
        Err(StoreError::AbstractEntity {
            entity: "Vehicle".into(),
            operation: Operation::List,
        })
    );
}

// =============================================================================
// Aggregate
// =============================================================================

#[test]
fn aggregate_collects_every_subtype() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let kim = owner(&mut store, "Kim");
    sedan(&mut store, "S-1", sam);
    truck(&mut store, "T-1", sam);
    truck(&mut store, "T-2", kim);

    let sams = store.aggregate("Vehicle", "Owner", sam).expect("aggregate");
    let kinds: Vec<&str> = sams.iter().map(entigen_storage::Instance::entity).collect();
    assert_eq!(kinds, ["Sedan", "Truck"]);
    assert_eq!(store.aggregate("Vehicle", "Owner", kim).expect("aggregate").len(), 1);
    assert!(store.aggregate("Vehicle", "Owner", 0).expect("aggregate").is_empty());
}

#[test]
fn aggregate_needs_a_reference() {
    let store = garage();
    assert_eq!(
        store.aggregate("Car", "Owner", 1),
        Err(StoreError::UnknownReference {
            source_entity: "Car".into(),
            target: "Owner".into(),
        })
    );
}
