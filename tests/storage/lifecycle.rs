//! Integration tests for create and delete
//!
//! Tests id assignment, parent-first writes, delete delegation, and
//! rollback on failure.

use entigen_foundation::Value;
use entigen_storage::{Grants, MemoryStore, Operation, StoreConfig, StoreError};

use crate::{GARAGE, garage, garage_with, owner, sedan, truck};

// =============================================================================
// Create
// =============================================================================

#[test]
fn ids_are_shared_across_the_whole_chain() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let a = sedan(&mut store, "AAA-1", sam);
    let b = truck(&mut store, "BBB-2", sam);

    assert_eq!((sam, a, b), (1, 2, 3));
    assert_eq!(store.count("Vehicle"), Ok(2));
    assert_eq!(store.count("Car"), Ok(1));
    assert_eq!(store.count("Sedan"), Ok(1));
    assert_eq!(store.count("Truck"), Ok(1));
}

#[test]
fn first_id_is_configurable() {
    let mut store = garage_with(StoreConfig::new().with_first_id(100));
    assert_eq!(owner(&mut store, "Sam"), 100);
    assert_eq!(owner(&mut store, "Kim"), 101);
}

#[test]
fn discriminators_are_written_at_every_level() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let id = sedan(&mut store, "AAA-1", sam);

    let found = store.find_by_id("Vehicle", id).expect("find").expect("present");
    assert_eq!(found.entity(), "Sedan");
    // VehicleKind: Car = 0, Truck = 1; CarKind: Coupe = 0, Sedan = 1.
    assert_eq!(found.get("VehicleKind"), Some(&Value::UInt(0)));
    assert_eq!(found.get("CarKind"), Some(&Value::UInt(1)));
    let layout: Vec<&str> = found.fields().map(|(name, _)| name).collect();
    assert_eq!(
        layout,
        ["VehicleKind", "plate", "fuel", "OwnerID", "CarKind", "doors", "trunk"]
    );
}

#[test]
fn unsupplied_fields_get_zero_values() {
    let mut store = garage();
    let id = store
        .create("Coupe", &[("plate", Value::from("ZZZ-9"))])
        .expect("coupe");
    let coupe = store.find_by_id("Coupe", id).expect("find").expect("present");
    assert_eq!(coupe.get("fuel"), Some(&Value::UInt(0)));
    assert_eq!(coupe.get("OwnerID"), Some(&Value::UInt(0)));
    assert_eq!(coupe.get("doors"), Some(&Value::UInt(0)));
}

#[test]
fn abstract_entities_cannot_be_created() {
    let mut store = garage();
    let err = store.create("Car", &[]).unwrap_err();
    assert_eq!(
        err,
        StoreError::AbstractEntity {
            entity: "Car".into(),
            operation: Operation::Create,
        }
    );
}

#[test]
fn discriminator_cannot_be_supplied() {
    let mut store = garage();
    let err = store
        .create("Truck", &[("VehicleKind", Value::UInt(0))])
        .unwrap_err();
    assert!(matches!(err, StoreError::InternalField { ref field, .. } if field == "VehicleKind"));
}

#[test]
fn failed_create_writes_nothing_and_keeps_ids() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    sedan(&mut store, "AAA-1", sam);

    let err = store
        .create("Truck", &[("plate", Value::from("AAA-1"))])
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
    let err = store
        .create("Truck", &[("axles", Value::Int(2))])
        .unwrap_err();
    assert!(matches!(err, StoreError::TypeMismatch { found: "int", .. }));

    assert_eq!(store.count("Vehicle"), Ok(1));
    assert_eq!(truck(&mut store, "CCC-3", sam), 3);
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn delete_removes_every_level() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let id = sedan(&mut store, "AAA-1", sam);

    assert_eq!(store.delete("Sedan", id), Ok(true));
    assert_eq!(store.count("Vehicle"), Ok(0));
    assert_eq!(store.count("Car"), Ok(0));
    assert_eq!(store.find_by_id("Vehicle", id), Ok(None));
    assert_eq!(store.delete("Sedan", id), Ok(false));
}

#[test]
fn delete_of_other_entity_id_is_false() {
    let mut store = garage();
    let sam = owner(&mut store, "Sam");
    let id = truck(&mut store, "BBB-2", sam);
    assert_eq!(store.delete("Sedan", id), Ok(false));
    assert_eq!(store.delete("Sedan", 0), Ok(false));
    assert_eq!(store.count("Truck"), Ok(1));
}

#[test]
fn delete_requires_inherited_delete_on_every_ancestor() {
    let model = entigen_model::compile("garage", GARAGE).expect("compile");
    let standard = Grants::standard(&model);
    let car = model.entity_by_name("Car").expect("Car").id;
    let mut grants = Grants::new(&model);
    for entity in model.entities() {
        let mut ops = standard.get(entity.id);
        if entity.id == car {
            ops.remove(Operation::InheritedDelete.bits());
        }
        grants.grant(entity.id, ops);
    }
    let mut store = MemoryStore::new(model, grants, StoreConfig::default());

    let sam = owner(&mut store, "Sam");
    let id = sedan(&mut store, "AAA-1", sam);
    let err = store.delete("Sedan", id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotGranted { operation: Operation::InheritedDelete, .. }
    ));
    assert_eq!(store.count("Sedan"), Ok(1));
    assert_eq!(store.count("Vehicle"), Ok(1));
}
