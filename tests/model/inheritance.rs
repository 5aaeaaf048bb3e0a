//! Integration tests for inheritance linking
//!
//! Tests abstract status, discriminators, dispatch, cycles, and ordering.

use entigen_foundation::{ErrorCategory, ErrorKind};
use entigen_model::{Model, compile};

fn model(source: &str) -> Model {
    match compile("test", source) {
        Ok(model) => model,
        Err(e) => panic!("unexpected compile error: {e}"),
    }
}

fn names(model: &Model, ids: impl IntoIterator<Item = entigen_model::EntityRef>) -> Vec<String> {
    ids.into_iter().map(|id| model.entity(id).name.clone()).collect()
}

// =============================================================================
// Abstract Entities
// =============================================================================

#[test]
fn only_entities_with_children_are_abstract() {
    let model = model(
        "entity Shape { }
         entity Circle : Shape { radius: decimal; }
         entity Square : Shape { side: decimal; }
         entity Canvas { }",
    );
    let abstract_names: Vec<&str> = model
        .entities()
        .iter()
        .filter(|e| e.is_abstract())
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(abstract_names, ["Shape"]);
}

#[test]
fn three_level_chain_dispatches_to_leaves() {
    let model = model(
        "entity Vehicle { wheels: uint8; }
         entity Car : Vehicle { doors: uint8; }
         entity Truck : Vehicle { axles: uint8; }
         entity Coupe : Car { }
         entity Sedan : Car { }",
    );
    let vehicle = model.entity_by_name("Vehicle").expect("Vehicle");
    let leaves: Vec<&str> = model
        .concrete_descendants(vehicle)
        .into_iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(leaves, ["Coupe", "Sedan", "Truck"]);

    let car = model.entity_by_name("Car").expect("Car");
    assert!(car.is_abstract());
    assert_eq!(model.root(car).name, "Vehicle");
    assert_eq!(car.fields[0].name, "CarKind");
    assert_eq!(
        model.enumeration("CarKind").expect("CarKind").value_of("Sedan"),
        Some(1)
    );
    let truck = vehicle.dispatch(1).expect("Truck value");
    assert_eq!(model.entity(truck).name, "Truck");
}

#[test]
fn dependency_order_puts_parents_first() {
    let model = model(
        "entity Coupe : Car { }
         entity Tag { }
         entity Car : Vehicle { }
         entity Vehicle { }",
    );
    assert_eq!(
        names(&model, model.dependency_order()),
        ["Vehicle", "Car", "Coupe", "Tag"]
    );
}

// =============================================================================
// Inheritance Errors
// =============================================================================

#[test]
fn two_entity_cycle_is_rejected() {
    let err = compile("test", "entity A : B { }\nentity B : A { }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { line: 1, ref entity } if entity == "A"));
    assert_eq!(err.category(), ErrorCategory::Semantic);
}

#[test]
fn self_parent_is_a_cycle() {
    let err = compile("test", "entity Loop : Loop { }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { .. }));
}

#[test]
fn parent_must_be_an_entity() {
    let err = compile("test", "enum Base { A }\nentity Child : Base { }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 2: entity Child declares unknown parent 'Base'"
    );
}

#[test]
fn inherited_field_names_may_not_repeat() {
    let err = compile(
        "test",
        "entity Animal { name: string; }\nentity Dog : Animal {\n  name: string;\n}",
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateField { line: 3, ref entity, .. } if entity == "Dog"));
}
