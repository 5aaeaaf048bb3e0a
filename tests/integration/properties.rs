//! End-to-end checks of the compiler's core guarantees
//!
//! Each test runs the full path from schema text to model, store, or
//! generated artifact.

use entigen::codegen::{GeneratorConfig, MemoryBackend, Orchestrator, OutlineBackend};
use entigen::foundation::{ErrorCategory, ErrorKind, ScalarType, Value};
use entigen::model::{Model, OutputType, compile};
use entigen::storage::{StoreConfig, StoreError};
use proptest::prelude::*;

fn model(source: &str) -> Model {
    match compile("props", source) {
        Ok(model) => model,
        Err(e) => panic!("unexpected compile error: {e}"),
    }
}

fn enum_values(model: &Model, name: &str) -> Vec<u64> {
    model
        .enumeration(name)
        .expect("enum")
        .variants
        .iter()
        .map(|v| v.value)
        .collect()
}

#[test]
fn enum_auto_increment() {
    let model = model("enum E { A, B, C }\nenum F { A, B = 5, C }");
    assert_eq!(enum_values(&model, "E"), [0, 1, 2]);
    assert_eq!(enum_values(&model, "F"), [0, 5, 6]);
}

#[test]
fn children_make_a_dense_kind_enum() {
    let model = model("entity P { }\nentity C1 : P { }\nentity C2 : P { }");
    assert!(model.entity_by_name("P").expect("P").is_abstract());
    let kind = model.enumeration("PKind").expect("PKind");
    let members: Vec<(&str, u64)> = kind.variants.iter().map(|v| (v.name.as_str(), v.value)).collect();
    assert_eq!(members, [("C1", 0), ("C2", 1)]);
}

#[test]
fn entity_fields_become_identifiers() {
    let model = model(
        "entity User { }
         entity Pet { owner: User; }
         entity Post { User: User; }",
    );
    let user = model.entity_by_name("User").expect("User");
    let pet = model.entity_by_name("Pet").expect("Pet");
    let owner = pet.decl_of("owner").expect("owner");
    assert_eq!(owner.name, "ownerID");
    assert_eq!(owner.ty, OutputType::Scalar(ScalarType::UInt64));

    // Warn-and-skip: `owner: User` keeps its `ownerID` column but is not
    // indexed, since only a field named after its entity is a reference.
    let referencers: Vec<&str> = model
        .references_to(user)
        .iter()
        .map(|r| r.source_name.as_str())
        .collect();
    assert_eq!(referencers, ["Post"]);
    assert_eq!(model.warnings().len(), 1);
}

#[test]
fn unique_references_get_singular_accessors() {
    let model = model(
        "entity User { }
         entity Profile { User: User [unique]; }
         entity Post { User: User; }",
    );
    let user = model.entity_by_name("User").expect("User");
    let names: Vec<String> = model.references_to(user).iter().map(|r| r.accessor_name()).collect();
    assert_eq!(names, ["GetProfileOfUser", "GetPostsOfUser"]);
}

#[test]
fn cyclic_inheritance_is_a_semantic_error() {
    let err = compile("props", "entity A : B {} entity B : A {}").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { .. }));
    assert_eq!(err.category(), ErrorCategory::Semantic);
}

#[test]
fn sub_entity_delete_runs_through_the_parent() {
    let source = "entity Animal { name: string; }\nentity Dog : Animal { age: uint8 [editable]; }";
    let model = model(source);
    let mut backend = MemoryBackend::new();
    Orchestrator::new(&model, GeneratorConfig::new())
        .run(&mut backend)
        .expect("generate");
    let mut store = backend.into_store(model, StoreConfig::default());

    let rex = store
        .create("Dog", &[("name", Value::from("Rex"))])
        .expect("create");
    assert_eq!(store.count("Animal"), Ok(1));
    assert_eq!(store.delete("Dog", rex), Ok(true));
    assert_eq!(store.count("Animal"), Ok(0));
    assert_eq!(store.count("Dog"), Ok(0));
}

#[test]
fn non_numeric_edit_fails_without_mutation() {
    let source = "entity Box { size: uint32 [editable]; }";
    let model = model(source);
    let mut backend = MemoryBackend::new();
    Orchestrator::new(&model, GeneratorConfig::new())
        .run(&mut backend)
        .expect("generate");
    let mut store = backend.into_store(model, StoreConfig::default());

    let id = store
        .create("Box", &[("size", Value::UInt(7))])
        .expect("create");
    assert_eq!(store.edit("Box", id, "size", "seven"), Ok(false));
    let stored = store.find_by_id("Box", id).expect("find").expect("present");
    assert_eq!(stored.get("size"), Some(&Value::UInt(7)));
    assert!(matches!(
        store.edit("Box", id, "ID", "3"),
        Err(StoreError::UnknownField { .. })
    ));
}

proptest! {
    #[test]
    fn generation_is_byte_identical(
        enums in 0usize..3,
        entities in 1usize..8,
        inherit in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let mut source = String::new();
        for e in 0..enums {
            source.push_str(&format!("enum En{e} {{ A, B = {}, C }}\n", e * 10 + 1));
        }
        for i in 0..entities {
            let parent = if i > 0 && inherit[i] { format!(" : Ent{}", i - 1) } else { String::new() };
            let typed = if enums > 0 { format!("k{i}: En{}; ", i % enums) } else { String::new() };
            source.push_str(&format!("entity Ent{i}{parent} {{ {typed}v{i}: int64 [searchable, editable]; }}\n"));
        }

        let run = |source: &str| {
            let model = compile("gen", source).expect("compile");
            Orchestrator::new(&model, GeneratorConfig::new())
                .run(&mut OutlineBackend::new())
                .expect("generate")
                .artifact
                .contents
        };
        prop_assert_eq!(run(&source), run(&source));
    }
}
