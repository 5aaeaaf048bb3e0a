//! Integration tests for field layout
//!
//! Tests output declarations and the flattened, storage, and constructor
//! field lists.

use entigen_foundation::ScalarType;
use entigen_model::{Model, OutputType, compile};

const SCHEMA: &str = "
    enum Status { Active, Banned }
    entity User { name: string [searchable]; avatar: bytes; }
    entity Account {
        User: User [unique];
        status: Status [editable];
        secret: string [internal];
        display: string [dynamic];
    }
    entity Admin : Account { level: uint8 [editable]; }
    entity Guest : Account { }
";

fn model() -> Model {
    compile("layout", SCHEMA).expect("compile")
}

fn decl_names(fields: &[&entigen_model::Field]) -> Vec<String> {
    fields.iter().map(|f| f.decl.name.clone()).collect()
}

#[test]
fn output_declarations_rewrite_entities_and_bytes() {
    let model = model();
    let user = model.entity_by_name("User").expect("User");
    assert_eq!(user.decl_of("avatar").map(|d| d.ty.name()), Some("byte-sequence"));

    let account = model.entity_by_name("Account").expect("Account");
    let reference = account.decl_of("User").expect("User field");
    assert_eq!(reference.name, "UserID");
    assert_eq!(reference.ty, OutputType::Scalar(ScalarType::IDENTIFIER));
    assert_eq!(account.decl_of("status").map(|d| d.ty.name()), Some("Status"));
}

#[test]
fn flattened_fields_put_parent_first() {
    let model = model();
    let admin = model.entity_by_name("Admin").expect("Admin");
    assert_eq!(
        decl_names(&model.flattened_fields(admin)),
        ["AccountKind", "UserID", "status", "secret", "display", "level"]
    );
}

#[test]
fn storage_fields_drop_dynamic() {
    let model = model();
    let admin = model.entity_by_name("Admin").expect("Admin");
    assert_eq!(
        decl_names(&model.storage_fields(admin)),
        ["AccountKind", "UserID", "status", "secret", "level"]
    );
}

#[test]
fn constructor_fields_drop_internal_and_dynamic() {
    let model = model();
    let guest = model.entity_by_name("Guest").expect("Guest");
    assert_eq!(
        decl_names(&model.constructor_fields(guest)),
        ["UserID", "status"]
    );
}

#[test]
fn lookup_keys_are_id_then_own_searchable_fields() {
    let model = model();
    let user = model.entity_by_name("User").expect("User");
    let search_keys = user.searchable_fields();
    let keys: Vec<&str> = search_keys.iter().map(|k| k.name()).collect();
    assert_eq!(keys, ["ID", "name"]);

    let admin = model.entity_by_name("Admin").expect("Admin");
    assert_eq!(admin.searchable_fields().len(), 1);
}
