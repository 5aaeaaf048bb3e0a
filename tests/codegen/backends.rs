//! Integration tests for the shipped backends
//!
//! Tests the full outline listing of a small schema and the memory
//! backend's generated store.

use entigen_codegen::{GeneratorConfig, MemoryBackend, Orchestrator, OutlineBackend};
use entigen_foundation::Value;
use entigen_storage::{StoreConfig, StoreError};

const BLOG: &str = "
    entity User { name: string [searchable]; }
    entity Post { User: User; }
";

#[test]
fn outline_of_a_small_schema() {
    let model = entigen_model::compile("blog", BLOG).expect("compile");
    let report = Orchestrator::new(&model, GeneratorConfig::new().with_indent(2))
        .run(&mut OutlineBackend::new())
        .expect("generate");

    let expected = "\
namespace blog

tables
  user (ID: uint64, name: string [searchable])
  post (ID: uint64, UserID: uint64)

entity User -> user
  create(name: string) -> ID
    assign ID
    insert user
  delete(ID) -> bool
    delete user
  find_by_ID(ID: uint64) -> User?
    ID = 0 => none
    select user where ID = value
  find_by_name(name: string) -> User?
    select user where name = value
  list(page: uint32, count: uint32) -> [User]
    select user offset page * count limit count
  count() -> uint64
    count user
  GetPostsOfUser(ID: uint64) -> [Post]
    select post where UserID = ID

entity Post -> post
  create(UserID: uint64) -> ID
    assign ID
    insert post
  delete(ID) -> bool
    delete post
  find_by_ID(ID: uint64) -> Post?
    ID = 0 => none
    select post where ID = value
  list(page: uint32, count: uint32) -> [Post]
    select post offset page * count limit count
  count() -> uint64
    count post
";
    assert_eq!(report.artifact.name, "blog.outline");
    assert_eq!(report.artifact.contents, expected);
}

#[test]
fn outline_backend_is_reusable_across_models() {
    let mut backend = OutlineBackend::new();
    let first = entigen_model::compile("a", "entity Shop { }").expect("compile");
    let second = entigen_model::compile("b", "entity Cart { }").expect("compile");

    let a = Orchestrator::new(&first, GeneratorConfig::new())
        .run(&mut backend)
        .expect("first");
    let b = Orchestrator::new(&second, GeneratorConfig::new())
        .run(&mut backend)
        .expect("second");
    assert!(a.artifact.contents.contains("entity Shop -> shop"));
    assert!(b.artifact.contents.contains("entity Cart -> cart"));
    assert!(!b.artifact.contents.contains("shop"));
}

#[test]
fn memory_backend_yields_a_working_store() {
    let model = entigen_model::compile("blog", BLOG).expect("compile");
    let mut backend = MemoryBackend::new();
    let report = Orchestrator::new(&model, GeneratorConfig::new())
        .run(&mut backend)
        .expect("generate");
    assert_eq!(report.artifact.name, "blog.grants");

    let mut store = backend.into_store(model, StoreConfig::default());
    let ada = store
        .create("User", &[("name", Value::from("Ada"))])
        .expect("user");
    store
        .create("Post", &[("UserID", Value::UInt(ada))])
        .expect("post");

    let found = store
        .find("User", "name", &Value::from("Ada"))
        .expect("find")
        .expect("present");
    assert_eq!(found.id(), ada);
    assert_eq!(store.aggregate("Post", "User", ada).expect("aggregate").len(), 1);
    // Nothing on Post is editable, so no edit was generated.
    assert!(matches!(
        store.edit("Post", 2, "UserID", "1"),
        Err(StoreError::NotGranted { .. })
    ));
    // Post is never referenced, so it has no aggregate either.
    assert!(matches!(
        store.aggregate("User", "Post", 2),
        Err(StoreError::NotGranted { .. })
    ));
}
