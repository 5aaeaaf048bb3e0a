//! Integration tests for the orchestrator
//!
//! Drives a small custom backend through the generator contract and checks
//! call order, call sets, and failure handling.

use entigen_codegen::{
    Access, BackendError, BackendResult, Generator, GeneratorConfig, Orchestrator, Output, plan,
};
use entigen_model::{Entity, Model, Reference, SearchKey};
use entigen_storage::Operation;

/// Emits one line per call. Refuses to generate edits for entities
/// holding a bytes field.
#[derive(Default)]
struct Ledger {
    declared: Vec<String>,
}

impl Ledger {
    fn emit(out: &mut Output, entity: &Entity, what: impl AsRef<str>) -> BackendResult<()> {
        out.line(format!("{}.{}", entity.name, what.as_ref()));
        Ok(())
    }
}

impl Generator for Ledger {
    fn name(&self) -> &'static str {
        "ledger"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn namespaces(&mut self, _model: &Model, namespace: &str, out: &mut Output) -> BackendResult<()> {
        out.line(format!("ns {namespace}"));
        Ok(())
    }

    fn declarations(&mut self, _model: &Model, entities: &[&Entity], _out: &mut Output) -> BackendResult<()> {
        self.declared = entities.iter().map(|e| e.name.clone()).collect();
        Ok(())
    }

    fn create(&mut self, _model: &Model, entity: &Entity, access: Access, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, entity, access.create().name())
    }

    fn delete(&mut self, _model: &Model, entity: &Entity, access: Access, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, entity, access.delete().name())
    }

    fn find(&mut self, _model: &Model, entity: &Entity, key: SearchKey<'_>, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, entity, format!("find {}", key.name()))
    }

    fn list(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, entity, "list")
    }

    fn count(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, entity, "count")
    }

    fn aggregate(&mut self, model: &Model, reference: &Reference, out: &mut Output) -> BackendResult<()> {
        Self::emit(out, model.entity(reference.target), reference.accessor_name())
    }

    fn edit(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let bytes = model
            .flattened_fields(entity)
            .into_iter()
            .find(|f| f.decl.ty.name() == "byte-sequence");
        if let Some(field) = bytes {
            return Err(BackendError::UnsupportedType {
                backend: "ledger",
                entity: entity.name.clone(),
                field: field.decl.name.clone(),
                ty: field.decl.ty.name().to_string(),
            });
        }
        Self::emit(out, entity, "edit")
    }
}

const LIBRARY: &str = "
    entity Book : Item { title: string [searchable, editable]; }
    entity Item { shelf: uint16 [editable]; }
    entity Scan : Item { image: bytes; }
    entity Loan { Item: Item; }
";

fn model() -> Model {
    entigen_model::compile("library", LIBRARY).expect("compile")
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn declarations_follow_dependency_order() {
    let model = model();
    let mut ledger = Ledger::default();
    Orchestrator::new(&model, GeneratorConfig::new().with_continue_on_error(true))
        .run(&mut ledger)
        .expect("run");
    assert_eq!(ledger.declared, ["Item", "Book", "Scan", "Loan"]);
}

#[test]
fn abstract_and_concrete_call_sets() {
    let model = model();
    let item = model.entity_by_name("Item").expect("Item");
    let ops: Vec<Operation> = plan(&model, item).iter().map(|c| c.operation()).collect();
    assert_eq!(
        ops,
        [
            Operation::InheritedCreate,
            Operation::InheritedDelete,
            Operation::Find,
            Operation::Count,
            Operation::Aggregate,
            Operation::Edit,
        ]
    );

    let loan = model.entity_by_name("Loan").expect("Loan");
    let ops: Vec<Operation> = plan(&model, loan).iter().map(|c| c.operation()).collect();
    assert_eq!(
        ops,
        [
            Operation::Create,
            Operation::Delete,
            Operation::Find,
            Operation::List,
            Operation::Count,
        ]
    );
}

#[test]
fn failures_abort_by_default() {
    let model = model();
    let err = Orchestrator::new(&model, GeneratorConfig::new())
        .run(&mut Ledger::default())
        .unwrap_err();
    assert!(matches!(err, BackendError::UnsupportedType { ref entity, .. } if entity == "Scan"));
}

#[test]
fn keep_going_collects_failures_and_finishes() {
    let model = model();
    let report = Orchestrator::new(&model, GeneratorConfig::new().with_continue_on_error(true))
        .run(&mut Ledger::default())
        .expect("run");

    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].to_string(),
        "Scan (edit): ledger cannot express Scan.image of type byte-sequence"
    );
    assert_eq!(report.artifact.name, "library.txt");
    assert_eq!(
        lines(&report.artifact.contents),
        [
            "ns library",
            "Item.inherited create",
            "Item.inherited delete",
            "Item.find ID",
            "Item.count",
            "Item.GetLoansOfItem",
            "Item.edit",
            "Book.create",
            "Book.delete",
            "Book.find ID",
            "Book.find title",
            "Book.list",
            "Book.count",
            "Book.edit",
            "Scan.create",
            "Scan.delete",
            "Scan.find ID",
            "Scan.list",
            "Scan.count",
            "Loan.create",
            "Loan.delete",
            "Loan.find ID",
            "Loan.list",
            "Loan.count",
        ]
    );
}
