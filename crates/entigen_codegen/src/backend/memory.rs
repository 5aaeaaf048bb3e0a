//! Executable in-memory backend.
//!
//! Instead of source text, this backend produces a grant table: every
//! operation the orchestrator asks for is recorded against its entity.
//! [`MemoryBackend::into_store`] then yields a [`MemoryStore`] that runs
//! exactly those operations, which makes it a conformance fixture for the
//! generator contract. The artifact is a manifest of the grants.

use entigen_model::{Entity, Model, Reference, SearchKey};
use entigen_storage::{Grants, MemoryStore, Operation, StoreConfig};

use crate::error::BackendResult;
use crate::generator::{Access, Generator};
use crate::output::Output;

/// Memory backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    grants: Option<Grants>,
    lookups: Vec<(String, Vec<String>)>,
}

impl MemoryBackend {
    /// Creates a memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the grants recorded so far.
    #[must_use]
    pub fn grants(&self) -> Option<&Grants> {
        self.grants.as_ref()
    }

    /// Builds a store for `model` that runs the recorded operations.
    ///
    /// `model` must be the model this backend was run over; a backend that
    /// never ran grants nothing.
    #[must_use]
    pub fn into_store(self, model: Model, config: StoreConfig) -> MemoryStore {
        let grants = self.grants.unwrap_or_else(|| Grants::new(&model));
        MemoryStore::new(model, grants, config)
    }

    fn grant(&mut self, model: &Model, entity: &Entity, operation: Operation) {
        self.grants
            .get_or_insert_with(|| Grants::new(model))
            .grant(entity.id, operation);
    }
}

impl Generator for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn extension(&self) -> &'static str {
        "grants"
    }

    fn namespaces(&mut self, model: &Model, namespace: &str, out: &mut Output) -> BackendResult<()> {
        self.grants = Some(Grants::new(model));
        self.lookups.clear();
        out.line(format!("store {namespace}"));
        Ok(())
    }

    fn declarations(&mut self, _model: &Model, entities: &[&Entity], out: &mut Output) -> BackendResult<()> {
        out.line(format!("tables {}", entities.len()));
        Ok(())
    }

    fn end_entity(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let ops = self
            .grants
            .as_ref()
            .map(|g| g.get(entity.id))
            .unwrap_or_default();
        let keys = self
            .lookups
            .iter()
            .find(|(name, _)| *name == entity.name)
            .map(|(_, keys)| keys.join(", "))
            .unwrap_or_default();
        let abstract_tag = if entity.is_abstract() { " (abstract)" } else { "" };
        out.line(format!("{}{abstract_tag}: {ops}", entity.name));
        if !keys.is_empty() {
            out.nested(|out| {
                out.line(format!("keys: {keys}"));
            });
        }
        Ok(())
    }

    fn create(&mut self, model: &Model, entity: &Entity, access: Access, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, access.create());
        Ok(())
    }

    fn delete(&mut self, model: &Model, entity: &Entity, access: Access, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, access.delete());
        Ok(())
    }

    fn find(&mut self, model: &Model, entity: &Entity, key: SearchKey<'_>, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, Operation::Find);
        match self.lookups.iter_mut().find(|(name, _)| *name == entity.name) {
            Some((_, keys)) => keys.push(key.name().to_string()),
            None => self
                .lookups
                .push((entity.name.clone(), vec![key.name().to_string()])),
        }
        Ok(())
    }

    fn list(&mut self, model: &Model, entity: &Entity, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, Operation::List);
        Ok(())
    }

    fn count(&mut self, model: &Model, entity: &Entity, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, Operation::Count);
        Ok(())
    }

    fn aggregate(&mut self, model: &Model, reference: &Reference, _out: &mut Output) -> BackendResult<()> {
        let target = model.entity(reference.target);
        self.grant(model, target, Operation::Aggregate);
        Ok(())
    }

    fn edit(&mut self, model: &Model, entity: &Entity, _out: &mut Output) -> BackendResult<()> {
        self.grant(model, entity, Operation::Edit);
        Ok(())
    }
}
