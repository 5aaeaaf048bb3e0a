//! The backend contract.
//!
//! A [`Generator`] turns the compiled model into one artifact. The
//! [`Orchestrator`](crate::Orchestrator) calls `namespaces` and
//! `declarations` once, then the per-entity operations in dependency order,
//! and each call appends to the shared [`Output`].

use entigen_model::{Entity, Model, Reference, SearchKey};
use entigen_storage::Operation;

use crate::error::BackendResult;
use crate::output::Output;

/// Who may call a generated create or delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Callable by clients; concrete entities only.
    Public,
    /// Reachable only through a subtype's create or delete path; abstract
    /// entities only.
    Inherited,
}

impl Access {
    /// Returns the create operation for this access level.
    #[must_use]
    pub const fn create(self) -> Operation {
        match self {
            Self::Public => Operation::Create,
            Self::Inherited => Operation::InheritedCreate,
        }
    }

    /// Returns the delete operation for this access level.
    #[must_use]
    pub const fn delete(self) -> Operation {
        match self {
            Self::Public => Operation::Delete,
            Self::Inherited => Operation::InheritedDelete,
        }
    }
}

/// A pluggable code generation backend.
///
/// Implementations may keep caches scoped to their own run, but never
/// mutate the model.
pub trait Generator {
    /// Short backend name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// File extension of the artifact this backend produces.
    fn extension(&self) -> &'static str;

    /// Emits backend-wide imports under `namespace`.
    ///
    /// # Errors
    /// Returns a backend error; always fatal for the run.
    fn namespaces(&mut self, model: &Model, namespace: &str, out: &mut Output)
    -> BackendResult<()>;

    /// Emits backend-wide state for every entity, in dependency order.
    ///
    /// # Errors
    /// Returns a backend error; always fatal for the run.
    fn declarations(
        &mut self,
        model: &Model,
        entities: &[&Entity],
        out: &mut Output,
    ) -> BackendResult<()>;

    /// Called before the operations of one entity.
    ///
    /// # Errors
    /// Returns a backend error; always fatal for the run.
    fn begin_entity(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let _ = (model, entity, out);
        Ok(())
    }

    /// Called after the operations of one entity.
    ///
    /// # Errors
    /// Returns a backend error; always fatal for the run.
    fn end_entity(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let _ = (model, entity, out);
        Ok(())
    }

    /// Emits a constructor. A root entity assigns the id; a sub-entity
    /// reuses its parent's create path, passing its discriminator value.
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn create(
        &mut self,
        model: &Model,
        entity: &Entity,
        access: Access,
        out: &mut Output,
    ) -> BackendResult<()>;

    /// Emits a delete. A sub-entity delegates to its parent's delete first
    /// and reports failure without touching its own row if that fails.
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn delete(
        &mut self,
        model: &Model,
        entity: &Entity,
        access: Access,
        out: &mut Output,
    ) -> BackendResult<()>;

    /// Emits a lookup by one searchable key. A zero id yields nothing
    /// without querying; an abstract entity dispatches by discriminator.
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn find(
        &mut self,
        model: &Model,
        entity: &Entity,
        key: SearchKey<'_>,
        out: &mut Output,
    ) -> BackendResult<()>;

    /// Emits a paginated listing (`offset = page * count`).
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn list(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()>;

    /// Emits a cardinality query.
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn count(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()>;

    /// Emits the accessor for rows of `reference.source` that point at an
    /// instance of `reference.target`; single-valued when unique.
    ///
    /// # Errors
    /// Returns a backend error for the referenced entity.
    fn aggregate(
        &mut self,
        model: &Model,
        reference: &Reference,
        out: &mut Output,
    ) -> BackendResult<()>;

    /// Emits an update of one editable field from text, failing on values
    /// that do not parse.
    ///
    /// # Errors
    /// Returns a backend error for this entity.
    fn edit(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()>;

    /// Called once after every entity was generated.
    ///
    /// # Errors
    /// Returns a backend error; always fatal for the run.
    fn finish(&mut self, model: &Model, out: &mut Output) -> BackendResult<()> {
        let _ = (model, out);
        Ok(())
    }
}
