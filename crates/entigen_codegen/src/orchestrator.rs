//! Drives a [`Generator`] over a compiled model.
//!
//! Entities are visited in dependency order, so a parent is always
//! generated before its children. Each entity receives the call set its
//! kind allows: concrete entities get the public lifecycle and `list`;
//! abstract entities get only the inherited create/delete that subtypes
//! reach through, plus lookups dispatched by discriminator.

use std::fmt;

use entigen_model::{Entity, Model, Reference, SearchKey};
use entigen_storage::Operation;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{BackendError, BackendResult};
use crate::generator::{Access, Generator};
use crate::output::Output;

/// One planned backend call for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call<'m> {
    /// Constructor.
    Create(Access),
    /// Delete.
    Delete(Access),
    /// Lookup by one searchable key.
    Find(SearchKey<'m>),
    /// Paginated listing.
    List,
    /// Cardinality.
    Count,
    /// Accessor for one incoming reference.
    Aggregate(&'m Reference),
    /// Single-field update.
    Edit,
}

impl Call<'_> {
    /// Returns the operation this call generates.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Create(access) => access.create(),
            Self::Delete(access) => access.delete(),
            Self::Find(_) => Operation::Find,
            Self::List => Operation::List,
            Self::Count => Operation::Count,
            Self::Aggregate(_) => Operation::Aggregate,
            Self::Edit => Operation::Edit,
        }
    }
}

/// Returns the calls `entity` receives, in emission order.
#[must_use]
pub fn plan<'m>(model: &'m Model, entity: &'m Entity) -> Vec<Call<'m>> {
    let access = if entity.is_abstract() {
        Access::Inherited
    } else {
        Access::Public
    };

    let mut calls = vec![Call::Create(access), Call::Delete(access)];
    calls.extend(entity.searchable_fields().into_iter().map(Call::Find));
    if !entity.is_abstract() {
        calls.push(Call::List);
    }
    calls.push(Call::Count);
    calls.extend(model.references_to(entity).iter().map(Call::Aggregate));
    if model.flattened_fields(entity).iter().any(|f| f.is_editable()) {
        calls.push(Call::Edit);
    }
    calls
}

/// A named generated text artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// File name.
    pub name: String,
    /// Generated text.
    pub contents: String,
}

/// A backend error collected while continuing past failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// Entity being generated.
    pub entity: String,
    /// Operation that failed.
    pub operation: Operation,
    /// The backend's error.
    pub error: BackendError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.entity, self.operation, self.error)
    }
}

/// Outcome of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The artifact produced.
    pub artifact: Artifact,
    /// Failures collected under `continue_on_error`.
    pub failures: Vec<Failure>,
}

impl Report {
    /// Returns true if every call succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs backends over one model.
#[derive(Clone, Debug)]
pub struct Orchestrator<'m> {
    model: &'m Model,
    config: GeneratorConfig,
}

impl<'m> Orchestrator<'m> {
    /// Creates an orchestrator for `model`.
    #[must_use]
    pub fn new(model: &'m Model, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one artifact with `generator`.
    ///
    /// # Errors
    /// Returns the first backend error, unless `continue_on_error` is set,
    /// in which case per-entity failures are collected in the report.
    /// Failures in `namespaces`, `declarations`, and the entity hooks are
    /// always fatal.
    pub fn run<G: Generator + ?Sized>(&self, generator: &mut G) -> BackendResult<Report> {
        let model = self.model;
        let mut out = Output::new(self.config.indent);

        generator.namespaces(model, self.config.namespace_for(model), &mut out)?;

        let entities: Vec<&Entity> = model
            .dependency_order()
            .into_iter()
            .map(|id| model.entity(id))
            .collect();
        generator.declarations(model, &entities, &mut out)?;

        let mut failures = Vec::new();
        for entity in &entities {
            debug!(backend = generator.name(), entity = %entity.name, "generating entity");
            generator.begin_entity(model, entity, &mut out)?;
            for call in plan(model, entity) {
                let Err(error) = dispatch(generator, model, entity, call, &mut out) else {
                    continue;
                };
                if !self.config.continue_on_error {
                    return Err(error);
                }
                warn!(
                    backend = generator.name(),
                    entity = %entity.name,
                    operation = %call.operation(),
                    %error,
                    "backend call failed"
                );
                failures.push(Failure {
                    entity: entity.name.clone(),
                    operation: call.operation(),
                    error,
                });
            }
            generator.end_entity(model, entity, &mut out)?;
        }
        generator.finish(model, &mut out)?;

        let name = self
            .config
            .artifact_name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", model.name(), generator.extension()));
        info!(
            backend = generator.name(),
            artifact = %name,
            entities = entities.len(),
            failures = failures.len(),
            "generated"
        );
        Ok(Report {
            artifact: Artifact {
                name,
                contents: out.into_string(),
            },
            failures,
        })
    }
}

fn dispatch<G: Generator + ?Sized>(
    generator: &mut G,
    model: &Model,
    entity: &Entity,
    call: Call<'_>,
    out: &mut Output,
) -> BackendResult<()> {
    match call {
        Call::Create(access) => generator.create(model, entity, access, out),
        Call::Delete(access) => generator.delete(model, entity, access, out),
        Call::Find(key) => generator.find(model, entity, key, out),
        Call::List => generator.list(model, entity, out),
        Call::Count => generator.count(model, entity, out),
        Call::Aggregate(reference) => generator.aggregate(model, reference, out),
        Call::Edit => generator.edit(model, entity, out),
    }
}
