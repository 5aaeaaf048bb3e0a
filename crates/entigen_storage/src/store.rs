//! The in-memory store.
//!
//! Every entity owns one table keyed by id; a row holds only the fields the
//! entity itself declares. An instance of a sub-entity therefore spans one
//! row per entity in its inheritance chain, all sharing the id the root
//! assigned. Tables are persistent maps, so cloning the store is cheap and
//! a failed multi-row write is undone by restoring the previous tables.

use std::sync::Arc;

use entigen_foundation::{FieldFlags, ScalarType, Value};
use entigen_model::{Entity, EntityRef, Field, ID_FIELD, Model, OutputType, SearchKey};
use im::OrdMap;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::instance::Instance;
use crate::operation::{Grants, Operation};

/// One entity's own fields, keyed by output name.
type Row = OrdMap<String, Value>;

/// Rows of one entity, keyed by id.
type Table = OrdMap<u64, Row>;

/// Executable store for a compiled model.
///
/// Only operations present in the [`Grants`] table can run; the rest are
/// refused with [`StoreError::NotGranted`].
#[derive(Clone, Debug)]
pub struct MemoryStore {
    model: Arc<Model>,
    grants: Grants,
    config: StoreConfig,
    tables: Vec<Table>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(model: Model, grants: Grants, config: StoreConfig) -> Self {
        let tables = vec![Table::new(); model.entities().len()];
        let next_id = config.first_id.max(1);
        Self {
            model: Arc::new(model),
            grants,
            config,
            tables,
            next_id,
        }
    }

    /// Returns the model this store executes.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the grant table.
    #[must_use]
    pub fn grants(&self) -> &Grants {
        &self.grants
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Creates an instance of a concrete entity and returns its id.
    ///
    /// `values` are keyed by output field name. Constructor fields that are
    /// not supplied get their type's zero value. Parent rows are written
    /// first, through each ancestor's inherited create path, with the
    /// discriminator set to the child being created.
    ///
    /// # Errors
    /// Fails for abstract or ungranted entities, unknown or internal field
    /// names, mistyped values, and unique violations. Nothing is written on
    /// failure.
    pub fn create(&mut self, entity: &str, values: &[(&str, Value)]) -> StoreResult<u64> {
        let model = Arc::clone(&self.model);
        let entity = entity_named(&model, entity)?;
        if entity.is_abstract() {
            return Err(StoreError::AbstractEntity {
                entity: entity.name.clone(),
                operation: Operation::Create,
            });
        }
        self.require(entity, Operation::Create)?;

        let fields = model.constructor_fields(entity);
        for (name, _) in values {
            if !fields.iter().any(|f| f.decl.name == *name) {
                let internal = model
                    .flattened_fields(entity)
                    .iter()
                    .any(|f| f.decl.name == *name && f.is_internal());
                return Err(if internal {
                    StoreError::InternalField {
                        entity: entity.name.clone(),
                        field: (*name).to_string(),
                    }
                } else {
                    StoreError::UnknownField {
                        entity: entity.name.clone(),
                        field: (*name).to_string(),
                    }
                });
            }
        }

        let mut supplied = Vec::with_capacity(fields.len());
        for field in fields {
            let value = values
                .iter()
                .rev()
                .find(|(name, _)| *name == field.decl.name)
                .map_or_else(|| zero_of(&model, field), |(_, value)| value.clone());
            check_value(&model, entity, field, &value)?;
            supplied.push((field.decl.name.clone(), value));
        }
        self.check_unique(&model, entity, &supplied, None)?;

        let saved = (self.tables.clone(), self.next_id);
        match self.insert(&model, entity, &supplied, None) {
            Ok(id) => {
                debug!(entity = %entity.name, id, "created");
                Ok(id)
            }
            Err(e) => {
                (self.tables, self.next_id) = saved;
                Err(e)
            }
        }
    }

    /// Deletes an instance of a concrete entity.
    ///
    /// The parent's delete runs first; if it reports failure this entity's
    /// row is left untouched and `false` is returned. A failed delete
    /// removes no rows at any level.
    ///
    /// # Errors
    /// Fails for abstract or ungranted entities.
    pub fn delete(&mut self, entity: &str, id: u64) -> StoreResult<bool> {
        let model = Arc::clone(&self.model);
        let entity = entity_named(&model, entity)?;
        if entity.is_abstract() {
            return Err(StoreError::AbstractEntity {
                entity: entity.name.clone(),
                operation: Operation::Delete,
            });
        }
        self.require(entity, Operation::Delete)?;
        if id == 0 || !self.tables[entity.id.0].contains_key(&id) {
            return Ok(false);
        }
        let saved = self.tables.clone();
        let deleted = match self.remove(&model, entity, id) {
            Ok(deleted) => deleted,
            Err(e) => {
                self.tables = saved;
                return Err(e);
            }
        };
        if !deleted {
            self.tables = saved;
        }
        debug!(entity = %entity.name, id, deleted, "delete");
        Ok(deleted)
    }

    /// Finds an instance by id or by one of the entity's searchable fields.
    ///
    /// `key` is [`ID_FIELD`] or a searchable field's output name. A zero id
    /// yields `None` without touching storage. On an abstract entity the
    /// match is dispatched by discriminator, so the concrete instance is
    /// returned.
    ///
    /// # Errors
    /// Fails for ungranted entities, unknown or non-searchable keys, and
    /// mistyped values.
    pub fn find(&self, entity: &str, key: &str, value: &Value) -> StoreResult<Option<Instance>> {
        let entity = entity_named(&self.model, entity)?;
        self.require(entity, Operation::Find)?;

        let keys = entity.searchable_fields();
        let Some(search) = keys.iter().find(|k| k.name() == key) else {
            let exists = self
                .model
                .flattened_fields(entity)
                .iter()
                .any(|f| f.decl.name == key);
            return Err(if exists {
                StoreError::NotSearchable {
                    entity: entity.name.clone(),
                    field: key.to_string(),
                }
            } else {
                StoreError::UnknownField {
                    entity: entity.name.clone(),
                    field: key.to_string(),
                }
            });
        };

        match search {
            SearchKey::Id => {
                let Some(id) = value.as_uint() else {
                    return Err(StoreError::TypeMismatch {
                        entity: entity.name.clone(),
                        field: ID_FIELD.to_string(),
                        expected: ScalarType::IDENTIFIER.output_name().to_string(),
                        found: value.type_name(),
                    });
                };
                if id == 0 {
                    return Ok(None);
                }
                self.materialize(entity, id)
            }
            SearchKey::Field(field) => {
                check_value(&self.model, entity, field, value)?;
                let column = field.decl.name.as_str();
                let hit = self.tables[entity.id.0]
                    .iter()
                    .find(|(_, row)| row.get(column) == Some(value))
                    .map(|(id, _)| *id);
                match hit {
                    Some(id) => self.materialize(entity, id),
                    None => Ok(None),
                }
            }
        }
    }

    /// Finds an instance by id.
    ///
    /// # Errors
    /// See [`MemoryStore::find`].
    pub fn find_by_id(&self, entity: &str, id: u64) -> StoreResult<Option<Instance>> {
        self.find(entity, ID_FIELD, &Value::UInt(id))
    }

    /// Lists one page of a concrete entity's instances in id order.
    ///
    /// The page starts at `page * count`; `count` defaults to the
    /// configured page size.
    ///
    /// # Errors
    /// Fails for abstract or ungranted entities.
    pub fn list(&self, entity: &str, page: usize, count: Option<usize>) -> StoreResult<Vec<Instance>> {
        let entity = entity_named(&self.model, entity)?;
        if entity.is_abstract() {
            return Err(StoreError::AbstractEntity {
                entity: entity.name.clone(),
                operation: Operation::List,
            });
        }
        self.require(entity, Operation::List)?;

        let count = count.unwrap_or(self.config.default_page_size);
        let offset = page.saturating_mul(count);
        self.tables[entity.id.0]
            .keys()
            .skip(offset)
            .take(count)
            .filter_map(|id| self.load(entity, *id).transpose())
            .collect()
    }

    /// Returns the number of stored instances of an entity, including
    /// instances of its subtypes.
    ///
    /// # Errors
    /// Fails for ungranted entities.
    pub fn count(&self, entity: &str) -> StoreResult<usize> {
        let entity = entity_named(&self.model, entity)?;
        self.require(entity, Operation::Count)?;
        Ok(self.tables[entity.id.0].len())
    }

    /// Returns the `source` instances whose reference to `target` holds `id`.
    ///
    /// At most one instance is returned when the reference is unique.
    ///
    /// # Errors
    /// Fails when the aggregate was not granted to `target` or `source`
    /// holds no reference to it.
    pub fn aggregate(&self, source: &str, target: &str, id: u64) -> StoreResult<Vec<Instance>> {
        let target_entity = entity_named(&self.model, target)?;
        self.require(target_entity, Operation::Aggregate)?;

        let reference = self
            .model
            .references_to(target_entity)
            .iter()
            .find(|r| r.source_name == source)
            .ok_or_else(|| StoreError::UnknownReference {
                source_entity: source.to_string(),
                target: target.to_string(),
            })?;
        if id == 0 {
            return Ok(Vec::new());
        }

        let holder = self.model.entity(reference.source);
        let column = holder
            .decl_of(&reference.field)
            .map(|d| d.name.as_str())
            .ok_or_else(|| {
                StoreError::Corrupt(format!("{} lost field {}", holder.name, reference.field))
            })?;
        let limit = if reference.unique { 1 } else { usize::MAX };
        let wanted = Value::UInt(id);

        let mut found = Vec::new();
        for (row_id, row) in self.tables[holder.id.0].iter() {
            if found.len() >= limit {
                break;
            }
            if row.get(column) == Some(&wanted) {
                if let Some(instance) = self.materialize(holder, *row_id)? {
                    found.push(instance);
                }
            }
        }
        Ok(found)
    }

    /// Updates one editable field from text.
    ///
    /// The text is parsed against the field's scalar type, or as an enum
    /// member name or value. Returns `false` without mutating anything when
    /// the text does not parse or no such instance exists.
    ///
    /// # Errors
    /// Fails for ungranted entities, unknown or non-editable fields, and
    /// unique violations.
    pub fn edit(&mut self, entity: &str, id: u64, field: &str, text: &str) -> StoreResult<bool> {
        let model = Arc::clone(&self.model);
        let entity = entity_named(&model, entity)?;
        self.require(entity, Operation::Edit)?;

        let Some((owner, target)) = model.lineage(entity).into_iter().find_map(|owner| {
            owner
                .fields
                .iter()
                .find(|f| f.decl.name == field)
                .map(|f| (owner, f))
        }) else {
            return Err(StoreError::UnknownField {
                entity: entity.name.clone(),
                field: field.to_string(),
            });
        };
        if !target.is_editable() {
            return Err(StoreError::NotEditable {
                entity: entity.name.clone(),
                field: field.to_string(),
            });
        }
        if id == 0 || !self.tables[entity.id.0].contains_key(&id) {
            return Ok(false);
        }

        let Some(value) = parse_text(&model, target, text) else {
            debug!(entity = %entity.name, id, field, text, "edit rejected value");
            return Ok(false);
        };
        self.check_unique(&model, entity, &[(target.decl.name.clone(), value.clone())], Some(id))?;

        let table = &mut self.tables[owner.id.0];
        let Some(row) = table.get(&id) else {
            return Ok(false);
        };
        let updated = row.update(target.decl.name.clone(), value);
        table.insert(id, updated);
        debug!(entity = %entity.name, id, field, "edited");
        Ok(true)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require(&self, entity: &Entity, operation: Operation) -> StoreResult<()> {
        if self.grants.allows(entity.id, operation) {
            Ok(())
        } else {
            Err(StoreError::NotGranted {
                entity: entity.name.clone(),
                operation,
            })
        }
    }

    fn allocate_id(&mut self) -> StoreResult<u64> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        Ok(id)
    }

    /// Writes the rows of `entity` and its ancestors, root first.
    fn insert(
        &mut self,
        model: &Model,
        entity: &Entity,
        supplied: &[(String, Value)],
        child: Option<EntityRef>,
    ) -> StoreResult<u64> {
        let id = match model.parent(entity) {
            Some(parent) => {
                self.require(parent, Operation::InheritedCreate)?;
                self.insert(model, parent, supplied, Some(entity.id))?
            }
            None => self.allocate_id()?,
        };

        let kind = entity.discriminator_field().map(|f| f.decl.name.as_str());
        let mut row = Row::new();
        for field in entity.fields.iter().filter(|f| !f.is_dynamic()) {
            let value = if Some(field.decl.name.as_str()) == kind {
                let value = child
                    .and_then(|c| entity.discriminator_of(c))
                    .ok_or_else(|| {
                        StoreError::Corrupt(format!("no discriminator for {} subtype", entity.name))
                    })?;
                Value::UInt(value)
            } else {
                supplied
                    .iter()
                    .find(|(name, _)| *name == field.decl.name)
                    .map_or_else(|| zero_of(model, field), |(_, value)| value.clone())
            };
            row.insert(field.decl.name.clone(), value);
        }
        self.tables[entity.id.0].insert(id, row);
        Ok(id)
    }

    /// Removes the rows of `entity` and its ancestors, root first.
    fn remove(&mut self, model: &Model, entity: &Entity, id: u64) -> StoreResult<bool> {
        if let Some(parent) = model.parent(entity) {
            self.require(parent, Operation::InheritedDelete)?;
            if !self.remove(model, parent, id)? {
                debug!(entity = %entity.name, id, parent = %parent.name, "parent delete failed");
                return Ok(false);
            }
        }
        Ok(self.tables[entity.id.0].remove(&id).is_some())
    }

    /// Loads the concrete instance behind `id`, following discriminators
    /// down from an abstract entity.
    fn materialize(&self, entity: &Entity, id: u64) -> StoreResult<Option<Instance>> {
        let Some(row) = self.tables[entity.id.0].get(&id) else {
            return Ok(None);
        };
        if !entity.is_abstract() {
            return self.load(entity, id);
        }
        let corrupt = || StoreError::Corrupt(format!("{}#{id} has no valid discriminator", entity.name));
        let kind = entity.discriminator_field().ok_or_else(corrupt)?;
        let value = row
            .get(kind.decl.name.as_str())
            .and_then(Value::as_uint)
            .ok_or_else(corrupt)?;
        let child = entity.dispatch(value).ok_or_else(corrupt)?;
        self.materialize(self.model.entity(child), id)
    }

    /// Assembles an instance from every row along the chain.
    fn load(&self, entity: &Entity, id: u64) -> StoreResult<Option<Instance>> {
        let mut values = Vec::new();
        for owner in self.model.lineage(entity) {
            let Some(row) = self.tables[owner.id.0].get(&id) else {
                return Ok(None);
            };
            for field in owner.fields.iter().filter(|f| !f.is_dynamic()) {
                let value = row.get(field.decl.name.as_str()).cloned().unwrap_or_default();
                values.push((field.decl.name.clone(), value));
            }
        }
        Ok(Some(Instance::new(entity.name.clone(), id, values)))
    }

    /// Fails if a supplied value collides with a unique field of another row.
    ///
    /// Zero values (empty text, id 0, the first enum member) are exempt.
    fn check_unique(
        &self,
        model: &Model,
        entity: &Entity,
        supplied: &[(String, Value)],
        except: Option<u64>,
    ) -> StoreResult<()> {
        for owner in model.lineage(entity) {
            let unique = owner
                .fields
                .iter()
                .filter(|f| f.has(FieldFlags::UNIQUE) && !f.is_dynamic());
            for field in unique {
                let Some((_, value)) = supplied.iter().find(|(name, _)| *name == field.decl.name)
                else {
                    continue;
                };
                // Unset fields hold their zero value and never collide.
                if *value == zero_of(model, field) {
                    continue;
                }
                let column = field.decl.name.as_str();
                let taken = self.tables[owner.id.0]
                    .iter()
                    .any(|(id, row)| Some(*id) != except && row.get(column) == Some(value));
                if taken {
                    return Err(StoreError::UniqueViolation {
                        entity: entity.name.clone(),
                        field: field.decl.name.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn entity_named<'m>(model: &'m Model, name: &str) -> StoreResult<&'m Entity> {
    model
        .entity_by_name(name)
        .ok_or_else(|| StoreError::UnknownEntity(name.to_string()))
}

/// Zero value of a field: the scalar zero, or an enum's first member.
fn zero_of(model: &Model, field: &Field) -> Value {
    match &field.decl.ty {
        OutputType::Scalar(scalar) => scalar.zero(),
        OutputType::Enum(name) => Value::UInt(
            model
                .enumeration(name)
                .and_then(|e| e.variants.first())
                .map_or(0, |v| v.value),
        ),
    }
}

fn check_value(model: &Model, entity: &Entity, field: &Field, value: &Value) -> StoreResult<()> {
    let fits = match &field.decl.ty {
        OutputType::Scalar(scalar) => scalar.accepts(value),
        OutputType::Enum(name) => model
            .enumeration(name)
            .zip(value.as_uint())
            .is_some_and(|(e, v)| e.name_of(v).is_some()),
    };
    if fits {
        Ok(())
    } else {
        Err(StoreError::TypeMismatch {
            entity: entity.name.clone(),
            field: field.decl.name.clone(),
            expected: field.decl.ty.name().to_string(),
            found: value.type_name(),
        })
    }
}

/// Parses edit text against a field's output type.
fn parse_text(model: &Model, field: &Field, text: &str) -> Option<Value> {
    match &field.decl.ty {
        OutputType::Scalar(scalar) => scalar.parse(text),
        OutputType::Enum(name) => {
            let enumeration = model.enumeration(name)?;
            enumeration
                .value_of(text)
                .or_else(|| {
                    text.parse::<u64>()
                        .ok()
                        .filter(|v| enumeration.name_of(*v).is_some())
                })
                .map(Value::UInt)
        }
    }
}
