//! The compiled model.
//!
//! A `Model` is built once per compilation and is read-only afterwards.
//! Every collection keeps declaration order, so two compilations of the
//! same source compare equal and drive backends identically.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityRef, Field};
use crate::reference::Reference;

/// A member of a resolved enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variant {
    /// Member name.
    pub name: String,
    /// Member value.
    pub value: u64,
}

/// A resolved enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enumerate {
    /// Enum name.
    pub name: String,
    /// Members in declaration order.
    pub variants: Vec<Variant>,
    /// True for `<Name>Kind` discriminator enums.
    pub discriminator: bool,
}

impl Enumerate {
    /// Looks up a member value by name.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.variants.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Looks up a member name by value.
    #[must_use]
    pub fn name_of(&self, value: u64) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }
}

/// A non-fatal finding recorded while building the model.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Warning {
    /// Source line.
    pub line: u32,
    /// Description.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// The fully resolved entity/enum graph passed to every backend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    pub(crate) name: String,
    pub(crate) enums: Vec<Enumerate>,
    pub(crate) entities: Vec<Entity>,
    /// Incoming references, indexed by target entity.
    pub(crate) references: Vec<Vec<Reference>>,
    pub(crate) warnings: Vec<Warning>,
}

impl Model {
    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all enumerations, including discriminators, in order of first appearance.
    #[must_use]
    pub fn enums(&self) -> &[Enumerate] {
        &self.enums
    }

    /// Returns all entities in declaration order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns warnings recorded while linking.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the entity behind a reference.
    ///
    /// # Panics
    /// Panics if `id` did not come from this model.
    #[must_use]
    pub fn entity(&self, id: EntityRef) -> &Entity {
        &self.entities[id.0]
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Looks up an enumeration by name.
    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&Enumerate> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Returns the parent of an entity.
    #[must_use]
    pub fn parent(&self, entity: &Entity) -> Option<&Entity> {
        entity.parent.map(|p| self.entity(p))
    }

    /// Returns the root of an entity's inheritance chain.
    #[must_use]
    pub fn root<'a>(&'a self, entity: &'a Entity) -> &'a Entity {
        let mut current = entity;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Returns the inheritance chain from the root down to `entity`.
    #[must_use]
    pub fn lineage<'a>(&'a self, entity: &'a Entity) -> Vec<&'a Entity> {
        let mut chain = vec![entity];
        let mut current = entity;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Returns the fields an instance of `entity` carries: the parent's
    /// fields first, recursively, then its own.
    #[must_use]
    pub fn flattened_fields<'a>(&'a self, entity: &'a Entity) -> Vec<&'a Field> {
        self.lineage(entity)
            .into_iter()
            .flat_map(|e| e.fields.iter())
            .collect()
    }

    /// Returns the flattened fields that are persisted (not dynamic).
    #[must_use]
    pub fn storage_fields<'a>(&'a self, entity: &'a Entity) -> Vec<&'a Field> {
        self.flattened_fields(entity)
            .into_iter()
            .filter(|f| !f.is_dynamic())
            .collect()
    }

    /// Returns the flattened fields a caller supplies when constructing an
    /// instance (neither dynamic nor internal).
    #[must_use]
    pub fn constructor_fields<'a>(&'a self, entity: &'a Entity) -> Vec<&'a Field> {
        self.flattened_fields(entity)
            .into_iter()
            .filter(|f| !f.is_dynamic() && !f.is_internal())
            .collect()
    }

    /// Returns the references pointing at `entity`.
    #[must_use]
    pub fn references_to(&self, entity: &Entity) -> &[Reference] {
        &self.references[entity.id.0]
    }

    /// Returns every reference in the model, grouped by target in declaration order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().flatten()
    }

    /// Returns the concrete (non-abstract) entities at or below `entity`.
    #[must_use]
    pub fn concrete_descendants<'a>(&'a self, entity: &'a Entity) -> Vec<&'a Entity> {
        if !entity.is_abstract() {
            return vec![entity];
        }
        entity
            .sub_entities()
            .flat_map(|child| self.concrete_descendants(self.entity(child)))
            .collect()
    }

    /// Returns declaration order with every parent moved ahead of its children.
    #[must_use]
    pub fn dependency_order(&self) -> Vec<EntityRef> {
        let mut order = Vec::with_capacity(self.entities.len());
        let mut placed = vec![false; self.entities.len()];
        for entity in &self.entities {
            for ancestor in self.lineage(entity) {
                if !placed[ancestor.id.0] {
                    placed[ancestor.id.0] = true;
                    order.push(ancestor.id);
                }
            }
        }
        order
    }
}
