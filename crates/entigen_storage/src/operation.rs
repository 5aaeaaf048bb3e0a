//! Per-entity operations and the grant table.
//!
//! A generation run decides which operations each entity exposes; the
//! store executes only those. [`Operation`] names one operation,
//! [`Operations`] is the bitmask recorded per entity, and [`Grants`] holds
//! one mask per model entity.

use std::fmt;

use bitflags::bitflags;
use entigen_model::{EntityRef, Model};

bitflags! {
    /// Operations granted to one entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Operations: u16 {
        /// Public constructor (concrete entities).
        const CREATE = 1;
        /// Public delete (concrete entities).
        const DELETE = 1 << 1;
        /// Constructor reachable only through a subtype's create path.
        const INHERITED_CREATE = 1 << 2;
        /// Delete reachable only through a subtype's delete path.
        const INHERITED_DELETE = 1 << 3;
        /// Lookup by id or a searchable field.
        const FIND = 1 << 4;
        /// Paginated listing (concrete entities).
        const LIST = 1 << 5;
        /// Total cardinality.
        const COUNT = 1 << 6;
        /// Lookup of referencing rows.
        const AGGREGATE = 1 << 7;
        /// Update of one editable field.
        const EDIT = 1 << 8;
    }
}

/// A single named operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// See [`Operations::CREATE`].
    Create,
    /// See [`Operations::DELETE`].
    Delete,
    /// See [`Operations::INHERITED_CREATE`].
    InheritedCreate,
    /// See [`Operations::INHERITED_DELETE`].
    InheritedDelete,
    /// See [`Operations::FIND`].
    Find,
    /// See [`Operations::LIST`].
    List,
    /// See [`Operations::COUNT`].
    Count,
    /// See [`Operations::AGGREGATE`].
    Aggregate,
    /// See [`Operations::EDIT`].
    Edit,
}

impl Operation {
    /// Every operation, in bit order.
    pub const ALL: [Self; 9] = [
        Self::Create,
        Self::Delete,
        Self::InheritedCreate,
        Self::InheritedDelete,
        Self::Find,
        Self::List,
        Self::Count,
        Self::Aggregate,
        Self::Edit,
    ];

    /// Returns the operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::InheritedCreate => "inherited create",
            Self::InheritedDelete => "inherited delete",
            Self::Find => "find",
            Self::List => "list",
            Self::Count => "count",
            Self::Aggregate => "aggregate",
            Self::Edit => "edit",
        }
    }

    /// Returns the bit this operation occupies.
    #[must_use]
    pub const fn bits(self) -> Operations {
        match self {
            Self::Create => Operations::CREATE,
            Self::Delete => Operations::DELETE,
            Self::InheritedCreate => Operations::INHERITED_CREATE,
            Self::InheritedDelete => Operations::INHERITED_DELETE,
            Self::Find => Operations::FIND,
            Self::List => Operations::LIST,
            Self::Count => Operations::COUNT,
            Self::Aggregate => Operations::AGGREGATE,
            Self::Edit => Operations::EDIT,
        }
    }
}

impl From<Operation> for Operations {
    fn from(op: Operation) -> Self {
        op.bits()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Operations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Operation::ALL
            .into_iter()
            .filter(|op| self.contains(op.bits()))
            .map(Operation::name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

/// Operations granted to each entity of one model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grants {
    by_entity: Vec<Operations>,
}

impl Grants {
    /// Creates an empty grant table sized for `model`.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        Self {
            by_entity: vec![Operations::empty(); model.entities().len()],
        }
    }

    /// Grants every operation that suits each entity's kind: concrete
    /// entities get the public lifecycle and listing, abstract ones only
    /// the inherited lifecycle.
    #[must_use]
    pub fn standard(model: &Model) -> Self {
        let shared =
            Operations::FIND | Operations::COUNT | Operations::AGGREGATE | Operations::EDIT;
        Self {
            by_entity: model
                .entities()
                .iter()
                .map(|e| {
                    if e.is_abstract() {
                        shared | Operations::INHERITED_CREATE | Operations::INHERITED_DELETE
                    } else {
                        shared | Operations::CREATE | Operations::DELETE | Operations::LIST
                    }
                })
                .collect(),
        }
    }

    /// Adds `ops` to an entity's grants.
    pub fn grant(&mut self, entity: EntityRef, ops: impl Into<Operations>) {
        if let Some(slot) = self.by_entity.get_mut(entity.0) {
            slot.insert(ops.into());
        }
    }

    /// Returns an entity's grants.
    #[must_use]
    pub fn get(&self, entity: EntityRef) -> Operations {
        self.by_entity.get(entity.0).copied().unwrap_or_default()
    }

    /// Returns true if `op` was granted to `entity`.
    #[must_use]
    pub fn allows(&self, entity: EntityRef, op: Operation) -> bool {
        self.get(entity).contains(op.bits())
    }
}
