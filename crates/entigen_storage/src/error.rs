//! Errors raised by the memory store.
//!
//! These occur while executing generated operations, not while compiling,
//! so they never travel through the compile [`Error`](entigen_foundation::Error).

use thiserror::Error;

use crate::operation::Operation;

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A store operation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No entity of that name exists in the model.
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    /// The operation was never generated for the entity.
    #[error("{operation} was not generated for {entity}")]
    NotGranted {
        /// Entity name.
        entity: String,
        /// Refused operation.
        operation: Operation,
    },

    /// The operation needs a concrete entity.
    #[error("{entity} is abstract and cannot be used with {operation}")]
    AbstractEntity {
        /// Entity name.
        entity: String,
        /// Refused operation.
        operation: Operation,
    },

    /// The entity has no field of that name.
    #[error("{entity} has no field '{field}'")]
    UnknownField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// The field exists but is not a lookup key.
    #[error("{entity}.{field} is not searchable")]
    NotSearchable {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// The field exists but is not editable.
    #[error("{entity}.{field} is not editable")]
    NotEditable {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// The field is managed by the store and cannot be supplied.
    #[error("{entity}.{field} is internal")]
    InternalField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A supplied value does not fit the field's type.
    #[error("{entity}.{field} expects {expected}, got {found}")]
    TypeMismatch {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Expected type name.
        expected: String,
        /// Supplied value type.
        found: &'static str,
    },

    /// A unique field already holds the value.
    #[error("{entity}.{field} must be unique; {value} already exists")]
    UniqueViolation {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Rendered duplicate value.
        value: String,
    },

    /// No reference from `source` to `target` exists.
    #[error("{source_entity} holds no reference to {target}")]
    UnknownReference {
        /// Referencing entity.
        source_entity: String,
        /// Referenced entity.
        target: String,
    },

    /// Identifier space is exhausted.
    #[error("no identifiers left")]
    IdsExhausted,

    /// Stored rows are inconsistent with the model.
    #[error("corrupt store: {0}")]
    Corrupt(String),
}
