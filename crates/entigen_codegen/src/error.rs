//! Errors raised by generator backends.
//!
//! Backend errors happen while generating, after the model compiled, and
//! are kept apart from the compile [`Error`](entigen_foundation::Error) so
//! the orchestrator can collect them and keep going.

use entigen_storage::Operation;
use thiserror::Error;

/// Result alias for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// A failure local to one backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend cannot generate this operation for the entity.
    #[error("{backend} cannot generate {operation} for {entity}")]
    Unsupported {
        /// Backend name.
        backend: &'static str,
        /// Operation requested.
        operation: Operation,
        /// Entity name.
        entity: String,
    },

    /// The backend cannot express a field's type.
    #[error("{backend} cannot express {entity}.{field} of type {ty}")]
    UnsupportedType {
        /// Backend name.
        backend: &'static str,
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Output type name.
        ty: String,
    },

    /// Any other backend-specific failure.
    #[error("{entity}: {message}")]
    Failed {
        /// Entity name.
        entity: String,
        /// Description.
        message: String,
    },
}

impl BackendError {
    /// Creates a [`BackendError::Failed`].
    pub fn failed(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            entity: entity.into(),
            message: message.into(),
        }
    }
}
