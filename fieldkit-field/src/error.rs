//! Error types for the field contract.

use fieldkit_db::DbError;
use fieldkit_types::FieldId;
use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    /// A capability-specific operation was invoked on a field type that does
    /// not advertise the capability. Callers must check the predicate first.
    #[error("{capability} is not supported by the '{handle}' field type")]
    Unsupported {
        handle: String,
        capability: &'static str,
    },

    #[error("field '{0}' has not been committed")]
    NotPersisted(String),

    #[error("field {existing} already has an id, cannot assign {requested}")]
    IdAlreadyAssigned {
        existing: FieldId,
        requested: FieldId,
    },

    #[error("unknown field: {0}")]
    UnknownField(FieldId),

    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("section association needs a parent section or a parent field")]
    MissingAssociationParent,

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FieldError {
    pub(crate) fn unsupported(handle: &str, capability: &'static str) -> Self {
        Self::Unsupported {
            handle: handle.to_string(),
            capability,
        }
    }
}
