//! Domain and storage error types.

use thiserror::Error;

/// Errors reported by store implementations.
///
/// Backends translate their native failures into these variants so services
/// can react to conflicts without knowing which database is behind them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key rejected the write. Carries the referencing column.
    #[error("Referenced row is missing: {0}")]
    MissingReference(String),

    /// The backend could not be reached or timed out.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped to a domain value.
    #[error("Stored row is invalid: {0}")]
    InvalidRow(String),

    /// Any other query failure.
    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors returned by domain services.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Name of the offending field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => DomainError::StorageUnavailable(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the alphabetically first field so repeated calls are stable.
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    (
                        field.to_string(),
                        e.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => DomainError::Validation { field, message },
            None => DomainError::validation("request", "Invalid request"),
        }
    }
}
