//! Error types for port operations.

/// Store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Record not found - includes record type and key for actionable messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Storage backend failed - includes operation name for tracing.
    #[error("Store error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Optimistic concurrency check failed; nothing was written.
    #[error("Version conflict: expected {expected:?}, found {found:?}")]
    Conflict {
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with record type and key context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn conflict(expected: Option<u64>, found: Option<u64>) -> Self {
        Self::Conflict { expected, found }
    }

    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database { .. } => "STORE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Conflict { .. } => "VERSION_CONFLICT",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_context() {
        let error = RepoError::not_found("AdventureSession", "aa/bb");
        match &error {
            RepoError::NotFound { entity_type, id } => {
                assert_eq!(*entity_type, "AdventureSession");
                assert_eq!(id, "aa/bb");
            }
            _ => panic!("Expected NotFound variant"),
        }
        assert!(error.is_not_found());
        assert_eq!(error.code(), "NOT_FOUND");
    }

    #[test]
    fn conflict_reports_both_versions() {
        let error = RepoError::conflict(Some(3), Some(5));
        assert_eq!(error.code(), "VERSION_CONFLICT");
        assert_eq!(
            error.to_string(),
            "Version conflict: expected Some(3), found Some(5)"
        );
    }
}
