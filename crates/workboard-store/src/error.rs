//! Error types for store operations

use thiserror::Error;
use workboard_org::{ProjectCapability, ProjectError};
use workboard_rbac::Permission;

/// Store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The actor's global role lacks a permission
    #[error("Forbidden: missing permission {0}")]
    MissingPermission(Permission),

    /// Input rejected before anything was written
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report could not be rendered
    #[error("Export failed: {0}")]
    Export(String),

    /// Project or team rule violated
    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Shorthand for a missing record.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing project capability.
    pub fn forbidden(capability: ProjectCapability) -> Self {
        StoreError::Project(ProjectError::Forbidden { capability })
    }

    /// Whether the error is a permission failure of either scope.
    pub fn is_forbidden(&self) -> bool {
        match self {
            StoreError::MissingPermission(_) => true,
            StoreError::Project(e) => e.status_code() == 403,
            _ => false,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::MissingPermission(_) => 403,
            StoreError::Validation(_) => 422,
            StoreError::Export(_) => 500,
            StoreError::Project(e) => e.status_code(),
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::MissingPermission(_) => "FORBIDDEN",
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::Export(_) => "EXPORT_FAILED",
            StoreError::Project(e) => e.error_code(),
        }
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Export(err.to_string())
    }
}
