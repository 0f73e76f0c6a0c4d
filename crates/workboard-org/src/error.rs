//! Error types for project and team operations

use thiserror::Error;

use crate::capabilities::ProjectCapability;
use crate::roles::ProjectRole;
use crate::user::UserId;

/// Project error types.
///
/// Raised by project construction, updates and team management. Permission
/// lookups themselves never fail; only mutating operations do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// The actor lacks a project capability
    #[error("Forbidden: missing project capability {capability}")]
    Forbidden { capability: ProjectCapability },

    /// The actor is not on the project team
    #[error("User {0} is not a member of this project")]
    NotAMember(UserId),

    /// A membership for this user already exists
    #[error("User {0} is already a member of this project")]
    DuplicateMember(UserId),

    /// The project manager cannot be removed or demoted
    #[error("The project manager cannot be removed or reassigned")]
    ManagerProtected,

    /// The actor may not hand out (or act on) this role
    #[error("Role {role} is not assignable by {actor_role}")]
    RoleNotAssignable {
        role: ProjectRole,
        actor_role: ProjectRole,
    },

    /// Progress outside 0..=100
    #[error("Progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    /// End date before start date
    #[error("End date must not be before start date")]
    InvalidDates,

    /// Project name is blank
    #[error("Project name must not be empty")]
    EmptyName,
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

impl ProjectError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ProjectError::Forbidden { .. }
            | ProjectError::RoleNotAssignable { .. }
            | ProjectError::ManagerProtected => 403,
            ProjectError::NotAMember(_) => 404,
            ProjectError::DuplicateMember(_) => 409,
            ProjectError::InvalidProgress(_)
            | ProjectError::InvalidDates
            | ProjectError::EmptyName => 422,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProjectError::Forbidden { .. } => "FORBIDDEN",
            ProjectError::NotAMember(_) => "NOT_A_MEMBER",
            ProjectError::DuplicateMember(_) => "DUPLICATE_MEMBER",
            ProjectError::ManagerProtected => "MANAGER_PROTECTED",
            ProjectError::RoleNotAssignable { .. } => "ROLE_NOT_ASSIGNABLE",
            ProjectError::InvalidProgress(_) => "INVALID_PROGRESS",
            ProjectError::InvalidDates => "INVALID_DATES",
            ProjectError::EmptyName => "EMPTY_NAME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProjectError::Forbidden {
            capability: ProjectCapability::DeleteProject,
        };
        assert_eq!(
            err.to_string(),
            "Forbidden: missing project capability deleteProject"
        );
        assert_eq!(err.status_code(), 403);

        let err = ProjectError::RoleNotAssignable {
            role: ProjectRole::Admin,
            actor_role: ProjectRole::Admin,
        };
        assert_eq!(err.to_string(), "Role admin is not assignable by admin");
        assert_eq!(err.error_code(), "ROLE_NOT_ASSIGNABLE");
    }

    #[test]
    fn test_validation_errors_are_422() {
        assert_eq!(ProjectError::InvalidProgress(150).status_code(), 422);
        assert_eq!(ProjectError::InvalidDates.status_code(), 422);
        assert_eq!(ProjectError::DuplicateMember("user1".into()).status_code(), 409);
    }
}
