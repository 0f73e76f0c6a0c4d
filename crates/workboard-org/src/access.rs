//! Unified access checks
//!
//! One entry point for both permission scopes. App-wide questions (can the
//! user open the reports module, create a project, see everyone's stats)
//! go to the global role table. Questions about one project go only to the
//! project capability table: a global admin who is not on a project's team
//! holds no capability in it.

use workboard_rbac::{can_access_module, has_permission, AppModule, Permission};

use crate::capabilities::ProjectCapability;
use crate::error::{ProjectError, ProjectResult};
use crate::permissions::{assignable_roles, has_project_permission, role_in_project};
use crate::project::Project;
use crate::roles::ProjectRole;
use crate::user::User;

/// A user, optionally focused on one project.
///
/// # Examples
///
/// ```
/// use workboard_org::{AccessContext, ProjectCapability, User};
/// use workboard_rbac::{AppModule, Permission, UserRole};
///
/// let admin = User::new("admin-1", "Admin", "admin@example.com", UserRole::Admin);
/// let ctx = AccessContext::new(&admin);
///
/// assert!(ctx.can(Permission::ViewAuditLogs));
/// assert!(ctx.can_open_module(AppModule::Reports));
/// // No project selected, so no project capability
/// assert!(!ctx.can_in_project(ProjectCapability::EditProject));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    /// Acting user
    pub user: &'a User,

    /// Project in focus, if any
    pub project: Option<&'a Project>,
}

impl<'a> AccessContext<'a> {
    /// Context with no project selected.
    pub fn new(user: &'a User) -> Self {
        Self { user, project: None }
    }

    /// Context focused on `project`.
    pub fn for_project(user: &'a User, project: &'a Project) -> Self {
        Self {
            user,
            project: Some(project),
        }
    }

    /// Same user, different project.
    pub fn with_project(self, project: Option<&'a Project>) -> Self {
        Self { project, ..self }
    }

    /// App-wide permission from the user's global role.
    pub fn can(&self, permission: Permission) -> bool {
        has_permission(self.user.role, permission)
    }

    /// Whether the user's global role may open `module`.
    pub fn can_open_module(&self, module: AppModule) -> bool {
        can_access_module(self.user.role, module)
    }

    /// The user's role in the focused project.
    pub fn project_role(&self) -> Option<ProjectRole> {
        role_in_project(self.project, &self.user.id)
    }

    /// Project capability from the user's project membership only.
    pub fn can_in_project(&self, capability: ProjectCapability) -> bool {
        has_project_permission(self.project, &self.user.id, capability)
    }

    /// Like [`Self::can_in_project`] but as a `Result`.
    pub fn require_in_project(&self, capability: ProjectCapability) -> ProjectResult<ProjectRole> {
        match self.project_role() {
            Some(role) if role.allows(capability) => Ok(role),
            _ => Err(ProjectError::Forbidden { capability }),
        }
    }

    /// Roles the user may hand out in the focused project.
    pub fn assignable_roles(&self) -> Vec<ProjectRole> {
        assignable_roles(self.project, &self.user.id)
    }
}
