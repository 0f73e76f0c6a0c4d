//! # Workboard Organization Management
//!
//! Users, projects and project teams, with the project-scoped permission
//! table that governs what each team member may do.
//!
//! ## Overview
//!
//! The workboard-org crate handles:
//! - **Users**: identity and global role of a signed-in user
//! - **Projects**: project records, validation and lifecycle
//! - **Memberships**: a user's place on a project team
//! - **Roles**: project roles manager, admin and member
//! - **Capabilities**: the fixed capability record per project role
//! - **Access**: one context that answers both app-wide and project questions
//! - **Context**: navigation state of the main layout
//!
//! ## Architecture
//!
//! ```text
//! User (global role) ──→ workboard-rbac permission table
//!   │
//!   ├─ TeamMembership (project role) ─→ Project
//!   │                                     └─ CapabilityRecord
//!   └─ UserContext (selected project, active view)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use workboard_org::{
//!     has_project_permission, Project, ProjectCapability, ProjectDraft, ProjectRole,
//!     TeamMembership, User,
//! };
//! use workboard_rbac::UserRole;
//!
//! let john = User::new("user1", "John Doe", "user@example.com", UserRole::Manager);
//! let jane = User::new("user2", "Jane Smith", "jane@example.com", UserRole::Member);
//!
//! let mut project = Project::new(
//!     ProjectDraft::new(
//!         "Website Redesign",
//!         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
//!     ),
//!     &john,
//! )
//! .unwrap();
//!
//! project
//!     .add_member(&john.id, TeamMembership::for_user(&jane, ProjectRole::Admin))
//!     .unwrap();
//!
//! assert!(has_project_permission(Some(&project), &jane.id, ProjectCapability::EditProject));
//! assert!(!has_project_permission(Some(&project), &jane.id, ProjectCapability::DeleteProject));
//! ```
//!
//! ## Scopes
//!
//! A global role never grants a project capability. Project questions are
//! answered from the team membership alone; see [`AccessContext`].

pub mod access;
pub mod capabilities;
pub mod context;
pub mod error;
pub mod membership;
pub mod permissions;
pub mod project;
pub mod roles;
pub mod user;

// Re-export main types for convenience
pub use access::AccessContext;
pub use capabilities::{CapabilityRecord, ProjectCapability};
pub use context::{ActiveView, ProjectView, UserContext, MAX_RECENT_PROJECTS};
pub use error::{ProjectError, ProjectResult};
pub use membership::TeamMembership;
pub use permissions::{
    assignable_roles, check_project_permission, has_project_permission, is_project_admin,
    is_project_manager, is_project_member, role_in_project,
};
pub use project::{Project, ProjectDraft, ProjectId, ProjectStatus, ProjectSummary, ProjectUpdate};
pub use roles::{ProjectRole, RoleIcon};
pub use user::{initials, User, UserId};
