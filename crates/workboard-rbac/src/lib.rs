//! # Workboard RBAC (Role-Based Access Control)
//!
//! App-wide permissions for Workboard, keyed by a user's global role.
//!
//! ## Overview
//!
//! The workboard-rbac crate handles:
//! - **Roles**: the global roles admin, manager and member
//! - **Permissions**: the fixed set of app-wide permission identifiers
//! - **Modules**: the app areas a role may open
//! - **Permission Sets**: collections of permissions
//!
//! Project-scoped roles (manager/admin/member of one project) are a
//! different scope and live in `workboard-org`.
//!
//! ## Usage
//!
//! ```rust
//! use workboard_rbac::{can_access_module, has_permission, AppModule, Permission, UserRole};
//!
//! assert!(has_permission(UserRole::Admin, Permission::ViewAuditLogs));
//! assert!(!has_permission(UserRole::Member, Permission::ViewAllTasks));
//!
//! assert!(can_access_module(UserRole::Manager, AppModule::Reports));
//! assert!(!can_access_module(UserRole::Member, AppModule::Reports));
//! ```
//!
//! ## Failing closed
//!
//! Inside the crate roles and permissions are enums, so every lookup is
//! total. Strings coming from outside go through [`check_permission`] and
//! [`check_module_access`], which deny anything they do not recognise.

pub mod matrix;
pub mod modules;
pub mod permissions;
pub mod roles;

// Re-export main types for convenience
pub use matrix::{
    accessible_modules, can_access_module, check_module_access, check_permission,
    has_all_permissions, has_any_permission, has_permission, role_permissions,
};
pub use modules::AppModule;
pub use permissions::{Permission, PermissionSet};
pub use roles::UserRole;
