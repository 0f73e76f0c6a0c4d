//! # Permissions
//!
//! App-wide permission identifiers and permission sets.
//! Every permission belongs to exactly one [`AppModule`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::modules::AppModule;

/// An app-wide permission identifier.
///
/// Serialized in snake_case, e.g. `"create_project"`.
///
/// # Example
///
/// ```
/// use workboard_rbac::{AppModule, Permission};
///
/// let perm = Permission::parse("create_project").unwrap();
/// assert_eq!(perm, Permission::CreateProject);
/// assert_eq!(perm.module(), AppModule::Projects);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Dashboard
    ViewDashboard,
    ViewAllStats,
    ViewTeamStats,
    ViewOwnStats,

    // Projects
    ViewAllProjects,
    ViewAssignedProjects,
    CreateProject,
    EditAllProjects,
    EditOwnProjects,
    DeleteProject,
    ArchiveProject,

    // Tasks
    ViewAllTasks,
    ViewAssignedTasks,
    CreateTask,
    AssignTask,
    EditAllTasks,
    EditAssignedTasks,
    DeleteTask,
    ChangeTaskStatus,

    // Calendar
    ViewCalendar,
    ViewAllEvents,
    ViewOwnEvents,
    CreateEvent,
    EditAllEvents,
    EditOwnEvents,
    DeleteEvent,

    // Team
    ViewAllTeam,
    ViewTeamMembers,
    InviteMember,
    EditMember,
    RemoveMember,
    ChangeRoles,
    ViewMemberPerformance,

    // Reports
    ViewAllReports,
    ViewTeamReports,
    ViewOwnReports,
    ExportReports,
    CreateCustomReports,

    // Time tracking
    ViewAllTimeEntries,
    ViewTeamTimeEntries,
    ViewOwnTimeEntries,
    CreateTimeEntry,
    EditAllTimeEntries,
    EditOwnTimeEntries,
    DeleteTimeEntry,
    ApproveTimeEntries,

    // Documents
    ViewAllDocuments,
    ViewProjectDocuments,
    UploadDocument,
    EditDocument,
    DeleteAllDocuments,
    DeleteOwnDocuments,
    ManageDocumentVersions,

    // Notifications
    ViewNotifications,
    ManageNotificationSettings,
    SendAnnouncements,

    // Settings
    ViewSettings,
    EditSystemSettings,
    EditOwnSettings,
    ManageIntegrations,
    ViewAuditLogs,
}

impl Permission {
    /// Every permission, grouped by module.
    pub const ALL: [Permission; 61] = [
        Permission::ViewDashboard,
        Permission::ViewAllStats,
        Permission::ViewTeamStats,
        Permission::ViewOwnStats,
        Permission::ViewAllProjects,
        Permission::ViewAssignedProjects,
        Permission::CreateProject,
        Permission::EditAllProjects,
        Permission::EditOwnProjects,
        Permission::DeleteProject,
        Permission::ArchiveProject,
        Permission::ViewAllTasks,
        Permission::ViewAssignedTasks,
        Permission::CreateTask,
        Permission::AssignTask,
        Permission::EditAllTasks,
        Permission::EditAssignedTasks,
        Permission::DeleteTask,
        Permission::ChangeTaskStatus,
        Permission::ViewCalendar,
        Permission::ViewAllEvents,
        Permission::ViewOwnEvents,
        Permission::CreateEvent,
        Permission::EditAllEvents,
        Permission::EditOwnEvents,
        Permission::DeleteEvent,
        Permission::ViewAllTeam,
        Permission::ViewTeamMembers,
        Permission::InviteMember,
        Permission::EditMember,
        Permission::RemoveMember,
        Permission::ChangeRoles,
        Permission::ViewMemberPerformance,
        Permission::ViewAllReports,
        Permission::ViewTeamReports,
        Permission::ViewOwnReports,
        Permission::ExportReports,
        Permission::CreateCustomReports,
        Permission::ViewAllTimeEntries,
        Permission::ViewTeamTimeEntries,
        Permission::ViewOwnTimeEntries,
        Permission::CreateTimeEntry,
        Permission::EditAllTimeEntries,
        Permission::EditOwnTimeEntries,
        Permission::DeleteTimeEntry,
        Permission::ApproveTimeEntries,
        Permission::ViewAllDocuments,
        Permission::ViewProjectDocuments,
        Permission::UploadDocument,
        Permission::EditDocument,
        Permission::DeleteAllDocuments,
        Permission::DeleteOwnDocuments,
        Permission::ManageDocumentVersions,
        Permission::ViewNotifications,
        Permission::ManageNotificationSettings,
        Permission::SendAnnouncements,
        Permission::ViewSettings,
        Permission::EditSystemSettings,
        Permission::EditOwnSettings,
        Permission::ManageIntegrations,
        Permission::ViewAuditLogs,
    ];

    /// Get the identifier string, e.g. `"view_dashboard"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewAllStats => "view_all_stats",
            Permission::ViewTeamStats => "view_team_stats",
            Permission::ViewOwnStats => "view_own_stats",
            Permission::ViewAllProjects => "view_all_projects",
            Permission::ViewAssignedProjects => "view_assigned_projects",
            Permission::CreateProject => "create_project",
            Permission::EditAllProjects => "edit_all_projects",
            Permission::EditOwnProjects => "edit_own_projects",
            Permission::DeleteProject => "delete_project",
            Permission::ArchiveProject => "archive_project",
            Permission::ViewAllTasks => "view_all_tasks",
            Permission::ViewAssignedTasks => "view_assigned_tasks",
            Permission::CreateTask => "create_task",
            Permission::AssignTask => "assign_task",
            Permission::EditAllTasks => "edit_all_tasks",
            Permission::EditAssignedTasks => "edit_assigned_tasks",
            Permission::DeleteTask => "delete_task",
            Permission::ChangeTaskStatus => "change_task_status",
            Permission::ViewCalendar => "view_calendar",
            Permission::ViewAllEvents => "view_all_events",
            Permission::ViewOwnEvents => "view_own_events",
            Permission::CreateEvent => "create_event",
            Permission::EditAllEvents => "edit_all_events",
            Permission::EditOwnEvents => "edit_own_events",
            Permission::DeleteEvent => "delete_event",
            Permission::ViewAllTeam => "view_all_team",
            Permission::ViewTeamMembers => "view_team_members",
            Permission::InviteMember => "invite_member",
            Permission::EditMember => "edit_member",
            Permission::RemoveMember => "remove_member",
            Permission::ChangeRoles => "change_roles",
            Permission::ViewMemberPerformance => "view_member_performance",
            Permission::ViewAllReports => "view_all_reports",
            Permission::ViewTeamReports => "view_team_reports",
            Permission::ViewOwnReports => "view_own_reports",
            Permission::ExportReports => "export_reports",
            Permission::CreateCustomReports => "create_custom_reports",
            Permission::ViewAllTimeEntries => "view_all_time_entries",
            Permission::ViewTeamTimeEntries => "view_team_time_entries",
            Permission::ViewOwnTimeEntries => "view_own_time_entries",
            Permission::CreateTimeEntry => "create_time_entry",
            Permission::EditAllTimeEntries => "edit_all_time_entries",
            Permission::EditOwnTimeEntries => "edit_own_time_entries",
            Permission::DeleteTimeEntry => "delete_time_entry",
            Permission::ApproveTimeEntries => "approve_time_entries",
            Permission::ViewAllDocuments => "view_all_documents",
            Permission::ViewProjectDocuments => "view_project_documents",
            Permission::UploadDocument => "upload_document",
            Permission::EditDocument => "edit_document",
            Permission::DeleteAllDocuments => "delete_all_documents",
            Permission::DeleteOwnDocuments => "delete_own_documents",
            Permission::ManageDocumentVersions => "manage_document_versions",
            Permission::ViewNotifications => "view_notifications",
            Permission::ManageNotificationSettings => "manage_notification_settings",
            Permission::SendAnnouncements => "send_announcements",
            Permission::ViewSettings => "view_settings",
            Permission::EditSystemSettings => "edit_system_settings",
            Permission::EditOwnSettings => "edit_own_settings",
            Permission::ManageIntegrations => "manage_integrations",
            Permission::ViewAuditLogs => "view_audit_logs",
        }
    }

    /// Parse from the identifier string.
    ///
    /// Exact match only; identifiers are machine names, not user input.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    /// The module this permission belongs to.
    pub fn module(&self) -> AppModule {
        use Permission::*;
        match self {
            ViewDashboard | ViewAllStats | ViewTeamStats | ViewOwnStats => AppModule::Dashboard,

            ViewAllProjects | ViewAssignedProjects | CreateProject | EditAllProjects
            | EditOwnProjects | DeleteProject | ArchiveProject => AppModule::Projects,

            ViewAllTasks | ViewAssignedTasks | CreateTask | AssignTask | EditAllTasks
            | EditAssignedTasks | DeleteTask | ChangeTaskStatus => AppModule::Tasks,

            ViewCalendar | ViewAllEvents | ViewOwnEvents | CreateEvent | EditAllEvents
            | EditOwnEvents | DeleteEvent => AppModule::Calendar,

            ViewAllTeam | ViewTeamMembers | InviteMember | EditMember | RemoveMember
            | ChangeRoles | ViewMemberPerformance => AppModule::Team,

            ViewAllReports | ViewTeamReports | ViewOwnReports | ExportReports
            | CreateCustomReports => AppModule::Reports,

            ViewAllTimeEntries | ViewTeamTimeEntries | ViewOwnTimeEntries | CreateTimeEntry
            | EditAllTimeEntries | EditOwnTimeEntries | DeleteTimeEntry
            | ApproveTimeEntries => AppModule::TimeTracking,

            ViewAllDocuments | ViewProjectDocuments | UploadDocument | EditDocument
            | DeleteAllDocuments | DeleteOwnDocuments
            | ManageDocumentVersions => AppModule::Documents,

            ViewNotifications | ManageNotificationSettings | SendAnnouncements => {
                AppModule::Notifications
            }

            ViewSettings | EditSystemSettings | EditOwnSettings | ManageIntegrations
            | ViewAuditLogs => AppModule::Settings,
        }
    }

    /// All permissions belonging to a module.
    pub fn for_module(module: AppModule) -> Vec<Permission> {
        Self::ALL
            .iter()
            .copied()
            .filter(|p| p.module() == module)
            .collect()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of permissions, e.g. everything a role is allowed to do.
///
/// # Example
///
/// ```
/// use workboard_rbac::{Permission, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::ViewDashboard);
/// set.add(Permission::ViewOwnStats);
///
/// assert!(set.has(Permission::ViewDashboard));
/// assert!(!set.has(Permission::ViewAllStats));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Remove a permission, returning whether it was present.
    pub fn remove(&mut self, permission: Permission) -> bool {
        self.permissions.remove(&permission)
    }

    /// Check if the set grants a permission.
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Check if the set grants at least one of `permissions`.
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(*p))
    }

    /// Check if the set grants every one of `permissions`.
    ///
    /// An empty list is trivially satisfied.
    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has(*p))
    }

    /// All permissions in the set, in declaration order.
    pub fn all(&self) -> Vec<Permission> {
        let mut perms: Vec<Permission> = self.permissions.iter().copied().collect();
        perms.sort();
        perms
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Build a set from identifier strings, skipping unknown identifiers.
    ///
    /// ```
    /// use workboard_rbac::PermissionSet;
    ///
    /// let set = PermissionSet::from_strings(&["view_dashboard", "fly_to_moon"]);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn from_strings(perms: &[&str]) -> Self {
        perms.iter().filter_map(|s| Permission::parse(s)).collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Check if this set contains all permissions from another set.
    pub fn contains_all(&self, other: &PermissionSet) -> bool {
        other.permissions.is_subset(&self.permissions)
    }

    /// Check if this set contains any permission from another set.
    pub fn contains_any(&self, other: &PermissionSet) -> bool {
        !self.permissions.is_disjoint(&other.permissions)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = &'a Permission>>(iter: T) -> Self {
        iter.into_iter().copied().collect()
    }
}
