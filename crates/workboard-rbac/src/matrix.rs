//! # Role Permission Matrix
//!
//! The static allow-lists mapping each global role to its permissions and
//! to the modules it may open. Everything here is a pure function over
//! constant data.

use crate::modules::AppModule;
use crate::permissions::{Permission, PermissionSet};
use crate::roles::UserRole;

use Permission::*;

const ADMIN_PERMISSIONS: &[Permission] = &[
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
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    // Dashboard: team stats
    ViewDashboard,
    ViewTeamStats,
    ViewOwnStats,
    // Projects: own projects
    ViewAllProjects,
    ViewAssignedProjects,
    CreateProject,
    EditOwnProjects,
    ArchiveProject,
    // Tasks: team tasks
    ViewAllTasks,
    ViewAssignedTasks,
    CreateTask,
    AssignTask,
    EditAssignedTasks,
    ChangeTaskStatus,
    // Calendar: team calendar
    ViewCalendar,
    ViewAllEvents,
    ViewOwnEvents,
    CreateEvent,
    EditOwnEvents,
    // Team
    ViewAllTeam,
    ViewTeamMembers,
    InviteMember,
    ViewMemberPerformance,
    // Reports: team reports
    ViewTeamReports,
    ViewOwnReports,
    ExportReports,
    CreateCustomReports,
    // Time tracking: approves team entries
    ViewTeamTimeEntries,
    ViewOwnTimeEntries,
    CreateTimeEntry,
    EditOwnTimeEntries,
    ApproveTimeEntries,
    // Documents
    ViewAllDocuments,
    ViewProjectDocuments,
    UploadDocument,
    EditDocument,
    DeleteOwnDocuments,
    ManageDocumentVersions,
    // Notifications
    ViewNotifications,
    ManageNotificationSettings,
    // Settings: own only
    ViewSettings,
    EditOwnSettings,
];

const MEMBER_PERMISSIONS: &[Permission] = &[
    ViewDashboard,
    ViewOwnStats,
    ViewAssignedProjects,
    ViewAssignedTasks,
    ChangeTaskStatus,
    ViewCalendar,
    ViewOwnEvents,
    ViewTeamMembers,
    ViewOwnReports,
    ViewOwnTimeEntries,
    CreateTimeEntry,
    EditOwnTimeEntries,
    ViewProjectDocuments,
    UploadDocument,
    DeleteOwnDocuments,
    ViewNotifications,
    ManageNotificationSettings,
    ViewSettings,
    EditOwnSettings,
];

const ADMIN_MODULES: &[AppModule] = &AppModule::ALL;

const MANAGER_MODULES: &[AppModule] = &AppModule::ALL;

const MEMBER_MODULES: &[AppModule] = &[
    AppModule::Dashboard,
    AppModule::Tasks,
    AppModule::Calendar,
    AppModule::Team,
    AppModule::TimeTracking,
    AppModule::Documents,
    AppModule::Notifications,
    AppModule::Settings,
];

impl UserRole {
    /// The role's static permission allow-list.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            UserRole::Admin => ADMIN_PERMISSIONS,
            UserRole::Manager => MANAGER_PERMISSIONS,
            UserRole::Member => MEMBER_PERMISSIONS,
        }
    }

    /// The modules the role may open, in sidebar order.
    pub fn modules(&self) -> &'static [AppModule] {
        match self {
            UserRole::Admin => ADMIN_MODULES,
            UserRole::Manager => MANAGER_MODULES,
            UserRole::Member => MEMBER_MODULES,
        }
    }
}

/// Check whether `role` holds `permission`.
///
/// # Example
///
/// ```
/// use workboard_rbac::{has_permission, Permission, UserRole};
///
/// assert!(has_permission(UserRole::Manager, Permission::CreateProject));
/// assert!(!has_permission(UserRole::Member, Permission::CreateProject));
/// ```
pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    role.permissions().contains(&permission)
}

/// Check whether `role` holds at least one of `permissions`.
pub fn has_any_permission(role: UserRole, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(role, *p))
}

/// Check whether `role` holds every one of `permissions`.
pub fn has_all_permissions(role: UserRole, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(role, *p))
}

/// Check whether `role` may open `module`.
pub fn can_access_module(role: UserRole, module: AppModule) -> bool {
    role.modules().contains(&module)
}

/// Get every permission of `role` as a set.
pub fn role_permissions(role: UserRole) -> PermissionSet {
    role.permissions().iter().collect()
}

/// Get the modules `role` may open, in sidebar order.
pub fn accessible_modules(role: UserRole) -> Vec<AppModule> {
    role.modules().to_vec()
}

/// String-boundary variant of [`has_permission`].
///
/// Unknown roles or permission identifiers deny.
///
/// ```
/// use workboard_rbac::check_permission;
///
/// assert!(check_permission("admin", "view_audit_logs"));
/// assert!(!check_permission("owner", "view_audit_logs"));
/// assert!(!check_permission("admin", "view_secrets"));
/// ```
pub fn check_permission(role: &str, permission: &str) -> bool {
    match (UserRole::parse(role), Permission::parse(permission)) {
        (Some(role), Some(permission)) => has_permission(role, permission),
        _ => false,
    }
}

/// String-boundary variant of [`can_access_module`].
///
/// Unknown roles or module names deny.
pub fn check_module_access(role: &str, module: &str) -> bool {
    match (UserRole::parse(role), AppModule::parse(module)) {
        (Some(role), Some(module)) => can_access_module(role, module),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Expected allow-lists as identifier strings, independent of the enum tables.
    fn expected(role: UserRole) -> HashSet<&'static str> {
        let names: &[&str] = match role {
            UserRole::Admin => &[
                "view_dashboard", "view_all_stats", "view_team_stats", "view_own_stats",
                "view_all_projects", "view_assigned_projects", "create_project",
                "edit_all_projects", "edit_own_projects", "delete_project", "archive_project",
                "view_all_tasks", "view_assigned_tasks", "create_task", "assign_task",
                "edit_all_tasks", "edit_assigned_tasks", "delete_task", "change_task_status",
                "view_calendar", "view_all_events", "view_own_events", "create_event",
                "edit_all_events", "edit_own_events", "delete_event",
                "view_all_team", "view_team_members", "invite_member", "edit_member",
                "remove_member", "change_roles", "view_member_performance",
                "view_all_reports", "view_team_reports", "view_own_reports", "export_reports",
                "create_custom_reports",
                "view_all_time_entries", "view_team_time_entries", "view_own_time_entries",
                "create_time_entry", "edit_all_time_entries", "edit_own_time_entries",
                "delete_time_entry", "approve_time_entries",
                "view_all_documents", "view_project_documents", "upload_document",
                "edit_document", "delete_all_documents", "delete_own_documents",
                "manage_document_versions",
                "view_notifications", "manage_notification_settings", "send_announcements",
                "view_settings", "edit_system_settings", "edit_own_settings",
                "manage_integrations", "view_audit_logs",
            ],
            UserRole::Manager => &[
                "view_dashboard", "view_team_stats", "view_own_stats",
                "view_all_projects", "view_assigned_projects", "create_project",
                "edit_own_projects", "archive_project",
                "view_all_tasks", "view_assigned_tasks", "create_task", "assign_task",
                "edit_assigned_tasks", "change_task_status",
                "view_calendar", "view_all_events", "view_own_events", "create_event",
                "edit_own_events",
                "view_all_team", "view_team_members", "invite_member", "view_member_performance",
                "view_team_reports", "view_own_reports", "export_reports", "create_custom_reports",
                "view_team_time_entries", "view_own_time_entries", "create_time_entry",
                "edit_own_time_entries", "approve_time_entries",
                "view_all_documents", "view_project_documents", "upload_document",
                "edit_document", "delete_own_documents", "manage_document_versions",
                "view_notifications", "manage_notification_settings",
                "view_settings", "edit_own_settings",
            ],
            UserRole::Member => &[
                "view_dashboard", "view_own_stats", "view_assigned_projects",
                "view_assigned_tasks", "change_task_status", "view_calendar", "view_own_events",
                "view_team_members", "view_own_reports", "view_own_time_entries",
                "create_time_entry", "edit_own_time_entries", "view_project_documents",
                "upload_document", "delete_own_documents", "view_notifications",
                "manage_notification_settings", "view_settings", "edit_own_settings",
            ],
        };
        names.iter().copied().collect()
    }

    #[test]
    fn test_every_role_permission_pair_matches_table() {
        for role in UserRole::ALL {
            let allowed = expected(role);
            for perm in Permission::ALL {
                assert_eq!(
                    has_permission(role, perm),
                    allowed.contains(perm.as_str()),
                    "{} / {}",
                    role,
                    perm
                );
            }
        }
    }

    #[test]
    fn test_role_tables_have_no_duplicates() {
        for role in UserRole::ALL {
            assert_eq!(role_permissions(role).len(), role.permissions().len());
        }
        assert_eq!(role_permissions(UserRole::Admin).len(), Permission::ALL.len());
    }

    #[test]
    fn test_any_and_all_permissions() {
        let stats = [Permission::ViewAllStats, Permission::ViewTeamStats];
        assert!(has_any_permission(UserRole::Manager, &stats));
        assert!(!has_all_permissions(UserRole::Manager, &stats));
        assert!(has_all_permissions(UserRole::Admin, &stats));
        assert!(!has_any_permission(UserRole::Member, &stats));
        assert!(has_all_permissions(UserRole::Member, &[]));
        assert!(!has_any_permission(UserRole::Admin, &[]));
    }

    #[test]
    fn test_module_access() {
        assert_eq!(accessible_modules(UserRole::Admin).len(), 10);
        assert_eq!(accessible_modules(UserRole::Manager).len(), 10);

        let member = accessible_modules(UserRole::Member);
        assert_eq!(member.len(), 8);
        assert!(!member.contains(&AppModule::Projects));
        assert!(!member.contains(&AppModule::Reports));
        assert!(can_access_module(UserRole::Member, AppModule::TimeTracking));
        assert!(!can_access_module(UserRole::Member, AppModule::Reports));
    }

    #[test]
    fn test_string_boundary_fails_closed() {
        assert!(check_permission("manager", "create_project"));
        assert!(!check_permission("member", "create_project"));
        assert!(!check_permission("guest", "view_dashboard"));
        assert!(!check_permission("member", "view_everything"));

        assert!(check_module_access("member", "time-tracking"));
        assert!(!check_module_access("member", "reports"));
        assert!(!check_module_access("root", "dashboard"));
        assert!(!check_module_access("admin", "billing"));
    }

    #[test]
    fn test_lookups_are_stable() {
        for role in UserRole::ALL {
            for perm in Permission::ALL {
                assert_eq!(has_permission(role, perm), has_permission(role, perm));
            }
        }
    }
}
