//! Project capability table
//!
//! What each project role may do inside its project. The table is a fixed
//! record of booleans per role, mirroring how the permission screen lists
//! them.

use serde::{Deserialize, Serialize};

use crate::roles::ProjectRole;

/// A named capability inside one project.
///
/// Serialized in camelCase (`"editProject"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ProjectCapability {
    // Project management
    EditProject,
    DeleteProject,
    ArchiveProject,

    // Team management
    AddTeamMember,
    RemoveTeamMember,
    ChangeUserRole,
    AssignAdmin,
    AssignMember,

    // Task management
    CreateTask,
    EditAllTasks,
    DeleteTask,
    AssignTask,

    // Document management
    UploadDocument,
    DeleteDocument,

    // Reports
    ViewReports,
    ExportReports,

    // Time tracking
    ViewAllTimeEntries,
    EditAllTimeEntries,
}

impl ProjectCapability {
    /// Every capability.
    pub const ALL: [ProjectCapability; 18] = [
        ProjectCapability::EditProject,
        ProjectCapability::DeleteProject,
        ProjectCapability::ArchiveProject,
        ProjectCapability::AddTeamMember,
        ProjectCapability::RemoveTeamMember,
        ProjectCapability::ChangeUserRole,
        ProjectCapability::AssignAdmin,
        ProjectCapability::AssignMember,
        ProjectCapability::CreateTask,
        ProjectCapability::EditAllTasks,
        ProjectCapability::DeleteTask,
        ProjectCapability::AssignTask,
        ProjectCapability::UploadDocument,
        ProjectCapability::DeleteDocument,
        ProjectCapability::ViewReports,
        ProjectCapability::ExportReports,
        ProjectCapability::ViewAllTimeEntries,
        ProjectCapability::EditAllTimeEntries,
    ];

    /// Capability name, e.g. `"editProject"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCapability::EditProject => "editProject",
            ProjectCapability::DeleteProject => "deleteProject",
            ProjectCapability::ArchiveProject => "archiveProject",
            ProjectCapability::AddTeamMember => "addTeamMember",
            ProjectCapability::RemoveTeamMember => "removeTeamMember",
            ProjectCapability::ChangeUserRole => "changeUserRole",
            ProjectCapability::AssignAdmin => "assignAdmin",
            ProjectCapability::AssignMember => "assignMember",
            ProjectCapability::CreateTask => "createTask",
            ProjectCapability::EditAllTasks => "editAllTasks",
            ProjectCapability::DeleteTask => "deleteTask",
            ProjectCapability::AssignTask => "assignTask",
            ProjectCapability::UploadDocument => "uploadDocument",
            ProjectCapability::DeleteDocument => "deleteDocument",
            ProjectCapability::ViewReports => "viewReports",
            ProjectCapability::ExportReports => "exportReports",
            ProjectCapability::ViewAllTimeEntries => "viewAllTimeEntries",
            ProjectCapability::EditAllTimeEntries => "editAllTimeEntries",
        }
    }

    /// Parse a capability name. Exact match.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for ProjectCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The boolean capability record of one project role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRecord {
    pub edit_project: bool,
    pub delete_project: bool,
    pub archive_project: bool,

    pub add_team_member: bool,
    pub remove_team_member: bool,
    pub change_user_role: bool,
    pub assign_admin: bool,
    pub assign_member: bool,

    pub create_task: bool,
    pub edit_all_tasks: bool,
    pub delete_task: bool,
    pub assign_task: bool,

    pub upload_document: bool,
    pub delete_document: bool,

    pub view_reports: bool,
    pub export_reports: bool,

    pub view_all_time_entries: bool,
    pub edit_all_time_entries: bool,
}

impl CapabilityRecord {
    /// Managers can do everything in their project.
    pub const MANAGER: CapabilityRecord = CapabilityRecord {
        edit_project: true,
        delete_project: true,
        archive_project: true,
        add_team_member: true,
        remove_team_member: true,
        change_user_role: true,
        assign_admin: true,
        assign_member: true,
        create_task: true,
        edit_all_tasks: true,
        delete_task: true,
        assign_task: true,
        upload_document: true,
        delete_document: true,
        view_reports: true,
        export_reports: true,
        view_all_time_entries: true,
        edit_all_time_entries: true,
    };

    /// Admins run the project day to day but cannot delete, archive or change roles.
    pub const ADMIN: CapabilityRecord = CapabilityRecord {
        edit_project: true,
        delete_project: false,
        archive_project: false,
        add_team_member: true,
        remove_team_member: true,
        change_user_role: false,
        assign_admin: false,
        assign_member: true,
        create_task: true,
        edit_all_tasks: true,
        delete_task: true,
        assign_task: true,
        upload_document: true,
        delete_document: true,
        view_reports: true,
        export_reports: true,
        view_all_time_entries: true,
        edit_all_time_entries: false,
    };

    /// Members create tasks, upload documents and read reports.
    pub const MEMBER: CapabilityRecord = CapabilityRecord {
        edit_project: false,
        delete_project: false,
        archive_project: false,
        add_team_member: false,
        remove_team_member: false,
        change_user_role: false,
        assign_admin: false,
        assign_member: false,
        create_task: true,
        edit_all_tasks: false,
        delete_task: false,
        assign_task: false,
        upload_document: true,
        delete_document: false,
        view_reports: true,
        export_reports: false,
        view_all_time_entries: false,
        edit_all_time_entries: false,
    };

    /// Look up one capability.
    pub fn get(&self, capability: ProjectCapability) -> bool {
        match capability {
            ProjectCapability::EditProject => self.edit_project,
            ProjectCapability::DeleteProject => self.delete_project,
            ProjectCapability::ArchiveProject => self.archive_project,
            ProjectCapability::AddTeamMember => self.add_team_member,
            ProjectCapability::RemoveTeamMember => self.remove_team_member,
            ProjectCapability::ChangeUserRole => self.change_user_role,
            ProjectCapability::AssignAdmin => self.assign_admin,
            ProjectCapability::AssignMember => self.assign_member,
            ProjectCapability::CreateTask => self.create_task,
            ProjectCapability::EditAllTasks => self.edit_all_tasks,
            ProjectCapability::DeleteTask => self.delete_task,
            ProjectCapability::AssignTask => self.assign_task,
            ProjectCapability::UploadDocument => self.upload_document,
            ProjectCapability::DeleteDocument => self.delete_document,
            ProjectCapability::ViewReports => self.view_reports,
            ProjectCapability::ExportReports => self.export_reports,
            ProjectCapability::ViewAllTimeEntries => self.view_all_time_entries,
            ProjectCapability::EditAllTimeEntries => self.edit_all_time_entries,
        }
    }

    /// Every capability set to true.
    pub fn granted(&self) -> Vec<ProjectCapability> {
        ProjectCapability::ALL
            .iter()
            .copied()
            .filter(|c| self.get(*c))
            .collect()
    }
}

impl ProjectRole {
    /// The role's capability record.
    pub fn capabilities(&self) -> &'static CapabilityRecord {
        match self {
            ProjectRole::Manager => &CapabilityRecord::MANAGER,
            ProjectRole::Admin => &CapabilityRecord::ADMIN,
            ProjectRole::Member => &CapabilityRecord::MEMBER,
        }
    }

    /// Check whether the role holds `capability`.
    pub fn allows(&self, capability: ProjectCapability) -> bool {
        self.capabilities().get(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_holds_everything() {
        assert_eq!(CapabilityRecord::MANAGER.granted().len(), ProjectCapability::ALL.len());
    }

    #[test]
    fn test_admin_record() {
        let denied: Vec<ProjectCapability> = ProjectCapability::ALL
            .iter()
            .copied()
            .filter(|c| !ProjectRole::Admin.allows(*c))
            .collect();
        assert_eq!(
            denied,
            vec![
                ProjectCapability::DeleteProject,
                ProjectCapability::ArchiveProject,
                ProjectCapability::ChangeUserRole,
                ProjectCapability::AssignAdmin,
                ProjectCapability::EditAllTimeEntries,
            ]
        );
    }

    #[test]
    fn test_member_record() {
        assert_eq!(
            ProjectRole::Member.capabilities().granted(),
            vec![
                ProjectCapability::CreateTask,
                ProjectCapability::UploadDocument,
                ProjectCapability::ViewReports,
            ]
        );
    }

    #[test]
    fn test_assign_flags_agree_with_assignable_roles() {
        for role in ProjectRole::ALL {
            assert_eq!(
                role.allows(ProjectCapability::AssignAdmin),
                role.can_assign(ProjectRole::Admin)
            );
            assert_eq!(
                role.allows(ProjectCapability::AssignMember),
                role.can_assign(ProjectRole::Member)
            );
        }
    }

    #[test]
    fn test_capability_names() {
        for cap in ProjectCapability::ALL {
            assert_eq!(ProjectCapability::parse(cap.as_str()), Some(cap));
        }
        assert_eq!(ProjectCapability::parse("deleteEverything"), None);

        let json = serde_json::to_string(&ProjectCapability::ViewAllTimeEntries).unwrap();
        assert_eq!(json, "\"viewAllTimeEntries\"");
    }
}
