//! Project domain models
//!
//! A project owns its team. Every mutating operation takes the acting user
//! and checks the actor's project capability before touching anything, so
//! a `Project` can never be left half-updated by a denied call.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::capabilities::ProjectCapability;
use crate::error::{ProjectError, ProjectResult};
use crate::membership::TeamMembership;
use crate::roles::ProjectRole;
use crate::user::{User, UserId};

/// Opaque project identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Every status, in the order the edit form lists them.
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::Planning,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    /// Parse status from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planning" => Some(Self::Planning),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "on_hold" | "on-hold" => Some(Self::OnHold),
            _ => None,
        }
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    /// CSS classes for the status badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Active => "bg-green-100 text-green-700 border-green-200",
            Self::Planning => "bg-blue-100 text-blue-700 border-blue-200",
            Self::Completed => "bg-gray-100 text-gray-700 border-gray-200",
            Self::OnHold => "bg-orange-100 text-orange-700 border-orange-200",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project and its team.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use workboard_org::{Project, ProjectDraft, ProjectRole, User};
/// use workboard_rbac::UserRole;
///
/// let creator = User::new("user1", "John Doe", "user@example.com", UserRole::Manager);
/// let draft = ProjectDraft::new(
///     "Website Redesign",
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// );
/// let project = Project::new(draft, &creator).unwrap();
///
/// assert_eq!(project.role_of(&creator.id), Some(ProjectRole::Manager));
/// assert_eq!(project.progress, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier for the project
    pub id: ProjectId,

    /// Human-readable name
    pub name: String,

    /// Project description
    #[serde(default)]
    pub description: String,

    /// What the project is meant to achieve
    #[serde(default)]
    pub objective: String,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Completion percentage, 0..=100
    pub progress: u8,

    /// Start date
    pub start_date: NaiveDate,

    /// End date, never before the start date
    pub end_date: NaiveDate,

    /// Colour tag for UI theming
    pub color: Option<String>,

    /// Whether the project is archived
    #[serde(default)]
    pub is_archived: bool,

    /// User who created the project
    pub created_by: UserId,

    /// When the project was created
    pub created_at: NaiveDate,

    /// Team memberships, at most one per user
    #[serde(default)]
    pub team: Vec<TeamMembership>,
}

impl Project {
    /// Creates a project from a draft.
    ///
    /// The creator becomes the project manager. Whether the creator may
    /// create projects at all is an app-wide question answered by the
    /// global role table, not here.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, progress above 100 or
    /// an end date before the start date.
    pub fn new(draft: ProjectDraft, creator: &User) -> ProjectResult<Self> {
        let project = Self {
            id: ProjectId::generate(),
            name: draft.name,
            description: draft.description,
            objective: draft.objective,
            status: draft.status,
            progress: draft.progress,
            start_date: draft.start_date,
            end_date: draft.end_date,
            color: draft.color,
            is_archived: false,
            created_by: creator.id.clone(),
            created_at: Utc::now().date_naive(),
            team: vec![TeamMembership::for_user(creator, ProjectRole::Manager)],
        };
        project.validate()?;
        Ok(project)
    }

    /// Set the identifier, for fixtures and records loaded from elsewhere.
    pub fn with_id(mut self, id: impl Into<ProjectId>) -> Self {
        self.id = id.into();
        self
    }

    /// Check field invariants.
    pub fn validate(&self) -> ProjectResult<()> {
        if self.name.trim().is_empty() {
            return Err(ProjectError::EmptyName);
        }
        if self.progress > 100 {
            return Err(ProjectError::InvalidProgress(self.progress));
        }
        if self.end_date < self.start_date {
            return Err(ProjectError::InvalidDates);
        }
        Ok(())
    }

    /// Membership of `user_id`, if any.
    pub fn member(&self, user_id: &UserId) -> Option<&TeamMembership> {
        self.team.iter().find(|m| &m.user_id == user_id)
    }

    /// Role of `user_id` in this project.
    pub fn role_of(&self, user_id: &UserId) -> Option<ProjectRole> {
        self.member(user_id).map(|m| m.role)
    }

    /// The manager's membership.
    pub fn manager(&self) -> Option<&TeamMembership> {
        self.team.iter().find(|m| m.is_manager())
    }

    /// Check whether `user_id` is on the team.
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.member(user_id).is_some()
    }

    /// Require that `actor` holds `capability`, returning the actor's role.
    ///
    /// Non-members hold no capabilities.
    pub fn ensure(&self, actor: &UserId, capability: ProjectCapability) -> ProjectResult<ProjectRole> {
        match self.role_of(actor) {
            Some(role) if role.allows(capability) => Ok(role),
            _ => Err(ProjectError::Forbidden { capability }),
        }
    }

    /// Apply an edit. Requires `editProject`.
    ///
    /// The update is validated against the merged result before anything
    /// is written.
    pub fn update(&mut self, actor: &UserId, update: ProjectUpdate) -> ProjectResult<()> {
        self.ensure(actor, ProjectCapability::EditProject)?;

        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(objective) = update.objective {
            next.objective = objective;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(progress) = update.progress {
            next.progress = progress;
        }
        if let Some(start_date) = update.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            next.end_date = end_date;
        }
        if let Some(color) = update.color {
            next.color = Some(color);
        }
        next.validate()?;

        *self = next;
        Ok(())
    }

    /// Archive the project. Requires `archiveProject`.
    pub fn archive(&mut self, actor: &UserId) -> ProjectResult<()> {
        self.ensure(actor, ProjectCapability::ArchiveProject)?;
        self.is_archived = true;
        Ok(())
    }

    /// Bring an archived project back. Requires `archiveProject`.
    pub fn unarchive(&mut self, actor: &UserId) -> ProjectResult<()> {
        self.ensure(actor, ProjectCapability::ArchiveProject)?;
        self.is_archived = false;
        Ok(())
    }

    /// Add a member to the team.
    ///
    /// Requires `addTeamMember`, and the new member's role must be one the
    /// actor may assign.
    ///
    /// # Errors
    ///
    /// * `Forbidden` - actor lacks `addTeamMember`
    /// * `RoleNotAssignable` - role is at or above the actor's own
    /// * `DuplicateMember` - the user is already on the team
    pub fn add_member(&mut self, actor: &UserId, membership: TeamMembership) -> ProjectResult<()> {
        let actor_role = self.ensure(actor, ProjectCapability::AddTeamMember)?;
        if !actor_role.can_assign(membership.role) {
            return Err(ProjectError::RoleNotAssignable {
                role: membership.role,
                actor_role,
            });
        }
        if self.is_member(&membership.user_id) {
            return Err(ProjectError::DuplicateMember(membership.user_id));
        }

        self.team.push(membership);
        Ok(())
    }

    /// Remove a member from the team and return the removed membership.
    ///
    /// Requires `removeTeamMember`. The manager is never removable, and the
    /// actor may only remove members whose role they could assign.
    pub fn remove_member(&mut self, actor: &UserId, user_id: &UserId) -> ProjectResult<TeamMembership> {
        let actor_role = self.ensure(actor, ProjectCapability::RemoveTeamMember)?;
        let index = self
            .team
            .iter()
            .position(|m| &m.user_id == user_id)
            .ok_or_else(|| ProjectError::NotAMember(user_id.clone()))?;

        let target_role = self.team[index].role;
        if target_role == ProjectRole::Manager {
            return Err(ProjectError::ManagerProtected);
        }
        if !actor_role.can_assign(target_role) {
            return Err(ProjectError::RoleNotAssignable {
                role: target_role,
                actor_role,
            });
        }

        Ok(self.team.remove(index))
    }

    /// Change a member's role.
    ///
    /// Requires `changeUserRole`; the new role must be assignable by the
    /// actor and the manager's role never changes.
    pub fn change_member_role(
        &mut self,
        actor: &UserId,
        user_id: &UserId,
        role: ProjectRole,
    ) -> ProjectResult<()> {
        let actor_role = self.ensure(actor, ProjectCapability::ChangeUserRole)?;
        let target = self
            .team
            .iter_mut()
            .find(|m| &m.user_id == user_id)
            .ok_or_else(|| ProjectError::NotAMember(user_id.clone()))?;

        if target.is_manager() {
            return Err(ProjectError::ManagerProtected);
        }
        if !actor_role.can_assign(role) {
            return Err(ProjectError::RoleNotAssignable { role, actor_role });
        }

        target.role = role;
        Ok(())
    }

    /// Lightweight summary as seen by `viewer`.
    pub fn summary_for(&self, viewer: &UserId) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            status: self.status,
            progress: self.progress,
            is_archived: self.is_archived,
            user_role: self.role_of(viewer),
            team_size: self.team.len(),
        }
    }
}

/// Input for [`Project::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub color: Option<String>,
}

impl ProjectDraft {
    /// A planning-stage draft with the given name and dates.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            objective: String::new(),
            status: ProjectStatus::Planning,
            progress: 0,
            start_date,
            end_date,
            color: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Partial edit for [`Project::update`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub color: Option<String>,
}

impl ProjectUpdate {
    /// Names of the fields this update sets, in camelCase.
    pub fn changed_fields(&self) -> Vec<String> {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("objective", self.objective.is_some()),
            ("status", self.status.is_some()),
            ("progress", self.progress.is_some()),
            ("startDate", self.start_date.is_some()),
            ("endDate", self.end_date.is_some()),
            ("color", self.color.is_some()),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(field, _)| field.to_string())
        .collect()
    }
}

/// Summary of a project for list displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project ID
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Colour tag
    pub color: Option<String>,

    /// Status
    pub status: ProjectStatus,

    /// Progress percentage
    pub progress: u8,

    /// Whether archived
    pub is_archived: bool,

    /// Viewer's role in this project (if any)
    pub user_role: Option<ProjectRole>,

    /// Number of team members
    pub team_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use workboard_rbac::UserRole;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn john() -> User {
        User::new("user1", "John Doe", "user@example.com", UserRole::Manager)
    }

    fn project_with_team() -> Project {
        let mut project = Project::new(
            ProjectDraft::new("Website Redesign", date(2025, 1, 1), date(2025, 3, 31)),
            &john(),
        )
        .unwrap();
        project.team.push(TeamMembership::new(
            "user2",
            "Jane Smith",
            "jane@example.com",
            ProjectRole::Admin,
        ));
        project.team.push(TeamMembership::new(
            "user3",
            "Mike Johnson",
            "mike@example.com",
            ProjectRole::Member,
        ));
        project
    }

    fn id(s: &str) -> UserId {
        UserId::from(s)
    }

    #[test]
    fn test_creator_becomes_manager() {
        let project = Project::new(
            ProjectDraft::new("API Integration", date(2025, 2, 1), date(2025, 4, 30)),
            &john(),
        )
        .unwrap();

        assert_eq!(project.team.len(), 1);
        assert_eq!(project.role_of(&id("user1")), Some(ProjectRole::Manager));
        assert_eq!(project.created_by, id("user1"));
        assert_eq!(project.status, ProjectStatus::Planning);
        assert!(!project.is_archived);
    }

    #[test]
    fn test_new_project_validation() {
        let backwards = ProjectDraft::new("Backwards", date(2025, 3, 1), date(2025, 2, 1));
        assert_eq!(Project::new(backwards, &john()), Err(ProjectError::InvalidDates));

        let blank = ProjectDraft::new("   ", date(2025, 1, 1), date(2025, 1, 1));
        assert_eq!(Project::new(blank, &john()), Err(ProjectError::EmptyName));

        let overfull =
            ProjectDraft::new("Overfull", date(2025, 1, 1), date(2025, 1, 2)).with_progress(101);
        assert_eq!(
            Project::new(overfull, &john()),
            Err(ProjectError::InvalidProgress(101))
        );
    }

    #[test]
    fn test_update_requires_edit_capability() {
        let mut project = project_with_team();
        let update = ProjectUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        let err = project.update(&id("user3"), update.clone()).unwrap_err();
        assert_eq!(
            err,
            ProjectError::Forbidden {
                capability: ProjectCapability::EditProject
            }
        );

        project.update(&id("user2"), update).unwrap();
        assert_eq!(project.name, "Renamed");
    }

    #[test]
    fn test_invalid_update_leaves_project_untouched() {
        let mut project = project_with_team();
        let before = project.clone();
        let update = ProjectUpdate {
            name: Some("Changed".to_string()),
            end_date: Some(date(2024, 12, 1)),
            ..Default::default()
        };

        assert_eq!(
            project.update(&id("user1"), update),
            Err(ProjectError::InvalidDates)
        );
        assert_eq!(project, before);
    }

    #[test]
    fn test_archive_is_manager_only() {
        let mut project = project_with_team();
        assert!(project.archive(&id("user2")).is_err());
        project.archive(&id("user1")).unwrap();
        assert!(project.is_archived);
        project.unarchive(&id("user1")).unwrap();
        assert!(!project.is_archived);
    }

    #[test]
    fn test_add_member_rules() {
        let mut project = project_with_team();
        let sarah = TeamMembership::new("user4", "Sarah Wilson", "sarah@example.com", ProjectRole::Admin);

        // Admins may only add members
        assert_eq!(
            project.add_member(&id("user2"), sarah.clone()),
            Err(ProjectError::RoleNotAssignable {
                role: ProjectRole::Admin,
                actor_role: ProjectRole::Admin
            })
        );

        // Members may not add anyone
        assert!(matches!(
            project.add_member(&id("user3"), sarah.clone()),
            Err(ProjectError::Forbidden { .. })
        ));

        project.add_member(&id("user1"), sarah.clone()).unwrap();
        assert_eq!(project.role_of(&id("user4")), Some(ProjectRole::Admin));

        // Duplicates are rejected
        let again = TeamMembership { role: ProjectRole::Member, ..sarah };
        assert_eq!(
            project.add_member(&id("user1"), again),
            Err(ProjectError::DuplicateMember(id("user4")))
        );
    }

    #[test]
    fn test_nobody_adds_a_second_manager() {
        let mut project = project_with_team();
        let boss = TeamMembership::new("user4", "Sarah Wilson", "sarah@example.com", ProjectRole::Manager);
        assert!(matches!(
            project.add_member(&id("user1"), boss),
            Err(ProjectError::RoleNotAssignable { .. })
        ));
    }

    #[test]
    fn test_remove_member_rules() {
        let mut project = project_with_team();

        assert_eq!(
            project.remove_member(&id("user2"), &id("user1")),
            Err(ProjectError::ManagerProtected)
        );
        assert_eq!(
            project.remove_member(&id("user1"), &id("user1")),
            Err(ProjectError::ManagerProtected)
        );
        assert_eq!(
            project.remove_member(&id("user1"), &id("user9")),
            Err(ProjectError::NotAMember(id("user9")))
        );

        let removed = project.remove_member(&id("user2"), &id("user3")).unwrap();
        assert_eq!(removed.name, "Mike Johnson");
        assert!(!project.is_member(&id("user3")));
    }

    #[test]
    fn test_admin_cannot_remove_peer_admin() {
        let mut project = project_with_team();
        project.team.push(TeamMembership::new(
            "user4",
            "Sarah Wilson",
            "sarah@example.com",
            ProjectRole::Admin,
        ));

        assert!(matches!(
            project.remove_member(&id("user2"), &id("user4")),
            Err(ProjectError::RoleNotAssignable { .. })
        ));
        project.remove_member(&id("user1"), &id("user4")).unwrap();
    }

    #[test]
    fn test_change_member_role_rules() {
        let mut project = project_with_team();

        // Admins lack changeUserRole
        assert!(matches!(
            project.change_member_role(&id("user2"), &id("user3"), ProjectRole::Member),
            Err(ProjectError::Forbidden { .. })
        ));

        // The manager's role is fixed
        assert_eq!(
            project.change_member_role(&id("user1"), &id("user1"), ProjectRole::Admin),
            Err(ProjectError::ManagerProtected)
        );

        // Nobody hands out manager
        assert!(matches!(
            project.change_member_role(&id("user1"), &id("user2"), ProjectRole::Manager),
            Err(ProjectError::RoleNotAssignable { .. })
        ));

        project
            .change_member_role(&id("user1"), &id("user3"), ProjectRole::Admin)
            .unwrap();
        assert_eq!(project.role_of(&id("user3")), Some(ProjectRole::Admin));
        assert_eq!(project.team.iter().filter(|m| m.is_manager()).count(), 1);
    }

    #[test]
    fn test_status_helpers() {
        assert_eq!(ProjectStatus::parse("on_hold"), Some(ProjectStatus::OnHold));
        assert_eq!(ProjectStatus::parse("cancelled"), None);
        assert_eq!(ProjectStatus::OnHold.label(), "On Hold");
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnHold).unwrap(),
            "\"on_hold\""
        );
    }

    #[test]
    fn test_summary_for_viewer() {
        let project = project_with_team();
        let summary = project.summary_for(&id("user2"));
        assert_eq!(summary.user_role, Some(ProjectRole::Admin));
        assert_eq!(summary.team_size, 3);

        assert_eq!(project.summary_for(&id("user9")).user_role, None);
    }

    #[test]
    fn test_update_changed_fields() {
        let update = ProjectUpdate {
            progress: Some(40),
            end_date: Some(date(2025, 6, 30)),
            ..Default::default()
        };
        assert_eq!(update.changed_fields(), vec!["progress", "endDate"]);
        assert!(ProjectUpdate::default().changed_fields().is_empty());
    }
}
