//! Application state store
//!
//! One [`AppState`] owns every record of the app behind a single
//! `tokio::sync::RwLock`. Reads take the read lock and return clones; writes
//! check the actor's permissions, mutate under the write lock, release it and
//! then announce what changed on the event bus.
//!
//! This module holds the store itself plus project and team operations; the
//! other record kinds add their operations in their own modules.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use workboard_events::{
    Event, EventBus, MemoryEventBus, NotificationEvent, ProjectEvent, TeamEvent,
};
use workboard_org::{
    AccessContext, Project, ProjectCapability, ProjectDraft, ProjectError, ProjectId, ProjectRole,
    ProjectSummary, ProjectUpdate, TeamMembership, User, UserId,
};
use workboard_rbac::Permission;

use crate::calendar::CalendarEvent;
use crate::documents::Document;
use crate::error::{StoreError, StoreResult};
use crate::notifications::{Inbox, Notification, NotificationDraft, NotificationKind};
use crate::tasks::Task;
use crate::time::TimeEntry;

/// Every record the store holds.
#[derive(Debug, Default, Clone)]
pub(crate) struct StateData {
    pub(crate) projects: Vec<Project>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) calendar: Vec<CalendarEvent>,
    pub(crate) time_entries: Vec<TimeEntry>,
    pub(crate) documents: Vec<Document>,
    pub(crate) inboxes: HashMap<UserId, Inbox>,
}

impl StateData {
    pub(crate) fn project(&self, id: &ProjectId) -> StoreResult<&Project> {
        self.projects
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found("project", id))
    }

    pub(crate) fn project_mut(&mut self, id: &ProjectId) -> StoreResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found("project", id))
    }

    /// Ids of the projects `actor` sees when `scope` is the "see everything"
    /// permission for the record kind.
    pub(crate) fn visible_project_ids(&self, actor: &User, scope: Permission) -> HashSet<ProjectId> {
        let sees_all = AccessContext::new(actor).can(scope);
        self.projects
            .iter()
            .filter(|p| sees_all || p.is_member(&actor.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Put a notification in a user's inbox unless their settings mute its kind.
    pub(crate) fn deliver(&mut self, user_id: &UserId, draft: NotificationDraft) -> Option<Notification> {
        let inbox = self.inboxes.entry(user_id.clone()).or_default();
        if !inbox.settings.allows(draft.kind) {
            debug!(user_id = %user_id, kind = %draft.kind, "notification muted by settings");
            return None;
        }
        let notification = Notification::from_draft(draft);
        inbox.notifications.insert(0, notification.clone());
        Some(notification)
    }
}

/// Require an app-wide permission of the actor's global role.
pub(crate) fn require(actor: &User, permission: Permission) -> StoreResult<()> {
    if AccessContext::new(actor).can(permission) {
        Ok(())
    } else {
        Err(StoreError::MissingPermission(permission))
    }
}

/// Require that `actor` may look at `project` under `scope`.
pub(crate) fn require_visible(actor: &User, project: &Project, scope: Permission) -> StoreResult<()> {
    if project.is_member(&actor.id) || AccessContext::new(actor).can(scope) {
        Ok(())
    } else {
        Err(StoreError::MissingPermission(scope))
    }
}

/// Require team membership, returning the actor's project role.
pub(crate) fn require_member(actor: &User, project: &Project) -> StoreResult<ProjectRole> {
    project
        .role_of(&actor.id)
        .ok_or_else(|| ProjectError::NotAMember(actor.id.clone()).into())
}

/// The application state store.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use workboard_org::{ProjectDraft, User};
/// use workboard_rbac::UserRole;
/// use workboard_store::AppState;
///
/// # tokio_test_block(async {
/// let state = AppState::in_memory();
/// let manager = User::new("user1", "John Doe", "user@example.com", UserRole::Manager);
///
/// let project = state
///     .create_project(
///         &manager,
///         ProjectDraft::new(
///             "Website Redesign",
///             NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///             NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
///         ),
///     )
///     .await
///     .unwrap();
///
/// assert_eq!(state.visible_projects(&manager).await.len(), 1);
/// assert_eq!(project.team.len(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
pub struct AppState {
    pub(crate) data: RwLock<StateData>,
    events: Arc<dyn EventBus>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Create an empty store announcing changes on `events`.
    pub fn new(events: Arc<dyn EventBus>) -> Self {
        Self::with_data(StateData::default(), events)
    }

    /// Create an empty store with its own in-memory event bus.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryEventBus::new()))
    }

    pub(crate) fn with_data(data: StateData, events: Arc<dyn EventBus>) -> Self {
        Self {
            data: RwLock::new(data),
            events,
        }
    }

    /// The event bus changes are announced on.
    pub fn events(&self) -> &Arc<dyn EventBus> {
        &self.events
    }

    /// Publish an event. The write it describes has already happened, so a
    /// failed publish is logged and otherwise ignored.
    pub(crate) async fn announce(&self, actor: &User, event: Event) {
        let event = event.with_actor(actor.id.clone());
        let topic = event.topic();
        if let Err(e) = self.events.publish(event).await {
            warn!(topic = %topic, error = %e, "failed to publish store event");
        }
    }

    pub(crate) async fn announce_delivery(&self, actor: &User, delivered: Option<(UserId, Notification)>) {
        if let Some((user_id, notification)) = delivered {
            self.announce(
                actor,
                NotificationEvent::Delivered {
                    notification_id: notification.id,
                    user_id,
                    kind: notification.kind.as_str().to_string(),
                }
                .to_event(),
            )
            .await;
        }
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Create a project. Requires the global `create_project` permission;
    /// the creator becomes the project manager.
    #[instrument(skip(self, actor, draft), fields(actor = %actor.id))]
    pub async fn create_project(&self, actor: &User, draft: ProjectDraft) -> StoreResult<Project> {
        require(actor, Permission::CreateProject)?;
        let project = Project::new(draft, actor)?;

        self.data.write().await.projects.push(project.clone());

        info!(project_id = %project.id, name = %project.name, "project created");
        self.announce(
            actor,
            ProjectEvent::Created {
                project_id: project.id.clone(),
                name: project.name.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(project)
    }

    /// A single project, if the actor may see it.
    pub async fn project(&self, actor: &User, id: &ProjectId) -> StoreResult<Project> {
        let data = self.data.read().await;
        let project = data.project(id)?;
        require_visible(actor, project, Permission::ViewAllProjects)?;
        Ok(project.clone())
    }

    /// Projects the actor sees: all of them with `view_all_projects`,
    /// otherwise the ones whose team they are on.
    pub async fn visible_projects(&self, actor: &User) -> Vec<Project> {
        let data = self.data.read().await;
        let visible = data.visible_project_ids(actor, Permission::ViewAllProjects);
        data.projects
            .iter()
            .filter(|p| visible.contains(&p.id))
            .cloned()
            .collect()
    }

    /// Sidebar summaries of the actor's visible, non-archived projects.
    pub async fn project_summaries(&self, actor: &User) -> Vec<ProjectSummary> {
        self.visible_projects(actor)
            .await
            .iter()
            .filter(|p| !p.is_archived)
            .map(|p| p.summary_for(&actor.id))
            .collect()
    }

    /// Edit a project. Requires `editProject`.
    #[instrument(skip(self, actor, update), fields(actor = %actor.id))]
    pub async fn update_project(
        &self,
        actor: &User,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> StoreResult<Project> {
        let changes = update.changed_fields();
        let project = {
            let mut data = self.data.write().await;
            let project = data.project_mut(id)?;
            project.update(&actor.id, update)?;
            project.clone()
        };

        debug!(project_id = %id, ?changes, "project updated");
        self.announce(
            actor,
            ProjectEvent::Updated {
                project_id: id.clone(),
                changes,
            }
            .to_event(),
        )
        .await;
        Ok(project)
    }

    /// Archive or restore a project. Requires `archiveProject`.
    pub async fn set_project_archived(
        &self,
        actor: &User,
        id: &ProjectId,
        archived: bool,
    ) -> StoreResult<Project> {
        let project = {
            let mut data = self.data.write().await;
            let project = data.project_mut(id)?;
            if archived {
                project.archive(&actor.id)?;
            } else {
                project.unarchive(&actor.id)?;
            }
            project.clone()
        };

        info!(project_id = %id, archived, "project archive flag changed");
        self.announce(
            actor,
            ProjectEvent::Archived {
                project_id: id.clone(),
                archived,
            }
            .to_event(),
        )
        .await;
        Ok(project)
    }

    /// Delete a project and every record that belongs to it. Requires
    /// `deleteProject`.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_project(&self, actor: &User, id: &ProjectId) -> StoreResult<Project> {
        let removed = {
            let mut data = self.data.write().await;
            data.project(id)?
                .ensure(&actor.id, ProjectCapability::DeleteProject)?;

            data.tasks.retain(|t| &t.project_id != id);
            data.calendar.retain(|e| &e.project_id != id);
            data.time_entries.retain(|e| &e.project_id != id);
            data.documents.retain(|d| &d.project_id != id);

            let index = data
                .projects
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| StoreError::not_found("project", id))?;
            data.projects.remove(index)
        };

        info!(project_id = %id, name = %removed.name, "project deleted");
        self.announce(
            actor,
            ProjectEvent::Deleted {
                project_id: id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(removed)
    }

    // ========================================================================
    // Team
    // ========================================================================

    /// Add a member to a project team and let them know.
    #[instrument(skip(self, actor, membership), fields(actor = %actor.id, user_id = %membership.user_id))]
    pub async fn add_team_member(
        &self,
        actor: &User,
        project_id: &ProjectId,
        membership: TeamMembership,
    ) -> StoreResult<()> {
        let user_id = membership.user_id.clone();
        let role = membership.role;

        let delivered = {
            let mut data = self.data.write().await;
            let project = data.project_mut(project_id)?;
            project.add_member(&actor.id, membership)?;
            let draft = NotificationDraft::new(
                NotificationKind::Project,
                "Added to project",
                format!(
                    "{} added you to \"{}\" as {}",
                    actor.name,
                    project.name,
                    role.display_name()
                ),
            )
            .with_project(project_id.clone());
            data.deliver(&user_id, draft)
        };

        info!(project_id = %project_id, role = %role, "team member added");
        self.announce(
            actor,
            TeamEvent::MemberAdded {
                project_id: project_id.clone(),
                user_id: user_id.clone(),
                role,
            }
            .to_event(),
        )
        .await;
        self.announce_delivery(actor, delivered.map(|n| (user_id, n))).await;
        Ok(())
    }

    /// Remove a member from a project team. Their task assignments in the
    /// project are cleared.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn remove_team_member(
        &self,
        actor: &User,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> StoreResult<TeamMembership> {
        let removed = {
            let mut data = self.data.write().await;
            let removed = data.project_mut(project_id)?.remove_member(&actor.id, user_id)?;
            for task in data
                .tasks
                .iter_mut()
                .filter(|t| &t.project_id == project_id && t.assignee.as_ref() == Some(user_id))
            {
                task.assignee = None;
            }
            removed
        };

        info!(project_id = %project_id, user_id = %user_id, "team member removed");
        self.announce(
            actor,
            TeamEvent::MemberRemoved {
                project_id: project_id.clone(),
                user_id: user_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(removed)
    }

    /// Change a team member's project role.
    pub async fn change_member_role(
        &self,
        actor: &User,
        project_id: &ProjectId,
        user_id: &UserId,
        role: ProjectRole,
    ) -> StoreResult<()> {
        let from = {
            let mut data = self.data.write().await;
            let project = data.project_mut(project_id)?;
            let from = project
                .role_of(user_id)
                .ok_or_else(|| ProjectError::NotAMember(user_id.clone()))?;
            project.change_member_role(&actor.id, user_id, role)?;
            from
        };

        info!(project_id = %project_id, user_id = %user_id, from = %from, to = %role, "member role changed");
        self.announce(
            actor,
            TeamEvent::RoleChanged {
                project_id: project_id.clone(),
                user_id: user_id.clone(),
                from,
                to: role,
            }
            .to_event(),
        )
        .await;
        Ok(())
    }

    /// Team of a project the actor may see.
    pub async fn team(&self, actor: &User, project_id: &ProjectId) -> StoreResult<Vec<TeamMembership>> {
        let data = self.data.read().await;
        let project = data.project(project_id)?;
        require_visible(actor, project, Permission::ViewAllTeam)?;
        Ok(project.team.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use workboard_rbac::UserRole;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn manager() -> User {
        User::new("user1", "John Doe", "user@example.com", UserRole::Manager)
    }

    pub(crate) fn admin() -> User {
        User::new("user2", "Jane Smith", "jane@example.com", UserRole::Admin)
    }

    pub(crate) fn member() -> User {
        User::new("user3", "Mike Johnson", "mike@example.com", UserRole::Member)
    }

    pub(crate) fn outsider() -> User {
        User::new("user4", "Sarah Wilson", "sarah@example.com", UserRole::Member)
    }

    /// A store with one project managed by `manager()`, with `admin()` as
    /// project admin and `member()` as project member.
    pub(crate) async fn seeded() -> (AppState, ProjectId) {
        let state = AppState::in_memory();
        let project = state
            .create_project(
                &manager(),
                ProjectDraft::new("Website Redesign", date(2025, 1, 1), date(2025, 3, 31)),
            )
            .await
            .unwrap();
        state
            .add_team_member(
                &manager(),
                &project.id,
                TeamMembership::for_user(&admin(), ProjectRole::Admin),
            )
            .await
            .unwrap();
        state
            .add_team_member(
                &manager(),
                &project.id,
                TeamMembership::for_user(&member(), ProjectRole::Member),
            )
            .await
            .unwrap();
        (state, project.id)
    }

    #[tokio::test]
    async fn test_create_project_requires_global_permission() {
        let state = AppState::in_memory();
        let draft = ProjectDraft::new("Side Project", date(2025, 1, 1), date(2025, 2, 1));

        let err = state.create_project(&member(), draft.clone()).await.unwrap_err();
        assert_eq!(err, StoreError::MissingPermission(Permission::CreateProject));

        let project = state.create_project(&manager(), draft).await.unwrap();
        assert_eq!(project.role_of(&manager().id), Some(ProjectRole::Manager));
        assert_eq!(project.status, workboard_org::ProjectStatus::Planning);
    }

    #[tokio::test]
    async fn test_create_project_announces_event() {
        let state = AppState::in_memory();
        let mut sub = state.events().subscribe("projects.project.*").await.unwrap();

        let project = state
            .create_project(
                &admin(),
                ProjectDraft::new("API Integration", date(2025, 2, 1), date(2025, 4, 30)),
            )
            .await
            .unwrap();

        let event = sub.try_recv().unwrap();
        assert_eq!(event.event_type, "project.created");
        assert_eq!(event.project_id, Some(project.id));
        assert_eq!(event.actor, Some(admin().id));
    }

    #[tokio::test]
    async fn test_visible_projects_by_global_role() {
        let (state, _) = seeded().await;

        assert_eq!(state.visible_projects(&manager()).await.len(), 1);
        assert_eq!(state.visible_projects(&member()).await.len(), 1);
        assert!(state.visible_projects(&outsider()).await.is_empty());

        // Admins see every project without being on the team
        let other_admin = User::new("9", "Admin User", "admin@example.com", UserRole::Admin);
        assert_eq!(state.visible_projects(&other_admin).await.len(), 1);
    }

    #[tokio::test]
    async fn test_project_lookup_hidden_from_outsiders() {
        let (state, id) = seeded().await;

        assert!(state.project(&member(), &id).await.is_ok());
        let err = state.project(&outsider(), &id).await.unwrap_err();
        assert!(err.is_forbidden());
        assert!(matches!(
            state.project(&manager(), &ProjectId::from("missing")).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_project_gated_by_capability() {
        let (state, id) = seeded().await;
        let update = ProjectUpdate {
            progress: Some(65),
            ..Default::default()
        };

        let err = state.update_project(&member(), &id, update.clone()).await.unwrap_err();
        assert!(err.is_forbidden());

        let project = state.update_project(&admin(), &id, update).await.unwrap();
        assert_eq!(project.progress, 65);

        let bad = ProjectUpdate {
            progress: Some(120),
            ..Default::default()
        };
        assert_eq!(
            state.update_project(&manager(), &id, bad).await.unwrap_err(),
            StoreError::Project(ProjectError::InvalidProgress(120))
        );
    }

    #[tokio::test]
    async fn test_archive_hides_from_summaries() {
        let (state, id) = seeded().await;

        assert!(state.set_project_archived(&admin(), &id, true).await.is_err());
        state.set_project_archived(&manager(), &id, true).await.unwrap();
        assert!(state.project_summaries(&manager()).await.is_empty());
        assert_eq!(state.visible_projects(&manager()).await.len(), 1);

        state.set_project_archived(&manager(), &id, false).await.unwrap();
        let summaries = state.project_summaries(&member()).await;
        assert_eq!(summaries[0].user_role, Some(ProjectRole::Member));
        assert_eq!(summaries[0].team_size, 3);
    }

    #[tokio::test]
    async fn test_delete_project_only_by_manager() {
        let (state, id) = seeded().await;

        assert!(state.delete_project(&admin(), &id).await.unwrap_err().is_forbidden());
        let removed = state.delete_project(&manager(), &id).await.unwrap();
        assert_eq!(removed.name, "Website Redesign");
        assert!(state.visible_projects(&manager()).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_project_removes_dependent_records() {
        use crate::calendar::{EventDraft, EventKind};
        use crate::documents::DocumentUpload;
        use crate::tasks::TaskDraft;
        use crate::time::TimeEntryDraft;

        let (state, id) = seeded().await;
        let other = state
            .create_project(
                &manager(),
                ProjectDraft::new("Mobile App Development", date(2025, 2, 1), date(2025, 6, 30)),
            )
            .await
            .unwrap();

        for project_id in [&id, &other.id] {
            state
                .create_task(&manager(), project_id, TaskDraft::new("Design homepage mockup"))
                .await
                .unwrap();
            state
                .schedule_event(
                    &manager(),
                    project_id,
                    EventDraft::new("Sprint review", date(2025, 1, 10), EventKind::Review),
                )
                .await
                .unwrap();
            state
                .log_time(&manager(), project_id, TimeEntryDraft::new("Planning", date(2025, 1, 6), 60))
                .await
                .unwrap();
            state
                .upload_document(&manager(), project_id, DocumentUpload::new("Brief.pdf", 1024))
                .await
                .unwrap();
        }

        state.delete_project(&manager(), &id).await.unwrap();

        let data = state.data.read().await;
        assert!(data.tasks.iter().all(|t| t.project_id == other.id));
        assert!(data.calendar.iter().all(|e| e.project_id == other.id));
        assert!(data.time_entries.iter().all(|e| e.project_id == other.id));
        assert!(data.documents.iter().all(|d| d.project_id == other.id));
        assert_eq!(data.tasks.len(), 1);
        assert_eq!(data.calendar.len(), 1);
        assert_eq!(data.time_entries.len(), 1);
        assert_eq!(data.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_team_management_rules() {
        let (state, id) = seeded().await;

        // Duplicate membership
        let err = state
            .add_team_member(
                &manager(),
                &id,
                TeamMembership::for_user(&member(), ProjectRole::Member),
            )
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Project(ProjectError::DuplicateMember(member().id)));

        // Admins cannot hand out admin
        let err = state
            .add_team_member(
                &admin(),
                &id,
                TeamMembership::for_user(&outsider(), ProjectRole::Admin),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Project(ProjectError::RoleNotAssignable { .. })
        ));

        // Manager cannot be removed
        let err = state
            .remove_team_member(&manager(), &id, &manager().id)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Project(ProjectError::ManagerProtected));

        state
            .change_member_role(&manager(), &id, &member().id, ProjectRole::Admin)
            .await
            .unwrap();
        let team = state.team(&member(), &id).await.unwrap();
        assert_eq!(
            team.iter().find(|m| m.user_id == member().id).unwrap().role,
            ProjectRole::Admin
        );
    }

    #[tokio::test]
    async fn test_added_member_is_notified() {
        let (state, id) = seeded().await;

        let inbox = state.notifications(&member(), None).await;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Project);
        assert_eq!(inbox[0].project_id, Some(id));
    }

    #[tokio::test]
    async fn test_team_events_published() {
        let (state, id) = seeded().await;
        let mut sub = state.events().subscribe("team.#").await.unwrap();

        state.remove_team_member(&manager(), &id, &member().id).await.unwrap();
        let event = sub.try_recv().unwrap();
        assert_eq!(event.event_type, "team.member_removed");
    }
}
