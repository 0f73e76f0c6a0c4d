//! User context for project navigation
//!
//! Tracks where a user is in the main layout: the dashboard, or one of the
//! views of a selected project. Selecting the project that is already
//! selected collapses back to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workboard_rbac::AppModule;

use crate::project::ProjectId;
use crate::user::UserId;

/// Maximum number of recent projects remembered.
pub const MAX_RECENT_PROJECTS: usize = 10;

/// The views available inside a selected project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProjectView {
    Overview,
    Tasks,
    Calendar,
    Team,
    Reports,
    TimeTracking,
    Documents,
}

impl ProjectView {
    /// Every view, in sidebar order.
    pub const ALL: [ProjectView; 7] = [
        ProjectView::Overview,
        ProjectView::Tasks,
        ProjectView::Calendar,
        ProjectView::Team,
        ProjectView::Reports,
        ProjectView::TimeTracking,
        ProjectView::Documents,
    ];

    /// View identifier, e.g. `"timetracking"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Tasks => "tasks",
            Self::Calendar => "calendar",
            Self::Team => "team",
            Self::Reports => "reports",
            Self::TimeTracking => "timetracking",
            Self::Documents => "documents",
        }
    }

    /// Parse a view identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// Sidebar label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Overview => "Project Overview",
            Self::Tasks => "Tasks",
            Self::Calendar => "Calendar",
            Self::Team => "Team",
            Self::Reports => "Reports",
            Self::TimeTracking => "Time Tracking",
            Self::Documents => "Documents",
        }
    }

    /// The app module that backs this view.
    pub fn module(&self) -> AppModule {
        match self {
            Self::Overview => AppModule::Projects,
            Self::Tasks => AppModule::Tasks,
            Self::Calendar => AppModule::Calendar,
            Self::Team => AppModule::Team,
            Self::Reports => AppModule::Reports,
            Self::TimeTracking => AppModule::TimeTracking,
            Self::Documents => AppModule::Documents,
        }
    }
}

/// What the main area is showing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "view")]
pub enum ActiveView {
    /// The cross-project dashboard
    Dashboard,

    /// A view of the selected project
    Project(ProjectView),
}

impl Default for ActiveView {
    fn default() -> Self {
        Self::Dashboard
    }
}

/// A user's navigation state.
///
/// # Examples
///
/// ```
/// use workboard_org::{ActiveView, ProjectId, ProjectView, UserContext, UserId};
///
/// let mut ctx = UserContext::new(UserId::from("user1"));
/// let project = ProjectId::from("1");
///
/// ctx.select_project(&project);
/// assert_eq!(ctx.active_view, ActiveView::Project(ProjectView::Overview));
///
/// // Selecting it again collapses back to the dashboard
/// ctx.select_project(&project);
/// assert_eq!(ctx.active_view, ActiveView::Dashboard);
/// assert!(ctx.selected_project.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// User ID
    pub user_id: UserId,

    /// Currently selected project
    pub selected_project: Option<ProjectId>,

    /// What the main area shows
    pub active_view: ActiveView,

    /// Recently selected projects (most recent first)
    #[serde(default)]
    pub recent_projects: Vec<ProjectId>,

    /// Whether the sidebar is expanded
    pub sidebar_open: bool,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserContext {
    /// A context on the dashboard with nothing selected.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            selected_project: None,
            active_view: ActiveView::Dashboard,
            recent_projects: Vec::new(),
            sidebar_open: true,
            updated_at: Utc::now(),
        }
    }

    /// Select a project, or collapse it if it is already selected.
    ///
    /// # Returns
    ///
    /// `true` if the project is now selected, `false` if it collapsed.
    pub fn select_project(&mut self, project_id: &ProjectId) -> bool {
        let selected = if self.selected_project.as_ref() == Some(project_id) {
            self.selected_project = None;
            self.active_view = ActiveView::Dashboard;
            false
        } else {
            self.selected_project = Some(project_id.clone());
            self.active_view = ActiveView::Project(ProjectView::Overview);
            self.add_recent_project(project_id.clone());
            true
        };
        self.updated_at = Utc::now();
        selected
    }

    /// Switch to a view of the selected project.
    ///
    /// Does nothing and returns `false` when no project is selected.
    pub fn open_view(&mut self, view: ProjectView) -> bool {
        if self.selected_project.is_none() {
            return false;
        }
        self.active_view = ActiveView::Project(view);
        self.updated_at = Utc::now();
        true
    }

    /// Go back to the dashboard, deselecting the project.
    pub fn go_to_dashboard(&mut self) {
        self.selected_project = None;
        self.active_view = ActiveView::Dashboard;
        self.updated_at = Utc::now();
    }

    /// Forget a project, e.g. after it was deleted.
    pub fn forget_project(&mut self, project_id: &ProjectId) {
        self.recent_projects.retain(|id| id != project_id);
        if self.selected_project.as_ref() == Some(project_id) {
            self.go_to_dashboard();
        }
        self.updated_at = Utc::now();
    }

    /// Show or hide the sidebar.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        self.updated_at = Utc::now();
    }

    /// Header title: `"Dashboard"` or `"<project> - <view>"`.
    pub fn title(&self, project_name: Option<&str>) -> String {
        match (self.active_view, project_name) {
            (ActiveView::Project(view), Some(name)) => format!("{} - {}", name, view.display_name()),
            _ => "Dashboard".to_string(),
        }
    }

    /// Get the most recent projects.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of projects to return
    pub fn get_recent_projects(&self, limit: usize) -> &[ProjectId] {
        let end = limit.min(self.recent_projects.len());
        &self.recent_projects[..end]
    }

    fn add_recent_project(&mut self, project_id: ProjectId) {
        self.recent_projects.retain(|id| *id != project_id);
        self.recent_projects.insert(0, project_id);
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> UserContext {
        UserContext::new(UserId::from("user1"))
    }

    #[test]
    fn test_user_context_creation() {
        let ctx = ctx();
        assert_eq!(ctx.active_view, ActiveView::Dashboard);
        assert!(ctx.selected_project.is_none());
        assert!(ctx.sidebar_open);
    }

    #[test]
    fn test_select_then_collapse() {
        let mut ctx = ctx();
        let p1 = ProjectId::from("1");
        let p2 = ProjectId::from("2");

        assert!(ctx.select_project(&p1));
        assert!(ctx.open_view(ProjectView::Tasks));

        // Selecting another project opens its overview
        assert!(ctx.select_project(&p2));
        assert_eq!(ctx.selected_project, Some(p2.clone()));
        assert_eq!(ctx.active_view, ActiveView::Project(ProjectView::Overview));

        assert!(!ctx.select_project(&p2));
        assert_eq!(ctx.active_view, ActiveView::Dashboard);
    }

    #[test]
    fn test_open_view_needs_a_project() {
        let mut ctx = ctx();
        assert!(!ctx.open_view(ProjectView::Reports));
        assert_eq!(ctx.active_view, ActiveView::Dashboard);
    }

    #[test]
    fn test_recent_projects_limit() {
        let mut ctx = ctx();
        for i in 0..15 {
            ctx.select_project(&ProjectId::new(i.to_string()));
        }
        assert_eq!(ctx.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(ctx.get_recent_projects(2), &[ProjectId::from("14"), ProjectId::from("13")]);
    }

    #[test]
    fn test_forget_selected_project() {
        let mut ctx = ctx();
        let p1 = ProjectId::from("1");
        ctx.select_project(&p1);
        ctx.forget_project(&p1);

        assert!(ctx.selected_project.is_none());
        assert!(ctx.recent_projects.is_empty());
    }

    #[test]
    fn test_title() {
        let mut ctx = ctx();
        assert_eq!(ctx.title(None), "Dashboard");

        ctx.select_project(&ProjectId::from("1"));
        ctx.open_view(ProjectView::TimeTracking);
        assert_eq!(ctx.title(Some("Website Redesign")), "Website Redesign - Time Tracking");
    }

    #[test]
    fn test_view_names() {
        assert_eq!(ProjectView::parse("TimeTracking"), Some(ProjectView::TimeTracking));
        assert_eq!(ProjectView::parse("settings"), None);
        assert_eq!(ProjectView::Overview.module(), AppModule::Projects);
        assert_eq!(
            serde_json::to_string(&ProjectView::TimeTracking).unwrap(),
            "\"timetracking\""
        );
    }
}
