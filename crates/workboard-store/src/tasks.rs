//! Tasks
//!
//! Tasks belong to a project and move through four statuses. Anyone on the
//! team with `createTask` may add one; editing and status changes are open
//! to holders of `editAllTasks` and to the task's own assignee.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use workboard_events::TaskEvent;
use workboard_org::{Project, ProjectCapability, ProjectError, ProjectId, User, UserId};
use workboard_rbac::Permission;

use crate::error::{StoreError, StoreResult};
use crate::notifications::{NotificationDraft, NotificationKind};
use crate::state::{require_member, require_visible, AppState};

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    /// Badge classes for the priority chip.
    pub fn badge_class(&self) -> &'static str {
        match self {
            TaskPriority::Low => "bg-blue-100 text-blue-800",
            TaskPriority::Medium => "bg-orange-100 text-orange-800",
            TaskPriority::High => "bg-red-100 text-red-800",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status. Serialized in kebab-case (`"in-progress"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    /// Board columns in order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a status name. Accepts snake_case as well.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "not-started" => Some(TaskStatus::NotStarted),
            "in-progress" => Some(TaskStatus::InProgress),
            "review" => Some(TaskStatus::Review),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Badge classes for the status chip.
    pub fn badge_class(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "bg-gray-100 text-gray-800",
            TaskStatus::InProgress => "bg-blue-100 text-blue-800",
            TaskStatus::Review => "bg-orange-100 text-orange-800",
            TaskStatus::Completed => "bg-green-100 text-green-800",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NotStarted
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,

    /// Owning project
    pub project_id: ProjectId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Assigned team member, if any
    pub assignee: Option<UserId>,

    pub priority: TaskPriority,

    pub status: TaskStatus,

    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Number of attached files
    #[serde(default)]
    pub attachments: u32,

    pub created_by: UserId,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Number of finished subtasks.
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Subtask completion percentage; 0 when there are no subtasks.
    pub fn subtask_progress(&self) -> u8 {
        if self.subtasks.is_empty() {
            return 0;
        }
        (self.completed_subtasks() * 100 / self.subtasks.len()) as u8
    }

    /// Open with a deadline before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.deadline.is_some_and(|d| d < today)
    }

    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assignee.as_ref() == Some(user_id)
    }
}

/// Tasks with the given status, or all of them for `None`.
pub fn filter_by_status(tasks: &[Task], status: Option<TaskStatus>) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .collect()
}

/// Input for [`AppState::create_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee: Option<UserId>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_subtask(mut self, title: impl Into<String>) -> Self {
        self.subtasks.push(title.into());
        self
    }
}

/// Partial edit of a task's fields. Status and assignee have their own
/// operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<NaiveDate>,
}

fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("task title must not be empty".into()));
    }
    Ok(())
}

/// Assignees must be on the project team.
fn validate_assignee(project: &Project, assignee: Option<&UserId>) -> StoreResult<()> {
    match assignee {
        Some(user_id) if !project.is_member(user_id) => {
            Err(ProjectError::NotAMember(user_id.clone()).into())
        }
        _ => Ok(()),
    }
}

/// `editAllTasks`, or being the task's assignee.
fn ensure_task_editor(project: &Project, actor: &User, task: &Task) -> StoreResult<()> {
    let role = require_member(actor, project)?;
    if role.allows(ProjectCapability::EditAllTasks) || task.is_assigned_to(&actor.id) {
        Ok(())
    } else {
        Err(StoreError::forbidden(ProjectCapability::EditAllTasks))
    }
}

impl AppState {
    /// Create a task. Requires `createTask`; assigning it to anyone other
    /// than yourself also requires `assignTask`.
    #[instrument(skip(self, actor, draft), fields(actor = %actor.id))]
    pub async fn create_task(
        &self,
        actor: &User,
        project_id: &ProjectId,
        draft: TaskDraft,
    ) -> StoreResult<Task> {
        validate_title(&draft.title)?;

        let (task, delivered) = {
            let mut data = self.data.write().await;
            let project = data.project(project_id)?;
            project.ensure(&actor.id, ProjectCapability::CreateTask)?;
            if draft.assignee.as_ref().is_some_and(|a| a != &actor.id) {
                project.ensure(&actor.id, ProjectCapability::AssignTask)?;
            }
            validate_assignee(project, draft.assignee.as_ref())?;
            let project_name = project.name.clone();

            let task = Task {
                id: Uuid::now_v7(),
                project_id: project_id.clone(),
                title: draft.title,
                description: draft.description,
                assignee: draft.assignee,
                priority: draft.priority,
                status: draft.status,
                deadline: draft.deadline,
                subtasks: draft.subtasks.into_iter().map(Subtask::new).collect(),
                comments: Vec::new(),
                attachments: 0,
                created_by: actor.id.clone(),
                created_at: Utc::now(),
            };
            let delivered = assignment_notice(actor, &task, &project_name)
                .and_then(|(user_id, draft)| data.deliver(&user_id, draft).map(|n| (user_id, n)));
            data.tasks.push(task.clone());
            (task, delivered)
        };

        info!(task_id = %task.id, project_id = %project_id, "task created");
        self.announce(
            actor,
            TaskEvent::Created {
                task_id: task.id,
                project_id: project_id.clone(),
                title: task.title.clone(),
            }
            .to_event(),
        )
        .await;
        self.announce_delivery(actor, delivered).await;
        Ok(task)
    }

    /// A single task the actor may see.
    pub async fn task(&self, actor: &User, id: Uuid) -> StoreResult<Task> {
        let data = self.data.read().await;
        let task = data
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("task", id))?;
        require_visible(actor, data.project(&task.project_id)?, Permission::ViewAllTasks)?;
        Ok(task.clone())
    }

    /// Tasks the actor sees, optionally narrowed to one status.
    ///
    /// `view_all_tasks` sees every task; everyone else sees the tasks of the
    /// projects they are on.
    pub async fn tasks(&self, actor: &User, status: Option<TaskStatus>) -> Vec<Task> {
        let data = self.data.read().await;
        let visible = data.visible_project_ids(actor, Permission::ViewAllTasks);
        data.tasks
            .iter()
            .filter(|t| visible.contains(&t.project_id))
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect()
    }

    /// Tasks of one project.
    pub async fn project_tasks(&self, actor: &User, project_id: &ProjectId) -> StoreResult<Vec<Task>> {
        let data = self.data.read().await;
        require_visible(actor, data.project(project_id)?, Permission::ViewAllTasks)?;
        Ok(data
            .tasks
            .iter()
            .filter(|t| &t.project_id == project_id)
            .cloned()
            .collect())
    }

    /// Tasks assigned to the actor.
    pub async fn assigned_tasks(&self, actor: &User) -> Vec<Task> {
        let data = self.data.read().await;
        data.tasks
            .iter()
            .filter(|t| t.is_assigned_to(&actor.id))
            .cloned()
            .collect()
    }

    /// Edit task fields. Requires `editAllTasks` or being the assignee.
    pub async fn update_task(&self, actor: &User, id: Uuid, update: TaskUpdate) -> StoreResult<Task> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }

        let task = {
            let mut data = self.data.write().await;
            let index = task_index(&data.tasks, id)?;
            ensure_task_editor(data.project(&data.tasks[index].project_id)?, actor, &data.tasks[index])?;

            let task = &mut data.tasks[index];
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(deadline) = update.deadline {
                task.deadline = Some(deadline);
            }
            task.clone()
        };

        debug!(task_id = %id, "task updated");
        self.announce(
            actor,
            TaskEvent::Updated {
                task_id: id,
                project_id: task.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(task)
    }

    /// Delete a task. Requires `deleteTask`.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_task(&self, actor: &User, id: Uuid) -> StoreResult<Task> {
        let task = {
            let mut data = self.data.write().await;
            let index = task_index(&data.tasks, id)?;
            data.project(&data.tasks[index].project_id)?
                .ensure(&actor.id, ProjectCapability::DeleteTask)?;
            data.tasks.remove(index)
        };

        info!(task_id = %id, "task deleted");
        self.announce(
            actor,
            TaskEvent::Deleted {
                task_id: id,
                project_id: task.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(task)
    }

    /// Assign or unassign a task. Requires `assignTask`; the assignee must
    /// be on the team.
    pub async fn assign_task(
        &self,
        actor: &User,
        id: Uuid,
        assignee: Option<UserId>,
    ) -> StoreResult<Task> {
        let (task, delivered) = {
            let mut data = self.data.write().await;
            let index = task_index(&data.tasks, id)?;
            let project = data.project(&data.tasks[index].project_id)?;
            project.ensure(&actor.id, ProjectCapability::AssignTask)?;
            validate_assignee(project, assignee.as_ref())?;
            let project_name = project.name.clone();

            data.tasks[index].assignee = assignee.clone();
            let task = data.tasks[index].clone();
            let delivered = assignment_notice(actor, &task, &project_name)
                .and_then(|(user_id, draft)| data.deliver(&user_id, draft).map(|n| (user_id, n)));
            (task, delivered)
        };

        info!(task_id = %id, assignee = ?assignee, "task assigned");
        self.announce(
            actor,
            TaskEvent::Assigned {
                task_id: id,
                project_id: task.project_id.clone(),
                assignee,
            }
            .to_event(),
        )
        .await;
        self.announce_delivery(actor, delivered).await;
        Ok(task)
    }

    /// Move a task to another status. Requires `editAllTasks` or being the
    /// assignee.
    pub async fn change_task_status(
        &self,
        actor: &User,
        id: Uuid,
        status: TaskStatus,
    ) -> StoreResult<Task> {
        let (task, from) = {
            let mut data = self.data.write().await;
            let index = task_index(&data.tasks, id)?;
            ensure_task_editor(data.project(&data.tasks[index].project_id)?, actor, &data.tasks[index])?;

            let task = &mut data.tasks[index];
            let from = std::mem::replace(&mut task.status, status);
            (task.clone(), from)
        };

        if from != status {
            info!(task_id = %id, from = %from, to = %status, "task status changed");
            self.announce(
                actor,
                TaskEvent::StatusChanged {
                    task_id: id,
                    project_id: task.project_id.clone(),
                    from: from.as_str().to_string(),
                    to: status.as_str().to_string(),
                }
                .to_event(),
            )
            .await;
        }
        Ok(task)
    }

    /// Add a checklist item. Same rule as editing the task.
    pub async fn add_subtask(&self, actor: &User, id: Uuid, title: &str) -> StoreResult<Subtask> {
        validate_title(title)?;
        let mut data = self.data.write().await;
        let index = task_index(&data.tasks, id)?;
        ensure_task_editor(data.project(&data.tasks[index].project_id)?, actor, &data.tasks[index])?;

        let subtask = Subtask::new(title);
        data.tasks[index].subtasks.push(subtask.clone());
        Ok(subtask)
    }

    /// Flip a subtask's completion and return the new state.
    pub async fn toggle_subtask(&self, actor: &User, task_id: Uuid, subtask_id: Uuid) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let index = task_index(&data.tasks, task_id)?;
        ensure_task_editor(data.project(&data.tasks[index].project_id)?, actor, &data.tasks[index])?;

        let subtask = data.tasks[index]
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| StoreError::not_found("subtask", subtask_id))?;
        subtask.completed = !subtask.completed;
        debug!(task_id = %task_id, subtask_id = %subtask_id, completed = subtask.completed, "subtask toggled");
        Ok(subtask.completed)
    }

    /// Comment on a task. Open to every team member.
    pub async fn add_comment(&self, actor: &User, task_id: Uuid, body: &str) -> StoreResult<Comment> {
        if body.trim().is_empty() {
            return Err(StoreError::Validation("comment must not be empty".into()));
        }

        let (comment, project_id, delivered) = {
            let mut data = self.data.write().await;
            let index = task_index(&data.tasks, task_id)?;
            let project = data.project(&data.tasks[index].project_id)?;
            require_member(actor, project)?;
            let project_id = project.id.clone();
            let project_name = project.name.clone();

            let comment = Comment {
                id: Uuid::now_v7(),
                author: actor.id.clone(),
                author_name: actor.name.clone(),
                body: body.trim().to_string(),
                created_at: Utc::now(),
            };
            let task = &mut data.tasks[index];
            task.comments.push(comment.clone());

            let notice = task.assignee.clone().filter(|a| a != &actor.id).map(|assignee| {
                let draft = NotificationDraft::new(
                    NotificationKind::Comment,
                    "New comment",
                    format!("{} commented on \"{}\"", actor.name, task.title),
                )
                .with_project(project_id.clone())
                .with_project_name(project_name);
                (assignee, draft)
            });
            let delivered = notice
                .and_then(|(user_id, draft)| data.deliver(&user_id, draft).map(|n| (user_id, n)));
            (comment, project_id, delivered)
        };

        self.announce(
            actor,
            TaskEvent::Commented {
                task_id,
                project_id,
                comment_id: comment.id,
            }
            .to_event(),
        )
        .await;
        self.announce_delivery(actor, delivered).await;
        Ok(comment)
    }
}

fn task_index(tasks: &[Task], id: Uuid) -> StoreResult<usize> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| StoreError::not_found("task", id))
}

/// Notification for a task handed to someone other than the actor.
fn assignment_notice(actor: &User, task: &Task, project_name: &str) -> Option<(UserId, NotificationDraft)> {
    let assignee = task.assignee.clone().filter(|a| a != &actor.id)?;
    let draft = NotificationDraft::new(
        NotificationKind::Task,
        "New task assigned",
        format!("{} assigned you to \"{}\"", actor.name, task.title),
    )
    .with_project(task.project_id.clone())
    .with_project_name(project_name);
    Some((assignee, draft))
}
