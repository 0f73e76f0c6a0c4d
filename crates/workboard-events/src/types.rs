//! Event types for domain notifications
//!
//! Every write to the application state is announced as an [`Event`]. The
//! typed enums below build the envelope for each module; subscribers can
//! parse the payload back into the same enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workboard_org::{ProjectId, ProjectRole, UserId};
use workboard_rbac::AppModule;

/// Event envelope.
///
/// All events are wrapped in this envelope, which carries what routing
/// needs: the source module, the project and the acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event type (e.g., "project.created", "task.status_changed")
    pub event_type: String,

    /// Module the event originated in
    pub source: AppModule,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Project context
    pub project_id: Option<ProjectId>,

    /// User who triggered the event
    pub actor: Option<UserId>,

    /// Event payload
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type string
    /// * `source` - The originating module
    /// * `payload` - The event payload
    pub fn new(event_type: impl Into<String>, source: AppModule, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            source,
            timestamp: Utc::now(),
            project_id: None,
            actor: None,
            payload,
        }
    }

    /// Set project context.
    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Set the acting user.
    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Get the topic for this event.
    ///
    /// Topics are structured as: `{source}.{event_type}`, e.g.
    /// `tasks.task.created`.
    pub fn topic(&self) -> String {
        format!("{}.{}", self.source.as_str(), self.event_type)
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

fn envelope<T: Serialize>(
    event_type: &str,
    source: AppModule,
    payload: &T,
    project_id: Option<&ProjectId>,
) -> Event {
    let payload = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
    let event = Event::new(event_type, source, payload);
    match project_id {
        Some(id) => event.with_project(id.clone()),
        None => event,
    }
}

// ============================================================================
// Project Events
// ============================================================================

/// Project lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectEvent {
    /// Project was created
    Created { project_id: ProjectId, name: String },
    /// Project fields were edited
    Updated {
        project_id: ProjectId,
        changes: Vec<String>,
    },
    /// Project was archived or restored
    Archived {
        project_id: ProjectId,
        archived: bool,
    },
    /// Project was deleted
    Deleted { project_id: ProjectId },
}

impl ProjectEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            ProjectEvent::Created { project_id, .. } => ("project.created", project_id),
            ProjectEvent::Updated { project_id, .. } => ("project.updated", project_id),
            ProjectEvent::Archived { project_id, .. } => ("project.archived", project_id),
            ProjectEvent::Deleted { project_id } => ("project.deleted", project_id),
        };
        envelope(event_type, AppModule::Projects, self, Some(project_id))
    }
}

// ============================================================================
// Team Events
// ============================================================================

/// Project team changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TeamEvent {
    /// Member joined the team
    MemberAdded {
        project_id: ProjectId,
        user_id: UserId,
        role: ProjectRole,
    },
    /// Member left the team
    MemberRemoved {
        project_id: ProjectId,
        user_id: UserId,
    },
    /// Member's role changed
    RoleChanged {
        project_id: ProjectId,
        user_id: UserId,
        from: ProjectRole,
        to: ProjectRole,
    },
}

impl TeamEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            TeamEvent::MemberAdded { project_id, .. } => ("team.member_added", project_id),
            TeamEvent::MemberRemoved { project_id, .. } => ("team.member_removed", project_id),
            TeamEvent::RoleChanged { project_id, .. } => ("team.role_changed", project_id),
        };
        envelope(event_type, AppModule::Team, self, Some(project_id))
    }
}

// ============================================================================
// Task Events
// ============================================================================

/// Task events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// Task was created
    Created {
        task_id: Uuid,
        project_id: ProjectId,
        title: String,
    },
    /// Task fields were edited
    Updated { task_id: Uuid, project_id: ProjectId },
    /// Task moved to another status
    StatusChanged {
        task_id: Uuid,
        project_id: ProjectId,
        from: String,
        to: String,
    },
    /// Task assignee changed
    Assigned {
        task_id: Uuid,
        project_id: ProjectId,
        assignee: Option<UserId>,
    },
    /// A comment was added
    Commented {
        task_id: Uuid,
        project_id: ProjectId,
        comment_id: Uuid,
    },
    /// Task was deleted
    Deleted { task_id: Uuid, project_id: ProjectId },
}

impl TaskEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            TaskEvent::Created { project_id, .. } => ("task.created", project_id),
            TaskEvent::Updated { project_id, .. } => ("task.updated", project_id),
            TaskEvent::StatusChanged { project_id, .. } => ("task.status_changed", project_id),
            TaskEvent::Assigned { project_id, .. } => ("task.assigned", project_id),
            TaskEvent::Commented { project_id, .. } => ("task.commented", project_id),
            TaskEvent::Deleted { project_id, .. } => ("task.deleted", project_id),
        };
        envelope(event_type, AppModule::Tasks, self, Some(project_id))
    }
}

// ============================================================================
// Calendar Events
// ============================================================================

/// Calendar schedule changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// An event was scheduled
    Scheduled {
        event_id: Uuid,
        project_id: ProjectId,
        title: String,
    },
    /// A scheduled event was removed
    Cancelled { event_id: Uuid, project_id: ProjectId },
}

impl ScheduleEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            ScheduleEvent::Scheduled { project_id, .. } => ("event.scheduled", project_id),
            ScheduleEvent::Cancelled { project_id, .. } => ("event.cancelled", project_id),
        };
        envelope(event_type, AppModule::Calendar, self, Some(project_id))
    }
}

// ============================================================================
// Time Tracking Events
// ============================================================================

/// Time entry events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeEvent {
    /// Time was logged
    EntryLogged {
        entry_id: Uuid,
        project_id: ProjectId,
        user_id: UserId,
        minutes: u32,
    },
    /// An entry was edited
    EntryUpdated { entry_id: Uuid, project_id: ProjectId },
    /// An entry was deleted
    EntryDeleted { entry_id: Uuid, project_id: ProjectId },
}

impl TimeEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            TimeEvent::EntryLogged { project_id, .. } => ("entry.logged", project_id),
            TimeEvent::EntryUpdated { project_id, .. } => ("entry.updated", project_id),
            TimeEvent::EntryDeleted { project_id, .. } => ("entry.deleted", project_id),
        };
        envelope(event_type, AppModule::TimeTracking, self, Some(project_id))
    }
}

// ============================================================================
// Document Events
// ============================================================================

/// Document events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// Document was uploaded
    Uploaded {
        document_id: Uuid,
        project_id: ProjectId,
        name: String,
    },
    /// Document was deleted
    Deleted {
        document_id: Uuid,
        project_id: ProjectId,
    },
}

impl DocumentEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (event_type, project_id) = match self {
            DocumentEvent::Uploaded { project_id, .. } => ("document.uploaded", project_id),
            DocumentEvent::Deleted { project_id, .. } => ("document.deleted", project_id),
        };
        envelope(event_type, AppModule::Documents, self, Some(project_id))
    }
}

// ============================================================================
// Notification Events
// ============================================================================

/// Inbox events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A notification was delivered
    Delivered {
        notification_id: Uuid,
        user_id: UserId,
        kind: String,
    },
    /// Notifications were marked read
    Read { user_id: UserId, count: usize },
    /// Notifications were removed
    Cleared { user_id: UserId, count: usize },
}

impl NotificationEvent {
    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let event_type = match self {
            NotificationEvent::Delivered { .. } => "notification.delivered",
            NotificationEvent::Read { .. } => "notification.read",
            NotificationEvent::Cleared { .. } => "notification.cleared",
        };
        envelope(event_type, AppModule::Notifications, self, None)
    }
}
