//! Notifications
//!
//! Every user has an inbox, newest first, and a set of switches that mute
//! whole kinds of notification. Inbox operations only ever touch the
//! caller's own inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use workboard_events::NotificationEvent;
use workboard_org::{ProjectId, User, UserId};
use workboard_rbac::Permission;

use crate::error::{StoreError, StoreResult};
use crate::state::{require, AppState};

/// What a notification is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Task,
    Comment,
    Deadline,
    Team,
    Project,
    Meeting,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 6] = [
        NotificationKind::Task,
        NotificationKind::Comment,
        NotificationKind::Deadline,
        NotificationKind::Team,
        NotificationKind::Project,
        NotificationKind::Meeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Task => "task",
            NotificationKind::Comment => "comment",
            NotificationKind::Deadline => "deadline",
            NotificationKind::Team => "team",
            NotificationKind::Project => "project",
            NotificationKind::Meeting => "meeting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Icon colour classes.
    pub fn color_class(&self) -> &'static str {
        match self {
            NotificationKind::Task => "text-blue-600 bg-blue-100",
            NotificationKind::Comment => "text-green-600 bg-green-100",
            NotificationKind::Deadline => "text-red-600 bg-red-100",
            NotificationKind::Team => "text-purple-600 bg-purple-100",
            NotificationKind::Project => "text-orange-600 bg-orange-100",
            NotificationKind::Meeting => "text-indigo-600 bg-indigo-100",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn from_draft(draft: NotificationDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            project_id: draft.project_id,
            project_name: draft.project_name,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Relative age, e.g. `"5 minutes ago"`.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.created_at).num_minutes().max(0);
        match minutes {
            0 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            m if m < 60 => format!("{m} minutes ago"),
            m if m < 120 => "1 hour ago".to_string(),
            m if m < 60 * 24 => format!("{} hours ago", m / 60),
            m if m < 60 * 48 => "1 day ago".to_string(),
            m => format!("{} days ago", m / (60 * 24)),
        }
    }
}

/// Input for a new notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            project_id: None,
            project_name: None,
        }
    }

    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}

/// Per-user notification switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub task_assignment: bool,
    pub comments: bool,
    pub deadlines: bool,
    pub project_updates: bool,
    pub team_changes: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            task_assignment: true,
            comments: true,
            deadlines: true,
            project_updates: true,
            team_changes: false,
        }
    }
}

impl NotificationSettings {
    /// Whether notifications of `kind` reach the inbox. Meeting reminders
    /// have no switch of their own.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Task => self.task_assignment,
            NotificationKind::Comment => self.comments,
            NotificationKind::Deadline => self.deadlines,
            NotificationKind::Team => self.team_changes,
            NotificationKind::Project => self.project_updates,
            NotificationKind::Meeting => true,
        }
    }
}

/// One user's notifications and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    pub notifications: Vec<Notification>,
    pub settings: NotificationSettings,
}

impl AppState {
    /// Deliver a notification to `user_id`, unless their settings mute it.
    pub async fn notify(&self, actor: &User, user_id: &UserId, draft: NotificationDraft) -> Option<Notification> {
        let delivered = self.data.write().await.deliver(user_id, draft);
        self.announce_delivery(actor, delivered.clone().map(|n| (user_id.clone(), n)))
            .await;
        delivered
    }

    /// Send an announcement to every other member of a project. Requires
    /// the global `send_announcements` permission. Returns how many inboxes
    /// received it.
    pub async fn send_announcement(
        &self,
        actor: &User,
        project_id: &ProjectId,
        title: &str,
        message: &str,
    ) -> StoreResult<usize> {
        require(actor, Permission::SendAnnouncements)?;

        let delivered: Vec<(UserId, Notification)> = {
            let mut data = self.data.write().await;
            let project = data.project(project_id)?;
            let recipients: Vec<UserId> = project
                .team
                .iter()
                .map(|m| m.user_id.clone())
                .filter(|id| id != &actor.id)
                .collect();
            let draft = NotificationDraft::new(NotificationKind::Project, title, message)
                .with_project(project.id.clone())
                .with_project_name(project.name.clone());

            recipients
                .into_iter()
                .filter_map(|id| data.deliver(&id, draft.clone()).map(|n| (id, n)))
                .collect()
        };

        info!(project_id = %project_id, recipients = delivered.len(), "announcement sent");
        let count = delivered.len();
        for entry in delivered {
            self.announce_delivery(actor, Some(entry)).await;
        }
        Ok(count)
    }

    /// The user's notifications, newest first, optionally of one kind.
    pub async fn notifications(&self, user: &User, kind: Option<NotificationKind>) -> Vec<Notification> {
        let data = self.data.read().await;
        data.inboxes
            .get(&user.id)
            .map(|inbox| {
                inbox
                    .notifications
                    .iter()
                    .filter(|n| kind.map_or(true, |k| n.kind == k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn unread_count(&self, user: &User) -> usize {
        let data = self.data.read().await;
        data.inboxes
            .get(&user.id)
            .map_or(0, |inbox| inbox.notifications.iter().filter(|n| !n.read).count())
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, user: &User, id: Uuid) -> StoreResult<()> {
        let changed = {
            let mut data = self.data.write().await;
            let notification = data
                .inboxes
                .get_mut(&user.id)
                .and_then(|inbox| inbox.notifications.iter_mut().find(|n| n.id == id))
                .ok_or_else(|| StoreError::not_found("notification", id))?;
            !std::mem::replace(&mut notification.read, true)
        };

        if changed {
            self.announce(
                user,
                NotificationEvent::Read {
                    user_id: user.id.clone(),
                    count: 1,
                }
                .to_event(),
            )
            .await;
        }
        Ok(())
    }

    /// Mark everything read. Returns how many were unread.
    pub async fn mark_all_read(&self, user: &User) -> usize {
        let count = {
            let mut data = self.data.write().await;
            let mut count = 0;
            if let Some(inbox) = data.inboxes.get_mut(&user.id) {
                for notification in inbox.notifications.iter_mut().filter(|n| !n.read) {
                    notification.read = true;
                    count += 1;
                }
            }
            count
        };

        if count > 0 {
            debug!(user_id = %user.id, count, "notifications marked read");
            self.announce(
                user,
                NotificationEvent::Read {
                    user_id: user.id.clone(),
                    count,
                }
                .to_event(),
            )
            .await;
        }
        count
    }

    /// Delete one notification.
    pub async fn delete_notification(&self, user: &User, id: Uuid) -> StoreResult<Notification> {
        let removed = {
            let mut data = self.data.write().await;
            let inbox = data
                .inboxes
                .get_mut(&user.id)
                .ok_or_else(|| StoreError::not_found("notification", id))?;
            let index = inbox
                .notifications
                .iter()
                .position(|n| n.id == id)
                .ok_or_else(|| StoreError::not_found("notification", id))?;
            inbox.notifications.remove(index)
        };

        self.announce(
            user,
            NotificationEvent::Cleared {
                user_id: user.id.clone(),
                count: 1,
            }
            .to_event(),
        )
        .await;
        Ok(removed)
    }

    /// Empty the inbox. Returns how many notifications were removed.
    pub async fn clear_notifications(&self, user: &User) -> usize {
        let count = {
            let mut data = self.data.write().await;
            data.inboxes
                .get_mut(&user.id)
                .map_or(0, |inbox| inbox.notifications.drain(..).count())
        };

        if count > 0 {
            self.announce(
                user,
                NotificationEvent::Cleared {
                    user_id: user.id.clone(),
                    count,
                }
                .to_event(),
            )
            .await;
        }
        count
    }

    pub async fn notification_settings(&self, user: &User) -> NotificationSettings {
        let data = self.data.read().await;
        data.inboxes
            .get(&user.id)
            .map(|inbox| inbox.settings)
            .unwrap_or_default()
    }

    pub async fn update_notification_settings(&self, user: &User, settings: NotificationSettings) {
        let mut data = self.data.write().await;
        data.inboxes.entry(user.id.clone()).or_default().settings = settings;
        debug!(user_id = %user.id, "notification settings updated");
    }
}
