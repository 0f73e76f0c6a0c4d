//! Calendar
//!
//! Dated events on a project's schedule. Any team member may put something
//! on the calendar; the creator or anyone with `editProject` may take it off.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use workboard_events::ScheduleEvent;
use workboard_org::{ProjectCapability, ProjectId, User, UserId};
use workboard_rbac::Permission;

use crate::error::{StoreError, StoreResult};
use crate::state::{require_member, AppState};
use crate::tasks::TaskPriority;

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Deadline,
    Milestone,
    Review,
    Task,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Meeting => "meeting",
            EventKind::Deadline => "deadline",
            EventKind::Milestone => "milestone",
            EventKind::Review => "review",
            EventKind::Task => "task",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "meeting" => Some(EventKind::Meeting),
            "deadline" => Some(EventKind::Deadline),
            "milestone" => Some(EventKind::Milestone),
            "review" => Some(EventKind::Review),
            "task" => Some(EventKind::Task),
            _ => None,
        }
    }

    /// Dot colour on the month grid.
    pub fn badge_class(&self) -> &'static str {
        match self {
            EventKind::Meeting => "bg-purple-500",
            EventKind::Deadline => "bg-red-500",
            EventKind::Milestone => "bg-green-500",
            EventKind::Review => "bg-orange-500",
            EventKind::Task => "bg-blue-500",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry on a project calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub project_id: ProjectId,
    pub title: String,
    pub date: NaiveDate,
    /// Start time; all-day when absent
    pub time: Option<NaiveTime>,
    pub kind: EventKind,
    pub priority: TaskPriority,
    pub created_by: UserId,
}

/// Input for [`AppState::schedule_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub kind: EventKind,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate, kind: EventKind) -> Self {
        Self {
            title: title.into(),
            date,
            time: None,
            kind,
            priority: TaskPriority::default(),
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }
}

fn by_schedule(a: &CalendarEvent, b: &CalendarEvent) -> std::cmp::Ordering {
    (a.date, a.time).cmp(&(b.date, b.time))
}

impl AppState {
    /// Put an event on a project calendar. Team members only.
    pub async fn schedule_event(
        &self,
        actor: &User,
        project_id: &ProjectId,
        draft: EventDraft,
    ) -> StoreResult<CalendarEvent> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Validation("event title must not be empty".into()));
        }

        let event = {
            let mut data = self.data.write().await;
            require_member(actor, data.project(project_id)?)?;
            let event = CalendarEvent {
                id: Uuid::now_v7(),
                project_id: project_id.clone(),
                title: draft.title,
                date: draft.date,
                time: draft.time,
                kind: draft.kind,
                priority: draft.priority,
                created_by: actor.id.clone(),
            };
            data.calendar.push(event.clone());
            event
        };

        info!(event_id = %event.id, date = %event.date, kind = %event.kind, "event scheduled");
        self.announce(
            actor,
            ScheduleEvent::Scheduled {
                event_id: event.id,
                project_id: project_id.clone(),
                title: event.title.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(event)
    }

    /// Take an event off the calendar. The creator, or `editProject`.
    pub async fn cancel_event(&self, actor: &User, id: Uuid) -> StoreResult<CalendarEvent> {
        let event = {
            let mut data = self.data.write().await;
            let index = data
                .calendar
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| StoreError::not_found("event", id))?;
            let event = &data.calendar[index];
            if event.created_by != actor.id {
                data.project(&event.project_id)?
                    .ensure(&actor.id, ProjectCapability::EditProject)?;
            }
            data.calendar.remove(index)
        };

        info!(event_id = %id, "event cancelled");
        self.announce(
            actor,
            ScheduleEvent::Cancelled {
                event_id: id,
                project_id: event.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(event)
    }

    /// Events the actor sees, in date order.
    ///
    /// `view_all_events` sees every calendar; everyone else sees their own
    /// projects' calendars.
    pub async fn calendar_events(&self, actor: &User) -> Vec<CalendarEvent> {
        let data = self.data.read().await;
        let visible = data.visible_project_ids(actor, Permission::ViewAllEvents);
        let mut events: Vec<CalendarEvent> = data
            .calendar
            .iter()
            .filter(|e| visible.contains(&e.project_id))
            .cloned()
            .collect();
        events.sort_by(by_schedule);
        events
    }

    /// Visible events on one day.
    pub async fn events_on(&self, actor: &User, date: NaiveDate) -> Vec<CalendarEvent> {
        self.calendar_events(actor)
            .await
            .into_iter()
            .filter(|e| e.date == date)
            .collect()
    }

    /// The next `limit` visible events on or after `from`.
    pub async fn upcoming_events(&self, actor: &User, from: NaiveDate, limit: usize) -> Vec<CalendarEvent> {
        self.calendar_events(actor)
            .await
            .into_iter()
            .filter(|e| e.date >= from)
            .take(limit)
            .collect()
    }
}
