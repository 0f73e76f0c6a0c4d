//! Time tracking
//!
//! Team members log time against their projects, either by hand or through
//! a [`TimeTracker`] that is started, paused, resumed and stopped. Entries
//! are private to their author unless the viewer holds
//! `viewAllTimeEntries` (globally or in the entry's project).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use workboard_events::TimeEvent;
use workboard_org::{AccessContext, Project, ProjectCapability, ProjectId, User, UserId};
use workboard_rbac::Permission;

use crate::error::{StoreError, StoreResult};
use crate::state::{require_member, AppState};

/// Longest single entry: one day.
pub const MAX_ENTRY_MINUTES: u32 = 24 * 60;

/// Format minutes as `"4h 0m"`.
///
/// # Examples
///
/// ```
/// use workboard_store::format_duration;
///
/// assert_eq!(format_duration(240), "4h 0m");
/// assert_eq!(format_duration(90), "1h 30m");
/// ```
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Format seconds as a running clock, `"1:05:09"`.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Logged time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: Uuid,
    pub project_id: ProjectId,
    pub user_id: UserId,
    /// What the time was spent on
    pub task: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub minutes: u32,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn duration_label(&self) -> String {
        format_duration(self.minutes)
    }
}

/// Input for [`AppState::log_time`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDraft {
    pub task: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub minutes: u32,
}

impl TimeEntryDraft {
    pub fn new(task: impl Into<String>, date: NaiveDate, minutes: u32) -> Self {
        Self {
            task: task.into(),
            description: String::new(),
            date,
            minutes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// An entry for time captured by a tracker, dated the day it started.
    /// Sessions longer than a day are capped at [`MAX_ENTRY_MINUTES`].
    pub fn from_tracked(tracked: &TrackedTime) -> Self {
        Self::new(
            tracked.task.clone(),
            tracked.started_at.date_naive(),
            tracked.minutes().min(MAX_ENTRY_MINUTES),
        )
    }
}

/// Partial edit of a time entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryUpdate {
    pub task: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub minutes: Option<u32>,
}

/// Time captured by a stopped tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTime {
    pub task: String,
    pub started_at: DateTime<Utc>,
    pub seconds: i64,
}

impl TrackedTime {
    /// Whole minutes, rounded to the nearest and never below one.
    pub fn minutes(&self) -> u32 {
        let minutes = (self.seconds.max(0) + 30) / 60;
        u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
    }
}

/// A stopwatch for the task being worked on.
///
/// Every transition takes the current time so callers decide the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTracker {
    task: Option<String>,
    started_at: Option<DateTime<Utc>>,
    running_since: Option<DateTime<Utc>>,
    accumulated: Duration,
}

impl Default for TimeTracker {
    fn default() -> Self {
        Self {
            task: None,
            started_at: None,
            running_since: None,
            accumulated: Duration::zero(),
        }
    }
}

impl TimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `task`. Returns false if a session is already open.
    pub fn start(&mut self, task: impl Into<String>, now: DateTime<Utc>) -> bool {
        if self.is_active() {
            return false;
        }
        self.task = Some(task.into());
        self.started_at = Some(now);
        self.running_since = Some(now);
        self.accumulated = Duration::zero();
        true
    }

    /// Pause a running session.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        match self.running_since.take() {
            Some(since) => {
                self.accumulated = self.accumulated + (now - since);
                true
            }
            None => false,
        }
    }

    /// Resume a paused session.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active() || self.is_running() {
            return false;
        }
        self.running_since = Some(now);
        true
    }

    /// Close the session and hand back what was captured.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<TrackedTime> {
        let elapsed = self.elapsed(now);
        let task = self.task.take()?;
        let started_at = self.started_at.take()?;
        self.running_since = None;
        self.accumulated = Duration::zero();
        Some(TrackedTime {
            task,
            started_at,
            seconds: elapsed.num_seconds(),
        })
    }

    /// Time on the clock so far, excluding pauses.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + (now - since),
            None => self.accumulated,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Started and not yet stopped, running or paused.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }
}

/// Minutes spent on one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTime {
    pub project_id: ProjectId,
    pub project_name: String,
    pub minutes: u32,
}

/// Totals over a set of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSummary {
    pub total_minutes: u32,
    pub today_minutes: u32,
    pub per_project: Vec<ProjectTime>,
}

impl TimeSummary {
    /// Summarize `entries`, naming projects from `projects`.
    pub fn from_entries(entries: &[TimeEntry], projects: &[Project], today: NaiveDate) -> Self {
        let mut per_project: BTreeMap<&ProjectId, u32> = BTreeMap::new();
        for entry in entries {
            let total = per_project.entry(&entry.project_id).or_default();
            *total = total.saturating_add(entry.minutes);
        }

        Self {
            total_minutes: total_minutes(entries),
            today_minutes: minutes_on(entries, today),
            per_project: per_project
                .into_iter()
                .map(|(id, minutes)| ProjectTime {
                    project_id: id.clone(),
                    project_name: projects
                        .iter()
                        .find(|p| &p.id == id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    minutes,
                })
                .collect(),
        }
    }
}

/// Sum minutes, saturating at `u32::MAX`.
pub(crate) fn sum_minutes(minutes: impl IntoIterator<Item = u32>) -> u32 {
    minutes.into_iter().fold(0, u32::saturating_add)
}

pub fn total_minutes(entries: &[TimeEntry]) -> u32 {
    sum_minutes(entries.iter().map(|e| e.minutes))
}

pub fn minutes_on(entries: &[TimeEntry], date: NaiveDate) -> u32 {
    sum_minutes(entries.iter().filter(|e| e.date == date).map(|e| e.minutes))
}

fn validate_minutes(minutes: u32) -> StoreResult<()> {
    if minutes == 0 {
        return Err(StoreError::Validation("logged time must be at least one minute".into()));
    }
    if minutes > MAX_ENTRY_MINUTES {
        return Err(StoreError::Validation(format!(
            "a single entry covers at most {} minutes",
            MAX_ENTRY_MINUTES
        )));
    }
    Ok(())
}

/// Whether `actor` may see or edit entries of other users in `project`.
fn sees_all_entries(actor: &User, project: &Project) -> bool {
    AccessContext::new(actor).can(Permission::ViewAllTimeEntries)
        || AccessContext::for_project(actor, project).can_in_project(ProjectCapability::ViewAllTimeEntries)
}

fn ensure_entry_editor(actor: &User, project: &Project, entry: &TimeEntry) -> StoreResult<()> {
    if entry.user_id == actor.id
        || AccessContext::for_project(actor, project).can_in_project(ProjectCapability::EditAllTimeEntries)
    {
        Ok(())
    } else {
        Err(StoreError::forbidden(ProjectCapability::EditAllTimeEntries))
    }
}

impl AppState {
    /// Log the actor's own time on a project they are on.
    pub async fn log_time(
        &self,
        actor: &User,
        project_id: &ProjectId,
        draft: TimeEntryDraft,
    ) -> StoreResult<TimeEntry> {
        validate_minutes(draft.minutes)?;

        let entry = {
            let mut data = self.data.write().await;
            require_member(actor, data.project(project_id)?)?;
            let entry = TimeEntry {
                id: Uuid::now_v7(),
                project_id: project_id.clone(),
                user_id: actor.id.clone(),
                task: draft.task,
                description: draft.description,
                date: draft.date,
                minutes: draft.minutes,
                created_at: Utc::now(),
            };
            data.time_entries.push(entry.clone());
            entry
        };

        info!(entry_id = %entry.id, minutes = entry.minutes, "time logged");
        self.announce(
            actor,
            TimeEvent::EntryLogged {
                entry_id: entry.id,
                project_id: project_id.clone(),
                user_id: actor.id.clone(),
                minutes: entry.minutes,
            }
            .to_event(),
        )
        .await;
        Ok(entry)
    }

    /// Stop `tracker` and log what it captured.
    ///
    /// Returns `Ok(None)` when the tracker was not running.
    pub async fn stop_and_log(
        &self,
        actor: &User,
        project_id: &ProjectId,
        tracker: &mut TimeTracker,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<TimeEntry>> {
        match tracker.stop(now) {
            Some(tracked) => {
                debug!(task = %tracked.task, seconds = tracked.seconds, "tracker stopped");
                self.log_time(actor, project_id, TimeEntryDraft::from_tracked(&tracked))
                    .await
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Edit an entry. Own entries, or `editAllTimeEntries`.
    pub async fn update_time_entry(
        &self,
        actor: &User,
        id: Uuid,
        update: TimeEntryUpdate,
    ) -> StoreResult<TimeEntry> {
        if let Some(minutes) = update.minutes {
            validate_minutes(minutes)?;
        }

        let entry = {
            let mut data = self.data.write().await;
            let index = entry_index(&data.time_entries, id)?;
            ensure_entry_editor(
                actor,
                data.project(&data.time_entries[index].project_id)?,
                &data.time_entries[index],
            )?;

            let entry = &mut data.time_entries[index];
            if let Some(task) = update.task {
                entry.task = task;
            }
            if let Some(description) = update.description {
                entry.description = description;
            }
            if let Some(date) = update.date {
                entry.date = date;
            }
            if let Some(minutes) = update.minutes {
                entry.minutes = minutes;
            }
            entry.clone()
        };

        self.announce(
            actor,
            TimeEvent::EntryUpdated {
                entry_id: id,
                project_id: entry.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(entry)
    }

    /// Delete an entry. Own entries, or `editAllTimeEntries`.
    pub async fn delete_time_entry(&self, actor: &User, id: Uuid) -> StoreResult<TimeEntry> {
        let entry = {
            let mut data = self.data.write().await;
            let index = entry_index(&data.time_entries, id)?;
            ensure_entry_editor(
                actor,
                data.project(&data.time_entries[index].project_id)?,
                &data.time_entries[index],
            )?;
            data.time_entries.remove(index)
        };

        info!(entry_id = %id, "time entry deleted");
        self.announce(
            actor,
            TimeEvent::EntryDeleted {
                entry_id: id,
                project_id: entry.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(entry)
    }

    /// Entries the actor may see: their own, plus everyone's where they hold
    /// `viewAllTimeEntries`. Newest date first.
    pub async fn time_entries(&self, actor: &User) -> Vec<TimeEntry> {
        let data = self.data.read().await;
        let mut entries: Vec<TimeEntry> = data
            .time_entries
            .iter()
            .filter(|e| {
                e.user_id == actor.id
                    || data
                        .project(&e.project_id)
                        .is_ok_and(|p| sees_all_entries(actor, p))
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// Totals over the actor's visible entries.
    pub async fn time_summary(&self, actor: &User, today: NaiveDate) -> TimeSummary {
        let entries = self.time_entries(actor).await;
        let data = self.data.read().await;
        TimeSummary::from_entries(&entries, &data.projects, today)
    }
}

fn entry_index(entries: &[TimeEntry], id: Uuid) -> StoreResult<usize> {
    entries
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| StoreError::not_found("time entry", id))
}
