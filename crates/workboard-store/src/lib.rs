//! # Workboard Store
//!
//! The application state of Workboard: every project, task, calendar entry,
//! time entry, document and inbox, held in one [`AppState`] with explicit
//! read and write operations.
//!
//! ## Overview
//!
//! The workboard-store crate handles:
//! - **Projects and Teams**: create, edit, archive, delete, membership
//! - **Tasks**: assignment, status, subtasks, comments
//! - **Calendar**: meetings, deadlines, milestones, reviews
//! - **Time Tracking**: entries, a start/pause/stop tracker, summaries
//! - **Documents**: upload metadata, search, categories
//! - **Notifications**: per-user inboxes and settings
//! - **Dashboard and Reports**: role-scoped stats, per-project reports, CSV export
//! - **Fixtures**: the demo workspace
//!
//! Every write takes the acting [`workboard_org::User`]. App-wide questions
//! ("may this user create projects?") go to the global role table; anything
//! inside a project goes to the project's capability table. A global role
//! never grants a project capability.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workboard_store::{AppState, TaskDraft, TaskPriority};
//! use workboard_org::{ProjectDraft, User};
//! use workboard_rbac::UserRole;
//! use chrono::NaiveDate;
//!
//! async fn example() -> workboard_store::StoreResult<()> {
//!     let state = AppState::in_memory();
//!     let john = User::new("user1", "John Doe", "user@example.com", UserRole::Manager);
//!
//!     let project = state
//!         .create_project(
//!             &john,
//!             ProjectDraft::new(
//!                 "Website Redesign",
//!                 NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!                 NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
//!             ),
//!         )
//!         .await?;
//!
//!     state
//!         .create_task(
//!             &john,
//!             &project.id,
//!             TaskDraft::new("Design homepage mockup").with_priority(TaskPriority::High),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Events
//!
//! Writes are announced on the [`workboard_events::EventBus`] the store was
//! built with, after the state lock is released. A failed publish is logged
//! and does not fail the write.

pub mod calendar;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod fixtures;
pub mod notifications;
pub mod reports;
pub mod state;
pub mod tasks;
pub mod time;

// Re-export main types
pub use calendar::{CalendarEvent, EventDraft, EventKind};
pub use dashboard::{DashboardStats, StatsScope, TaskDistribution, UpcomingDeadline};
pub use documents::{file_extension, format_size, Document, DocumentCategory, DocumentUpload};
pub use error::{StoreError, StoreResult};
pub use notifications::{
    Inbox, Notification, NotificationDraft, NotificationKind, NotificationSettings,
};
pub use reports::{efficiency, MemberReport, ProjectReport};
pub use state::AppState;
pub use tasks::{
    filter_by_status, Comment, Subtask, Task, TaskDraft, TaskPriority, TaskStatus, TaskUpdate,
};
pub use time::{
    format_clock, format_duration, minutes_on, total_minutes, ProjectTime, TimeEntry,
    MAX_ENTRY_MINUTES,
    TimeEntryDraft, TimeEntryUpdate, TimeSummary, TimeTracker, TrackedTime,
};
