//! # Workboard Events
//!
//! Domain events for Workboard: every write to the application state is
//! announced here so views, notification fan-out and audit consumers can
//! react without the store knowing about them.
//!
//! ## Overview
//!
//! The workboard-events crate handles:
//! - **Event Envelope**: id, type, source module, project, actor, payload
//! - **Event Types**: typed events per module
//! - **Event Bus**: publish/subscribe messaging
//! - **Event Handlers**: async event processing
//!
//! ## Event Types
//!
//! - `ProjectEvent`: project lifecycle
//! - `TeamEvent`: team membership and role changes
//! - `TaskEvent`: tasks, assignment, status and comments
//! - `ScheduleEvent`: calendar entries
//! - `TimeEvent`: time entries
//! - `DocumentEvent`: uploads and deletions
//! - `NotificationEvent`: inbox changes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workboard_events::{EventBus, MemoryEventBus, ProjectEvent};
//! use workboard_org::ProjectId;
//!
//! async fn example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // Everything the projects module publishes
//!     let mut sub = bus.subscribe("projects.#").await.unwrap();
//!
//!     let event = ProjectEvent::Created {
//!         project_id: ProjectId::from("1"),
//!         name: "Website Redesign".to_string(),
//!     };
//!     bus.publish(event.to_event()).await.unwrap();
//!
//!     let received = sub.recv().await.unwrap();
//!     assert_eq!(received.event_type, "project.created");
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are structured as `{module}.{event_type}`:
//! - `tasks.task.created` - Specific event
//! - `tasks.task.*` - All task events
//! - `*.project.#` - Project events from any module
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments

pub mod bus;
pub mod types;

// Re-export main types
pub use bus::{
    EventBus, EventBusError, EventBusResult, EventBusStats, EventHandler, MemoryEventBus,
    Subscription, TopicPattern,
};
pub use types::{
    DocumentEvent, Event, NotificationEvent, ProjectEvent, ScheduleEvent, TaskEvent, TeamEvent,
    TimeEvent,
};
