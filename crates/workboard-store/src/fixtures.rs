//! Demo data
//!
//! The workspace the app opens with before any backend exists: four users,
//! five projects with their teams, and a handful of tasks, calendar
//! entries, time entries and documents spread across them.
//!
//! ## Usage
//!
//! ```
//! use workboard_store::{fixtures, AppState};
//!
//! # tokio_test_block(async {
//! let state = AppState::demo();
//! let john = fixtures::user("user1").unwrap();
//! assert_eq!(state.visible_projects(&john).await.len(), 5);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use workboard_events::{EventBus, MemoryEventBus};
use workboard_org::{Project, ProjectId, ProjectRole, ProjectStatus, TeamMembership, User, UserId};
use workboard_rbac::UserRole;

use crate::calendar::{CalendarEvent, EventKind};
use crate::documents::{file_extension, Document, DocumentCategory};
use crate::state::{AppState, StateData};
use crate::tasks::{Subtask, Task, TaskPriority, TaskStatus};
use crate::time::TimeEntry;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    day.and_hms_opt(hour, minute, 0).unwrap_or_default().and_utc()
}

/// The four demo users.
pub fn users() -> Vec<User> {
    vec![
        User::new("user1", "John Doe", "user@example.com", UserRole::Manager),
        User::new("user2", "Jane Smith", "jane@example.com", UserRole::Admin),
        User::new("user3", "Mike Johnson", "mike@example.com", UserRole::Member),
        User::new("user4", "Sarah Wilson", "sarah@example.com", UserRole::Member),
    ]
}

/// Look up a demo user by id.
pub fn user(id: &str) -> Option<User> {
    users().into_iter().find(|u| u.id.as_str() == id)
}

fn team(entries: &[(&str, ProjectRole)]) -> Vec<TeamMembership> {
    entries
        .iter()
        .filter_map(|(id, role)| user(id).map(|u| TeamMembership::for_user(&u, *role)))
        .collect()
}

struct ProjectSeed<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    status: ProjectStatus,
    progress: u8,
    start: NaiveDate,
    end: NaiveDate,
    color: &'a str,
    team: Vec<TeamMembership>,
}

impl ProjectSeed<'_> {
    fn build(self) -> Project {
        let created_by = self
            .team
            .iter()
            .find(|m| m.is_manager())
            .map(|m| m.user_id.clone())
            .unwrap_or_else(|| UserId::new("user1"));
        Project {
            id: ProjectId::new(self.id),
            name: self.name.to_string(),
            description: self.description.to_string(),
            objective: String::new(),
            status: self.status,
            progress: self.progress,
            start_date: self.start,
            end_date: self.end,
            color: Some(self.color.to_string()),
            is_archived: false,
            created_by,
            created_at: self.start,
            team: self.team,
        }
    }
}

/// The five demo projects, ids `"1"` to `"5"`.
pub fn projects() -> Vec<Project> {
    use ProjectRole::{Admin, Manager, Member};

    [
        ProjectSeed {
            id: "1",
            name: "Website Redesign",
            description: "Redesign company website with modern UI/UX",
            status: ProjectStatus::Active,
            progress: 65,
            start: date(2025, 1, 1),
            end: date(2025, 3, 31),
            color: "bg-blue-500",
            team: team(&[("user1", Manager), ("user2", Admin), ("user3", Member)]),
        },
        ProjectSeed {
            id: "2",
            name: "Mobile App Development",
            description: "Build native mobile app for iOS and Android",
            status: ProjectStatus::Active,
            progress: 40,
            start: date(2025, 1, 15),
            end: date(2025, 6, 30),
            color: "bg-purple-500",
            team: team(&[("user2", Manager), ("user1", Admin), ("user4", Member)]),
        },
        ProjectSeed {
            id: "3",
            name: "Marketing Campaign Q1",
            description: "Plan and execute Q1 marketing campaigns",
            status: ProjectStatus::Active,
            progress: 80,
            start: date(2024, 12, 1),
            end: date(2025, 3, 31),
            color: "bg-green-500",
            team: team(&[("user3", Manager), ("user2", Member)]),
        },
        ProjectSeed {
            id: "4",
            name: "API Integration",
            description: "Integrate third-party APIs and services",
            status: ProjectStatus::Planning,
            progress: 15,
            start: date(2025, 2, 1),
            end: date(2025, 4, 30),
            color: "bg-orange-500",
            team: team(&[("user1", Manager), ("user3", Admin)]),
        },
        ProjectSeed {
            id: "5",
            name: "Database Migration",
            description: "Migrate legacy database to new infrastructure",
            status: ProjectStatus::Completed,
            progress: 100,
            start: date(2024, 10, 1),
            end: date(2024, 12, 31),
            color: "bg-teal-500",
            team: team(&[("user2", Manager), ("user1", Member), ("user3", Member)]),
        },
    ]
    .into_iter()
    .map(ProjectSeed::build)
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn task(
    project: &str,
    title: &str,
    description: &str,
    assignee: &str,
    priority: TaskPriority,
    status: TaskStatus,
    deadline: NaiveDate,
    subtasks: &[(&str, bool)],
) -> Task {
    Task {
        id: Uuid::now_v7(),
        project_id: ProjectId::new(project),
        title: title.to_string(),
        description: description.to_string(),
        assignee: Some(UserId::new(assignee)),
        priority,
        status,
        deadline: Some(deadline),
        subtasks: subtasks
            .iter()
            .map(|(title, completed)| Subtask {
                completed: *completed,
                ..Subtask::new(*title)
            })
            .collect(),
        comments: Vec::new(),
        attachments: 0,
        created_by: UserId::new("user1"),
        created_at: at(date(2026, 1, 1), 9, 0),
    }
}

/// Demo tasks. Every assignee is on the task's project team.
pub fn tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Design homepage mockup",
            "Create a modern homepage mockup",
            "user1",
            TaskPriority::High,
            TaskStatus::InProgress,
            date(2026, 1, 8),
            &[
                ("Research competitor websites", true),
                ("Create wireframe", true),
                ("Design mockup", false),
            ],
        ),
        task(
            "2",
            "Implement user authentication",
            "Set up JWT authentication for the API",
            "user4",
            TaskPriority::High,
            TaskStatus::InProgress,
            date(2026, 1, 10),
            &[
                ("Setup JWT library", true),
                ("Create login endpoint", false),
                ("Add token validation", false),
            ],
        ),
        task(
            "3",
            "Write content for landing page",
            "Write the landing page copy",
            "user2",
            TaskPriority::Medium,
            TaskStatus::Review,
            date(2026, 1, 12),
            &[],
        ),
        task(
            "5",
            "Setup cloud infrastructure",
            "Configure servers and the database in the cloud",
            "user3",
            TaskPriority::High,
            TaskStatus::NotStarted,
            date(2026, 1, 15),
            &[],
        ),
    ]
}

/// Demo calendar entries.
pub fn calendar() -> Vec<CalendarEvent> {
    let event = |project: &str, title: &str, day: NaiveDate, kind: EventKind, priority: TaskPriority, by: &str| {
        CalendarEvent {
            id: Uuid::now_v7(),
            project_id: ProjectId::new(project),
            title: title.to_string(),
            date: day,
            time: None,
            kind,
            priority,
            created_by: UserId::new(by),
        }
    };

    vec![
        event("1", "Design homepage mockup", date(2026, 1, 8), EventKind::Deadline, TaskPriority::High, "user1"),
        event("1", "Team meeting - Sprint planning", date(2026, 1, 7), EventKind::Meeting, TaskPriority::Medium, "user1"),
        event("2", "Complete API integration", date(2026, 1, 9), EventKind::Deadline, TaskPriority::High, "user2"),
        event("3", "Marketing materials review", date(2026, 1, 10), EventKind::Deadline, TaskPriority::Medium, "user3"),
        event("5", "Setup test environment", date(2026, 1, 12), EventKind::Task, TaskPriority::Low, "user2"),
        event("1", "Client presentation", date(2026, 1, 15), EventKind::Meeting, TaskPriority::High, "user1"),
        event("2", "Deploy to staging", date(2026, 1, 20), EventKind::Task, TaskPriority::Medium, "user2"),
    ]
}

/// Demo time entries.
pub fn time_entries() -> Vec<TimeEntry> {
    let entry = |project: &str, user: &str, task: &str, day: NaiveDate, minutes: u32| TimeEntry {
        id: Uuid::now_v7(),
        project_id: ProjectId::new(project),
        user_id: UserId::new(user),
        task: task.to_string(),
        description: String::new(),
        date: day,
        minutes,
        created_at: at(day, 17, 0),
    };

    vec![
        entry("1", "user1", "Design homepage mockup", date(2026, 1, 6), 240),
        entry("2", "user1", "Implement user authentication", date(2026, 1, 6), 180),
        entry("3", "user2", "Write marketing content", date(2026, 1, 5), 120),
        entry("5", "user1", "Database optimization", date(2026, 1, 5), 150),
        entry("1", "user1", "Code review", date(2026, 1, 4), 90),
    ]
}

/// Demo document metadata.
pub fn documents() -> Vec<Document> {
    let doc = |project: &str,
               name: &str,
               size_bytes: u64,
               by: &str,
               uploaded_at: DateTime<Utc>,
               version: &str,
               category: DocumentCategory| {
        let uploader = user(by);
        Document {
            id: Uuid::now_v7(),
            project_id: ProjectId::new(project),
            name: name.to_string(),
            file_type: file_extension(name).unwrap_or_default(),
            size_bytes,
            category,
            version: version.to_string(),
            uploaded_by: UserId::new(by),
            uploaded_by_name: uploader.map(|u| u.name).unwrap_or_default(),
            uploaded_at,
        }
    };

    use DocumentCategory::{Code, Design, Document as Doc, Image, Spreadsheet};
    vec![
        doc("1", "Design System.pdf", 2_516_582, "user1", at(date(2026, 1, 5), 14, 30), "v2.0", Design),
        doc("2", "API Documentation.docx", 1_258_291, "user4", at(date(2026, 1, 4), 10, 15), "v1.5", Doc),
        doc("1", "Mockup Homepage.png", 3_984_589, "user1", at(date(2026, 1, 6), 9, 20), "v3.0", Image),
        doc("3", "Budget Q1 2026.xlsx", 870_400, "user2", at(date(2026, 1, 3), 16, 45), "v1.0", Spreadsheet),
        doc("5", "Database Schema.sql", 46_080, "user3", at(date(2026, 1, 2), 11, 30), "v2.1", Code),
        doc("2", "User Flow Diagram.pdf", 1_572_864, "user2", at(date(2026, 1, 1), 13, 20), "v1.0", Design),
        doc("3", "Brand Guidelines.pdf", 5_452_595, "user3", at(date(2025, 12, 28), 15, 0), "v1.0", Doc),
        doc("1", "Component Library.zip", 12_897_485, "user2", at(date(2025, 12, 30), 10, 0), "v1.2", Code),
    ]
}

/// Every demo record in one [`StateData`].
pub(crate) fn demo_data() -> StateData {
    StateData {
        projects: projects(),
        tasks: tasks(),
        calendar: calendar(),
        time_entries: time_entries(),
        documents: documents(),
        ..Default::default()
    }
}

impl AppState {
    /// A store preloaded with the demo workspace, on an in-memory bus.
    pub fn demo() -> Self {
        Self::demo_with_events(Arc::new(MemoryEventBus::new()))
    }

    /// A store preloaded with the demo workspace, announcing on `events`.
    pub fn demo_with_events(events: Arc<dyn EventBus>) -> Self {
        Self::with_data(demo_data(), events)
    }
}
