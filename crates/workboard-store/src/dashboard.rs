//! Dashboard statistics
//!
//! What the dashboard shows depends on the global role: `view_all_stats`
//! counts everything, `view_team_stats` counts the projects the user is on,
//! and everyone else sees only their own assigned work.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workboard_org::{AccessContext, ProjectId, ProjectStatus, User};
use workboard_rbac::Permission;

use crate::state::{AppState, StateData};
use crate::tasks::{Task, TaskPriority, TaskStatus};
use crate::time::{format_duration, sum_minutes};

/// Which records the dashboard counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatsScope {
    /// Every project
    All,
    /// The user's projects
    Team,
    /// The user's own assignments and time
    Own,
}

impl StatsScope {
    pub fn for_user(user: &User) -> Self {
        let access = AccessContext::new(user);
        if access.can(Permission::ViewAllStats) {
            StatsScope::All
        } else if access.can(Permission::ViewTeamStats) {
            StatsScope::Team
        } else {
            StatsScope::Own
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsScope::All => "all",
            StatsScope::Team => "team",
            StatsScope::Own => "own",
        }
    }
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub scope: StatsScope,
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub team_members: usize,
    pub minutes_tracked: u32,
}

impl DashboardStats {
    pub fn hours_tracked(&self) -> u32 {
        self.minutes_tracked / 60
    }

    pub fn time_label(&self) -> String {
        format_duration(self.minutes_tracked)
    }
}

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDistribution {
    pub not_started: usize,
    pub in_progress: usize,
    pub review: usize,
    pub completed: usize,
}

impl TaskDistribution {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut distribution = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::NotStarted => distribution.not_started += 1,
                TaskStatus::InProgress => distribution.in_progress += 1,
                TaskStatus::Review => distribution.review += 1,
                TaskStatus::Completed => distribution.completed += 1,
            }
        }
        distribution
    }

    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.review + self.completed
    }

    pub fn pending(&self) -> usize {
        self.total() - self.completed
    }
}

/// An open task with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub task_id: Uuid,
    pub title: String,
    pub project_id: ProjectId,
    pub project_name: String,
    pub deadline: NaiveDate,
    pub priority: TaskPriority,
}

/// Projects and tasks counted for `user` under `scope`.
fn scoped<'a>(data: &'a StateData, user: &User, scope: StatsScope) -> (HashSet<ProjectId>, Vec<&'a Task>) {
    let projects: HashSet<ProjectId> = data
        .projects
        .iter()
        .filter(|p| scope == StatsScope::All || p.is_member(&user.id))
        .map(|p| p.id.clone())
        .collect();
    let tasks = data
        .tasks
        .iter()
        .filter(|t| match scope {
            StatsScope::All => true,
            StatsScope::Team => projects.contains(&t.project_id),
            StatsScope::Own => t.is_assigned_to(&user.id),
        })
        .collect();
    (projects, tasks)
}

impl AppState {
    /// Headline numbers for the actor's dashboard.
    pub async fn dashboard_stats(&self, actor: &User) -> DashboardStats {
        let scope = StatsScope::for_user(actor);
        let data = self.data.read().await;
        let (projects, tasks) = scoped(&data, actor, scope);
        let distribution = TaskDistribution::from_tasks(tasks.iter().copied());

        let team_members = match scope {
            StatsScope::Own => 1,
            _ => data
                .projects
                .iter()
                .filter(|p| projects.contains(&p.id))
                .flat_map(|p| p.team.iter().map(|m| &m.user_id))
                .collect::<HashSet<_>>()
                .len(),
        };
        let minutes_tracked = sum_minutes(
            data.time_entries
                .iter()
                .filter(|e| match scope {
                    StatsScope::All => true,
                    StatsScope::Team => projects.contains(&e.project_id),
                    StatsScope::Own => e.user_id == actor.id,
                })
                .map(|e| e.minutes),
        );

        DashboardStats {
            scope,
            total_projects: projects.len(),
            active_projects: data
                .projects
                .iter()
                .filter(|p| projects.contains(&p.id) && p.status == ProjectStatus::Active)
                .count(),
            completed_tasks: distribution.completed,
            pending_tasks: distribution.pending(),
            team_members,
            minutes_tracked,
        }
    }

    /// Task counts per status under the actor's dashboard scope.
    pub async fn task_distribution(&self, actor: &User) -> TaskDistribution {
        let data = self.data.read().await;
        let (_, tasks) = scoped(&data, actor, StatsScope::for_user(actor));
        TaskDistribution::from_tasks(tasks)
    }

    /// Open tasks due on or after `from`, soonest first. Scoped like the
    /// rest of the dashboard.
    pub async fn upcoming_deadlines(&self, actor: &User, from: NaiveDate, limit: usize) -> Vec<UpcomingDeadline> {
        let data = self.data.read().await;
        let (_, tasks) = scoped(&data, actor, StatsScope::for_user(actor));

        let mut deadlines: Vec<UpcomingDeadline> = tasks
            .into_iter()
            .filter(|t| !t.status.is_done())
            .filter_map(|t| {
                let deadline = t.deadline.filter(|d| *d >= from)?;
                let project = data.project(&t.project_id).ok()?;
                Some(UpcomingDeadline {
                    task_id: t.id,
                    title: t.title.clone(),
                    project_id: t.project_id.clone(),
                    project_name: project.name.clone(),
                    deadline,
                    priority: t.priority,
                })
            })
            .collect();
        deadlines.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(b.priority.cmp(&a.priority)));
        deadlines.truncate(limit);
        deadlines
    }
}
