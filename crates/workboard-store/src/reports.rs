//! Project reports
//!
//! A report is computed on demand from the store: task counts, tracked time
//! and a per-member breakdown. Reading one needs `viewReports` in the
//! project; exporting it as CSV needs `exportReports`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use workboard_org::{Project, ProjectCapability, ProjectId, ProjectRole, ProjectStatus, User, UserId};

use crate::dashboard::TaskDistribution;
use crate::error::{StoreError, StoreResult};
use crate::state::{AppState, StateData};
use crate::time::{format_duration, sum_minutes};

/// One team member's line in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReport {
    pub user_id: UserId,
    pub name: String,
    pub role: ProjectRole,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub minutes: u32,
    /// Completed share of assigned tasks, rounded percent
    pub efficiency: u8,
}

impl MemberReport {
    pub fn time_label(&self) -> String {
        format_duration(self.minutes)
    }
}

/// Completed share of `completed + pending`, as a rounded percentage.
/// Zero when nothing is assigned.
pub fn efficiency(completed: usize, pending: usize) -> u8 {
    let total = completed + pending;
    if total == 0 {
        return 0;
    }
    ((completed * 100 + total / 2) / total).min(100) as u8
}

/// Report for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_id: ProjectId,
    pub project_name: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub generated_at: DateTime<Utc>,
    pub tasks: TaskDistribution,
    pub total_minutes: u32,
    pub members: Vec<MemberReport>,
}

impl ProjectReport {
    fn build(data: &StateData, project: &Project) -> Self {
        let tasks: Vec<_> = data
            .tasks
            .iter()
            .filter(|t| t.project_id == project.id)
            .collect();
        let entries: Vec<_> = data
            .time_entries
            .iter()
            .filter(|e| e.project_id == project.id)
            .collect();

        let members = project
            .team
            .iter()
            .map(|m| {
                let assigned = TaskDistribution::from_tasks(
                    tasks.iter().copied().filter(|t| t.is_assigned_to(&m.user_id)),
                );
                MemberReport {
                    user_id: m.user_id.clone(),
                    name: m.name.clone(),
                    role: m.role,
                    completed_tasks: assigned.completed,
                    pending_tasks: assigned.pending(),
                    minutes: sum_minutes(
                        entries
                            .iter()
                            .filter(|e| e.user_id == m.user_id)
                            .map(|e| e.minutes),
                    ),
                    efficiency: efficiency(assigned.completed, assigned.pending()),
                }
            })
            .collect();

        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            status: project.status,
            progress: project.progress,
            generated_at: Utc::now(),
            tasks: TaskDistribution::from_tasks(tasks.iter().copied()),
            total_minutes: sum_minutes(entries.iter().map(|e| e.minutes)),
            members,
        }
    }

    /// Render the member breakdown as CSV, one row per member.
    ///
    /// # Examples
    ///
    /// ```
    /// use workboard_store::ProjectReport;
    ///
    /// # fn demo(report: &ProjectReport) -> workboard_store::StoreResult<()> {
    /// let csv = report.to_csv()?;
    /// assert!(csv.starts_with("Member,Role,Completed,Pending,Efficiency,Time"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_csv(&self) -> StoreResult<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(["Member", "Role", "Completed", "Pending", "Efficiency", "Time"])?;
        for member in &self.members {
            writer.write_record([
                member.name.clone(),
                member.role.display_name().to_string(),
                member.completed_tasks.to_string(),
                member.pending_tasks.to_string(),
                format!("{}%", member.efficiency),
                member.time_label(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| StoreError::Export(e.to_string()))
    }
}

impl AppState {
    /// Build the report for a project. Requires `viewReports`.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn project_report(&self, actor: &User, project_id: &ProjectId) -> StoreResult<ProjectReport> {
        let data = self.data.read().await;
        let project = data.project(project_id)?;
        project.ensure(&actor.id, ProjectCapability::ViewReports)?;

        let report = ProjectReport::build(&data, project);
        debug!(members = report.members.len(), "report built");
        Ok(report)
    }

    /// Build a project report and render it as CSV. Requires `exportReports`.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn export_report_csv(&self, actor: &User, project_id: &ProjectId) -> StoreResult<String> {
        let report = {
            let data = self.data.read().await;
            let project = data.project(project_id)?;
            project.ensure(&actor.id, ProjectCapability::ExportReports)?;
            ProjectReport::build(&data, project)
        };

        let csv = report.to_csv()?;
        info!(project_id = %project_id, bytes = csv.len(), "report exported");
        Ok(csv)
    }
}
