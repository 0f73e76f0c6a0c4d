//! # App Modules
//!
//! The top-level areas of the Workboard app. Module visibility is gated by
//! the user's global role.

use serde::{Deserialize, Serialize};

/// An application module (sidebar entry).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum AppModule {
    /// Landing dashboard with stats.
    Dashboard,
    /// Project list and project overview.
    Projects,
    /// Task board.
    Tasks,
    /// Calendar of meetings, deadlines and milestones.
    Calendar,
    /// Team directory.
    Team,
    /// Reports and exports.
    Reports,
    /// Time tracker and time entries.
    TimeTracking,
    /// Document library.
    Documents,
    /// Notification inbox.
    Notifications,
    /// User and system settings.
    Settings,
}

impl AppModule {
    /// Every module in sidebar order.
    pub const ALL: [AppModule; 10] = [
        AppModule::Dashboard,
        AppModule::Projects,
        AppModule::Tasks,
        AppModule::Calendar,
        AppModule::Team,
        AppModule::Reports,
        AppModule::TimeTracking,
        AppModule::Documents,
        AppModule::Notifications,
        AppModule::Settings,
    ];

    /// Get the string representation of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppModule::Dashboard => "dashboard",
            AppModule::Projects => "projects",
            AppModule::Tasks => "tasks",
            AppModule::Calendar => "calendar",
            AppModule::Team => "team",
            AppModule::Reports => "reports",
            AppModule::TimeTracking => "time-tracking",
            AppModule::Documents => "documents",
            AppModule::Notifications => "notifications",
            AppModule::Settings => "settings",
        }
    }

    /// Parse a module from its name.
    ///
    /// Case-insensitive. `timetracking` and `time_tracking` are accepted as
    /// aliases of `time-tracking`.
    ///
    /// # Example
    ///
    /// ```
    /// use workboard_rbac::AppModule;
    ///
    /// assert_eq!(AppModule::parse("time-tracking"), Some(AppModule::TimeTracking));
    /// assert_eq!(AppModule::parse("Reports"), Some(AppModule::Reports));
    /// assert_eq!(AppModule::parse("billing"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dashboard" => Some(AppModule::Dashboard),
            "projects" => Some(AppModule::Projects),
            "tasks" => Some(AppModule::Tasks),
            "calendar" => Some(AppModule::Calendar),
            "team" => Some(AppModule::Team),
            "reports" => Some(AppModule::Reports),
            "time-tracking" | "timetracking" | "time_tracking" => Some(AppModule::TimeTracking),
            "documents" => Some(AppModule::Documents),
            "notifications" => Some(AppModule::Notifications),
            "settings" => Some(AppModule::Settings),
            _ => None,
        }
    }

    /// Human-readable label for the sidebar.
    pub fn display_name(&self) -> &'static str {
        match self {
            AppModule::Dashboard => "Dashboard",
            AppModule::Projects => "Projects",
            AppModule::Tasks => "Tasks",
            AppModule::Calendar => "Calendar",
            AppModule::Team => "Team",
            AppModule::Reports => "Reports",
            AppModule::TimeTracking => "Time Tracking",
            AppModule::Documents => "Documents",
            AppModule::Notifications => "Notifications",
            AppModule::Settings => "Settings",
        }
    }
}

impl std::fmt::Display for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
