//! # Global Roles
//!
//! App-wide user roles. These control which modules a user sees and which
//! app-level actions they may take. Project-scoped roles live in
//! `workboard-org` and are a separate scope with the same names.

use serde::{Deserialize, Serialize};

/// A user's global role.
///
/// # Examples
///
/// ```
/// use workboard_rbac::UserRole;
///
/// assert_eq!(UserRole::parse("manager"), Some(UserRole::Manager));
/// assert_eq!(UserRole::Member.display_name(), "Team Member");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full system access.
    Admin,

    /// Manages assigned projects and teams.
    Manager,

    /// Limited access to assigned work.
    Member,
}

impl UserRole {
    /// Every role.
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Manager, UserRole::Member];

    /// Parse role from string representation.
    ///
    /// Case-insensitive. Returns `None` for unknown roles so callers fail
    /// closed.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Manager => "Manager",
            Self::Member => "Team Member",
        }
    }

    /// One-line description shown next to the role.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Full system access - manages every project, team and system setting",
            Self::Manager => "Manages teams and projects - runs the projects and teams assigned to them",
            Self::Member => "Limited access - views and works on assigned tasks",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("MANAGER"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.display_name(), "Administrator");
        assert_eq!(UserRole::Manager.display_name(), "Manager");
        assert_eq!(UserRole::Member.to_string(), "member");
    }

    #[test]
    fn test_user_role_rejects_unknown_json() {
        let parsed: Result<UserRole, _> = serde_json::from_str("\"superuser\"");
        assert!(parsed.is_err());
    }
}
