//! Team membership
//!
//! Links a user to one project with a project-scoped role. The display name
//! and email are copied at join time so a team list renders without a user
//! lookup.

use serde::{Deserialize, Serialize};

use crate::roles::ProjectRole;
use crate::user::{User, UserId};

/// A user's membership in one project's team.
///
/// # Examples
///
/// ```
/// use workboard_org::{ProjectRole, TeamMembership};
///
/// let membership = TeamMembership::new("user3", "Mike Johnson", "mike@example.com", ProjectRole::Member);
/// assert_eq!(membership.user_id.as_str(), "user3");
/// assert!(!membership.is_manager());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    /// Member's user ID
    pub user_id: UserId,

    /// Display name at join time
    pub name: String,

    /// Email at join time
    pub email: String,

    /// Role within the project
    pub role: ProjectRole,
}

impl TeamMembership {
    /// Creates a membership from raw fields.
    pub fn new(
        user_id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: ProjectRole,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Creates a membership for an existing user.
    ///
    /// # Arguments
    ///
    /// * `user` - The user joining the team
    /// * `role` - Their role in the project
    pub fn for_user(user: &User, role: ProjectRole) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role,
        }
    }

    /// Whether this is the project manager's membership.
    pub fn is_manager(&self) -> bool {
        self.role == ProjectRole::Manager
    }

    /// Avatar initials for the member.
    pub fn initials(&self) -> String {
        crate::user::initials(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workboard_rbac::UserRole;

    #[test]
    fn test_for_user_copies_profile() {
        let user = User::new("user2", "Jane Smith", "jane@example.com", UserRole::Manager);
        let membership = TeamMembership::for_user(&user, ProjectRole::Admin);

        assert_eq!(membership.user_id, user.id);
        assert_eq!(membership.name, "Jane Smith");
        assert_eq!(membership.role, ProjectRole::Admin);
        assert_eq!(membership.initials(), "JS");
    }

    #[test]
    fn test_membership_json_shape() {
        let membership =
            TeamMembership::new("user1", "John Doe", "user@example.com", ProjectRole::Manager);
        let json = serde_json::to_value(&membership).unwrap();

        assert_eq!(json["userId"], "user1");
        assert_eq!(json["role"], "manager");
        assert!(membership.is_manager());
    }
}
