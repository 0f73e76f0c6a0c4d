//! Project-scoped roles
//!
//! A user's role inside one project. Same names as the global roles but a
//! different scope: a user can manage one project and be a plain member of
//! another.

use serde::{Deserialize, Serialize};

/// User role within a project.
///
/// The hierarchy is: Member < Admin < Manager
///
/// # Permission Model
///
/// - **Member**: works on tasks, uploads documents, reads reports
/// - **Admin**: manages tasks, documents and members, cannot change roles
/// - **Manager**: full project control including deletion and role changes
///
/// # Examples
///
/// ```
/// use workboard_org::ProjectRole;
///
/// assert!(ProjectRole::Manager > ProjectRole::Admin);
/// assert_eq!(ProjectRole::parse("ADMIN"), Some(ProjectRole::Admin));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Regular team member
    Member = 1,

    /// Project administrator
    Admin = 2,

    /// Project manager (assigned at creation)
    Manager = 3,
}

impl ProjectRole {
    /// Every role, highest first.
    pub const ALL: [ProjectRole; 3] = [ProjectRole::Manager, ProjectRole::Admin, ProjectRole::Member];

    /// Parse role from string representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use workboard_org::ProjectRole;
    ///
    /// assert_eq!(ProjectRole::parse("manager"), Some(ProjectRole::Manager));
    /// assert_eq!(ProjectRole::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }

    /// CSS classes for the role badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Manager => "bg-purple-100 text-purple-700 border-purple-200",
            Self::Admin => "bg-blue-100 text-blue-700 border-blue-200",
            Self::Member => "bg-gray-100 text-gray-700 border-gray-200",
        }
    }

    /// Icon shown next to the role.
    pub fn icon(&self) -> RoleIcon {
        match self {
            Self::Manager => RoleIcon::Crown,
            Self::Admin => RoleIcon::Shield,
            Self::Member => RoleIcon::User,
        }
    }

    /// Roles this role may hand out to others.
    ///
    /// Strictly below the role itself; nobody grants their own level.
    pub fn assignable_roles(&self) -> &'static [ProjectRole] {
        match self {
            Self::Manager => &[ProjectRole::Admin, ProjectRole::Member],
            Self::Admin => &[ProjectRole::Member],
            Self::Member => &[],
        }
    }

    /// Check whether this role may assign `other`.
    pub fn can_assign(&self, other: ProjectRole) -> bool {
        self.assignable_roles().contains(&other)
    }
}

impl Default for ProjectRole {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon names used for role badges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleIcon {
    Crown,
    Shield,
    User,
}

impl RoleIcon {
    /// Icon name in the UI icon set.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleIcon::Crown => "crown",
            RoleIcon::Shield => "shield",
            RoleIcon::User => "user",
        }
    }

    /// Icon for an arbitrary role string; unknown roles get the plain user icon.
    pub fn for_role_name(role: &str) -> Self {
        ProjectRole::parse(role)
            .map(|r| r.icon())
            .unwrap_or(RoleIcon::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_role_hierarchy() {
        assert!(ProjectRole::Manager > ProjectRole::Admin);
        assert!(ProjectRole::Admin > ProjectRole::Member);
    }

    #[test]
    fn test_assignable_roles_are_strictly_lower() {
        assert_eq!(
            ProjectRole::Manager.assignable_roles(),
            &[ProjectRole::Admin, ProjectRole::Member]
        );
        assert_eq!(ProjectRole::Admin.assignable_roles(), &[ProjectRole::Member]);
        assert!(ProjectRole::Member.assignable_roles().is_empty());

        for role in ProjectRole::ALL {
            for assignable in role.assignable_roles() {
                assert!(*assignable < role);
            }
            assert!(!role.can_assign(role));
            assert!(!role.can_assign(ProjectRole::Manager));
        }
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(ProjectRole::Manager.display_name(), "Manager");
        assert_eq!(ProjectRole::Admin.badge_class(), "bg-blue-100 text-blue-700 border-blue-200");
        assert_eq!(ProjectRole::Manager.icon(), RoleIcon::Crown);
        assert_eq!(ProjectRole::Admin.icon(), RoleIcon::Shield);
        assert_eq!(ProjectRole::Member.icon(), RoleIcon::User);
        assert_eq!(RoleIcon::for_role_name("guest"), RoleIcon::User);
        assert_eq!(RoleIcon::for_role_name("manager").as_str(), "crown");
    }

    #[test]
    fn test_project_role_parse() {
        assert_eq!(ProjectRole::parse("Admin"), Some(ProjectRole::Admin));
        assert_eq!(ProjectRole::parse("viewer"), None);
    }
}
