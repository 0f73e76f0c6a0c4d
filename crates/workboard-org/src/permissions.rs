//! Project permission lookups
//!
//! Pure functions over an optional project. A missing project or a user
//! who is not on the team resolves to no role, and no role holds no
//! capability.

use crate::capabilities::ProjectCapability;
use crate::project::Project;
use crate::roles::ProjectRole;
use crate::user::UserId;

/// Resolve a user's role in a project.
///
/// # Returns
///
/// `None` when the project is missing or the user is not on its team.
///
/// # Examples
///
/// ```
/// use workboard_org::{role_in_project, UserId};
///
/// assert_eq!(role_in_project(None, &UserId::from("user1")), None);
/// ```
pub fn role_in_project(project: Option<&Project>, user_id: &UserId) -> Option<ProjectRole> {
    project.and_then(|p| p.role_of(user_id))
}

/// Check whether a user holds a capability in a project.
pub fn has_project_permission(
    project: Option<&Project>,
    user_id: &UserId,
    capability: ProjectCapability,
) -> bool {
    role_in_project(project, user_id)
        .map(|role| role.allows(capability))
        .unwrap_or(false)
}

/// String-keyed variant of [`has_project_permission`]; unknown capability
/// names are denied.
pub fn check_project_permission(project: Option<&Project>, user_id: &UserId, capability: &str) -> bool {
    ProjectCapability::parse(capability)
        .map(|cap| has_project_permission(project, user_id, cap))
        .unwrap_or(false)
}

/// Roles the user may assign in this project.
///
/// Managers assign admin and member, admins assign member, everyone else
/// nothing.
pub fn assignable_roles(project: Option<&Project>, user_id: &UserId) -> Vec<ProjectRole> {
    role_in_project(project, user_id)
        .map(|role| role.assignable_roles().to_vec())
        .unwrap_or_default()
}

/// Whether the user manages the project.
pub fn is_project_manager(project: Option<&Project>, user_id: &UserId) -> bool {
    role_in_project(project, user_id) == Some(ProjectRole::Manager)
}

/// Whether the user is a manager or admin of the project.
pub fn is_project_admin(project: Option<&Project>, user_id: &UserId) -> bool {
    matches!(
        role_in_project(project, user_id),
        Some(ProjectRole::Manager | ProjectRole::Admin)
    )
}

/// Whether the user is on the project team in any role.
pub fn is_project_member(project: Option<&Project>, user_id: &UserId) -> bool {
    role_in_project(project, user_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::TeamMembership;
    use crate::project::ProjectDraft;
    use crate::user::User;
    use chrono::NaiveDate;
    use workboard_rbac::UserRole;

    fn website_redesign() -> Project {
        let john = User::new("user1", "John Doe", "user@example.com", UserRole::Manager);
        let mut project = Project::new(
            ProjectDraft::new(
                "Website Redesign",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            ),
            &john,
        )
        .unwrap();
        project.team.push(TeamMembership::new(
            "user2",
            "Jane Smith",
            "jane@example.com",
            ProjectRole::Admin,
        ));
        project.team.push(TeamMembership::new(
            "user3",
            "Mike Johnson",
            "mike@example.com",
            ProjectRole::Member,
        ));
        project
    }

    #[test]
    fn test_missing_project_resolves_to_nothing() {
        let user = UserId::from("user1");
        assert_eq!(role_in_project(None, &user), None);
        assert!(assignable_roles(None, &user).is_empty());
        for cap in ProjectCapability::ALL {
            assert!(!has_project_permission(None, &user, cap));
        }
    }

    #[test]
    fn test_non_member_holds_no_capability() {
        let project = website_redesign();
        let outsider = UserId::from("user4");

        assert_eq!(role_in_project(Some(&project), &outsider), None);
        assert!(!is_project_member(Some(&project), &outsider));
        for cap in ProjectCapability::ALL {
            assert!(!has_project_permission(Some(&project), &outsider, cap));
        }
    }

    #[test]
    fn test_admin_cannot_delete_project() {
        let project = website_redesign();
        let jane = UserId::from("user2");

        assert!(!has_project_permission(
            Some(&project),
            &jane,
            ProjectCapability::DeleteProject
        ));
        assert!(has_project_permission(
            Some(&project),
            &jane,
            ProjectCapability::EditProject
        ));
    }

    #[test]
    fn test_assignable_roles_by_membership() {
        let project = website_redesign();

        assert_eq!(
            assignable_roles(Some(&project), &UserId::from("user1")),
            vec![ProjectRole::Admin, ProjectRole::Member]
        );
        assert_eq!(
            assignable_roles(Some(&project), &UserId::from("user2")),
            vec![ProjectRole::Member]
        );
        assert!(assignable_roles(Some(&project), &UserId::from("user3")).is_empty());
    }

    #[test]
    fn test_role_predicates() {
        let project = website_redesign();
        let p = Some(&project);

        assert!(is_project_manager(p, &UserId::from("user1")));
        assert!(is_project_admin(p, &UserId::from("user1")));
        assert!(is_project_admin(p, &UserId::from("user2")));
        assert!(!is_project_manager(p, &UserId::from("user2")));
        assert!(!is_project_admin(p, &UserId::from("user3")));
        assert!(is_project_member(p, &UserId::from("user3")));
    }

    #[test]
    fn test_string_boundary_fails_closed() {
        let project = website_redesign();
        let john = UserId::from("user1");

        assert!(check_project_permission(Some(&project), &john, "deleteProject"));
        assert!(!check_project_permission(Some(&project), &john, "launchRocket"));
    }

    #[test]
    fn test_lookups_are_stable() {
        let project = website_redesign();
        let jane = UserId::from("user2");
        for cap in ProjectCapability::ALL {
            assert_eq!(
                has_project_permission(Some(&project), &jane, cap),
                has_project_permission(Some(&project), &jane, cap)
            );
        }
    }
}
