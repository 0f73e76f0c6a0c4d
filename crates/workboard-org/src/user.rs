//! User domain model
//!
//! A signed-in user and the identifier type shared by every record that
//! points at a user.

use serde::{Deserialize, Serialize};
use workboard_rbac::UserRole;

/// Opaque user identifier.
///
/// Ids are strings so fixture ids such as `"user1"` and generated UUIDs
/// share one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user of the app.
///
/// # Examples
///
/// ```
/// use workboard_org::User;
/// use workboard_rbac::UserRole;
///
/// let user = User::new("user1", "John Doe", "john@example.com", UserRole::Manager);
/// assert_eq!(user.initials(), "JD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Global role
    pub role: UserRole,
}

impl User {
    /// Creates a new user.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Upper-case initials of the display name, used for avatars.
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Upper-case initials of every word in `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
