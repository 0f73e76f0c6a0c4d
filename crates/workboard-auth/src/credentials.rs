//! Mock credential directory
//!
//! A small in-process account list standing in for a user database.
//! Passwords are kept only as SHA-256 digests.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;
use workboard_org::User;
use workboard_rbac::UserRole;

use crate::error::{AuthError, AuthResult};

/// Digest a password for storage and comparison.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let hash = hasher.finalize();
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, hash)
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_digest: String,
}

/// Accounts keyed by email.
///
/// # Examples
///
/// ```
/// use workboard_auth::CredentialDirectory;
/// use workboard_rbac::UserRole;
///
/// let directory = CredentialDirectory::with_demo_users();
/// let user = directory.verify("admin@example.com", "admin123").unwrap();
/// assert_eq!(user.role, UserRole::Admin);
///
/// assert!(directory.verify("admin@example.com", "wrong").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialDirectory {
    accounts: HashMap<String, Account>,
}

impl CredentialDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The three demo accounts, one per global role.
    pub fn with_demo_users() -> Self {
        let mut directory = Self::new();
        let demo = [
            ("1", "Admin User", "admin@example.com", "admin123", UserRole::Admin),
            ("2", "Manager User", "manager@example.com", "manager123", UserRole::Manager),
            ("3", "Team Member", "member@example.com", "member123", UserRole::Member),
        ];
        for (id, name, email, password, role) in demo {
            directory.accounts.insert(
                email.to_string(),
                Account {
                    user: User::new(id, name, email, role),
                    password_digest: password_digest(password),
                },
            );
        }
        directory
    }

    /// Add an account.
    ///
    /// # Errors
    ///
    /// `DuplicateAccount` if the email is already registered.
    pub fn register(&mut self, user: User, password: &str) -> AuthResult<()> {
        if self.accounts.contains_key(&user.email) {
            return Err(AuthError::DuplicateAccount(user.email));
        }
        self.accounts.insert(
            user.email.clone(),
            Account {
                user,
                password_digest: password_digest(password),
            },
        );
        Ok(())
    }

    /// Check an email/password pair.
    ///
    /// Email match is exact. Any mismatch, including an unknown email,
    /// returns `InvalidCredentials` without saying which half was wrong.
    pub fn verify(&self, email: &str, password: &str) -> AuthResult<User> {
        let digest = password_digest(password);
        match self.accounts.get(email) {
            Some(account) if account.password_digest == digest => Ok(account.user.clone()),
            _ => {
                debug!(email = %email, "credential check failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Look up a user by email.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.accounts.get(email).map(|a| &a.user)
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_logins() {
        let directory = CredentialDirectory::with_demo_users();
        assert_eq!(directory.len(), 3);

        let admin = directory.verify("admin@example.com", "admin123").unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.name, "Admin User");

        let manager = directory.verify("manager@example.com", "manager123").unwrap();
        assert_eq!(manager.role, UserRole::Manager);

        let member = directory.verify("member@example.com", "member123").unwrap();
        assert_eq!(member.role, UserRole::Member);
    }

    #[test]
    fn test_mismatched_pairs_rejected() {
        let directory = CredentialDirectory::with_demo_users();

        for (email, password) in [
            ("admin@example.com", "manager123"),
            ("manager@example.com", "admin123"),
            ("nobody@example.com", "admin123"),
            ("ADMIN@example.com", "admin123"),
            ("", ""),
        ] {
            assert!(matches!(
                directory.verify(email, password),
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut directory = CredentialDirectory::with_demo_users();
        let dupe = User::new("9", "Someone", "admin@example.com", UserRole::Member);
        assert!(matches!(
            directory.register(dupe, "x"),
            Err(AuthError::DuplicateAccount(_))
        ));

        let sarah = User::new("user4", "Sarah Wilson", "sarah@example.com", UserRole::Member);
        directory.register(sarah, "sarah123").unwrap();
        assert!(directory.verify("sarah@example.com", "sarah123").is_ok());
    }

    #[test]
    fn test_digest_is_not_plaintext() {
        let digest = password_digest("admin123");
        assert_ne!(digest, "admin123");
        assert_eq!(digest, password_digest("admin123"));
        assert_ne!(digest, password_digest("admin124"));
    }
}
