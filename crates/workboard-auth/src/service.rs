//! Login and session lifecycle
//!
//! The [`Authenticator`] ties the credential directory, token service and
//! session store together: login saves a session, restore brings it back
//! on start, logout removes it.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use workboard_org::User;

use crate::config::AuthConfig;
use crate::credentials::CredentialDirectory;
use crate::error::{AuthError, AuthResult};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};
use crate::token::TokenService;

/// An active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user
    pub user: User,

    /// Session token
    pub token: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

/// Signs users in and out.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use workboard_auth::{Authenticator, CredentialDirectory, MemorySessionStore, TokenService};
///
/// # tokio_test_block(async {
/// let auth = Authenticator::new(
///     CredentialDirectory::with_demo_users(),
///     TokenService::with_secret("an-example-secret-that-is-long-enough").unwrap(),
///     Arc::new(MemorySessionStore::new()),
/// );
///
/// let session = auth.login("member@example.com", "member123").await.unwrap();
/// assert_eq!(session.user.name, "Team Member");
/// assert!(auth.current_user().await.is_some());
///
/// auth.logout().await.unwrap();
/// assert!(auth.current_user().await.is_none());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Authenticator {
    directory: CredentialDirectory,
    tokens: TokenService,
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("accounts", &self.directory.len())
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl Authenticator {
    /// Create an authenticator from its parts.
    pub fn new(
        directory: CredentialDirectory,
        tokens: TokenService,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            directory,
            tokens,
            store,
            current: RwLock::new(None),
        }
    }

    /// Create an authenticator with the demo accounts.
    ///
    /// Sessions go to `config.session_file` when set, otherwise to memory.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let tokens = TokenService::new(config)?;
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        Ok(Self::new(CredentialDirectory::with_demo_users(), tokens, store))
    }

    /// The credential directory.
    pub fn directory(&self) -> &CredentialDirectory {
        &self.directory
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for any non-matching pair; storage errors if the
    /// session cannot be saved.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let user = self.directory.verify(email, password)?;
        let token = self.tokens.issue(&user)?;
        let session = Session {
            user: user.clone(),
            token: token.clone(),
            expires_at: Utc::now() + self.tokens.ttl(),
        };

        self.store.save(&StoredSession::new(user, token)).await?;
        *self.current.write().await = Some(session.clone());

        info!(user_id = %session.user.id, role = %session.user.role, "user signed in");
        Ok(session)
    }

    /// Restore the persisted session on start.
    ///
    /// Expired or invalid sessions are discarded and cleared from storage.
    pub async fn restore(&self) -> AuthResult<Option<Session>> {
        let Some(stored) = self.store.load().await? else {
            debug!("no stored session");
            return Ok(None);
        };

        let claims = match self.tokens.validate(&stored.token) {
            Ok(claims) if claims.sub == stored.user.id.as_str() => claims,
            Ok(_) => {
                warn!(user_id = %stored.user.id, "stored session token belongs to another user");
                self.store.clear().await?;
                return Ok(None);
            }
            Err(e @ (AuthError::TokenExpired | AuthError::InvalidToken(_))) => {
                debug!(error = %e, "discarding stored session");
                self.store.clear().await?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let session = Session {
            user: claims.user(),
            token: stored.token,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or_else(Utc::now),
        };
        *self.current.write().await = Some(session.clone());

        info!(user_id = %session.user.id, "session restored");
        Ok(Some(session))
    }

    /// Sign out and remove the persisted session.
    pub async fn logout(&self) -> AuthResult<()> {
        let previous = self.current.write().await.take();
        self.store.clear().await?;
        if let Some(session) = previous {
            info!(user_id = %session.user.id, "user signed out");
        }
        Ok(())
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    /// The signed-in user, or `NotAuthenticated`.
    pub async fn require_user(&self) -> AuthResult<User> {
        self.current_user().await.ok_or(AuthError::NotAuthenticated)
    }

    /// The active session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SessionClaims;
    use chrono::Duration;
    use workboard_rbac::UserRole;

    const SECRET: &str = "test-secret-key-for-jwt-signing-minimum-32-chars";

    fn authenticator(store: Arc<dyn SessionStore>) -> Authenticator {
        Authenticator::new(
            CredentialDirectory::with_demo_users(),
            TokenService::with_secret(SECRET).unwrap(),
            store,
        )
    }

    #[tokio::test]
    async fn test_login_success() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());

        let session = auth.login("admin@example.com", "admin123").await.unwrap();
        assert_eq!(session.user.role, UserRole::Admin);
        assert_eq!(auth.require_user().await.unwrap().email, "admin@example.com");

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.user, session.user);
        assert_eq!(stored.token, session.token);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_state_untouched() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());

        let err = auth.login("admin@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(auth.current_user().await.is_none());
        assert!(store.load().await.unwrap().is_none());
        assert!(matches!(
            auth.require_user().await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_restore_across_instances_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuthConfig::default()
            .with_secret(SECRET)
            .with_session_file(dir.path().join("session.json"));

        let first = Authenticator::from_config(&config).unwrap();
        first.login("manager@example.com", "manager123").await.unwrap();

        let second = Authenticator::from_config(&config).unwrap();
        assert!(second.current_user().await.is_none());
        let restored = second.restore().await.unwrap().unwrap();
        assert_eq!(restored.user.name, "Manager User");
        assert_eq!(second.current_user().await.unwrap().role, UserRole::Manager);
    }

    #[tokio::test]
    async fn test_restore_discards_expired_session() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());
        let tokens = TokenService::with_secret(SECRET).unwrap();

        let user = User::new("3", "Team Member", "member@example.com", UserRole::Member);
        let mut claims = SessionClaims::new(&user, "workboard", Duration::hours(1));
        claims.exp = (Utc::now() - Duration::hours(3)).timestamp();
        let token = tokens.encode_claims(&claims).unwrap();
        store.save(&StoredSession::new(user, token)).await.unwrap();

        assert!(auth.restore().await.unwrap().is_none());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_discards_tampered_session() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());

        let user = User::new("1", "Admin User", "admin@example.com", UserRole::Admin);
        store
            .save(&StoredSession::new(user, "not-a-token"))
            .await
            .unwrap();

        assert!(auth.restore().await.unwrap().is_none());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_rejects_swapped_user() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());

        let member = auth.login("member@example.com", "member123").await.unwrap();
        let admin = User::new("1", "Admin User", "admin@example.com", UserRole::Admin);
        store
            .save(&StoredSession::new(admin, member.token))
            .await
            .unwrap();

        assert!(auth.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = authenticator(store.clone());

        auth.login("member@example.com", "member123").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current_session().await.is_none());
        assert!(store.load().await.unwrap().is_none());

        // Logging out twice is fine
        auth.logout().await.unwrap();
    }
}
