//! Session storage
//!
//! Where the signed-in user survives between runs. The persisted value
//! lives under the key `currentUser`: written on login, read on start,
//! removed on logout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use workboard_org::User;

use crate::error::AuthResult;

/// Key the session is stored under.
pub const SESSION_KEY: &str = "currentUser";

/// A persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// The signed-in user
    pub user: User,

    /// Session token
    pub token: String,

    /// When the session was saved
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    /// A session saved now.
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Storage backend for the current session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the session, replacing any previous one.
    async fn save(&self, session: &StoredSession) -> AuthResult<()>;

    /// Load the persisted session, if any.
    async fn load(&self) -> AuthResult<Option<StoredSession>>;

    /// Remove the persisted session. Clearing an empty store is not an error.
    async fn clear(&self) -> AuthResult<()>;
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<StoredSession>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &StoredSession) -> AuthResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<StoredSession>> {
        Ok(self.session.read().await.clone())
    }

    async fn clear(&self) -> AuthResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "currentUser", default, skip_serializing_if = "Option::is_none")]
    current_user: Option<StoredSession>,
}

/// Session store backed by a JSON file.
///
/// The file holds one object with the `currentUser` key.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the session at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &StoredSession) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = SessionFile {
            current_user: Some(session.clone()),
        };
        let json = serde_json::to_vec_pretty(&file)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), user_id = %session.user.id, "session saved");
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<StoredSession>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: SessionFile = serde_json::from_slice(&bytes)?;
        Ok(file.current_user)
    }

    async fn clear(&self) -> AuthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
