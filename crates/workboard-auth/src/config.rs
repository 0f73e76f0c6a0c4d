//! Authentication configuration.
//!
//! Loaded from environment variables with defaults suitable for local
//! development.

use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Secret used when `WORKBOARD_JWT_SECRET` is unset. Development only.
pub const DEV_JWT_SECRET: &str = "workboard-dev-secret-change-me-0123456789";

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens
    #[serde(skip_serializing, default)]
    pub jwt_secret: String,

    /// Token issuer
    pub issuer: String,

    /// Session lifetime in hours
    pub session_ttl_hours: i64,

    /// Where the file session store keeps `currentUser`, if anywhere
    pub session_file: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            issuer: "workboard".to_string(),
            session_ttl_hours: 24,
            session_file: None,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WORKBOARD_JWT_SECRET`: token signing secret (default: development secret)
    /// - `WORKBOARD_ISSUER`: token issuer (default: workboard)
    /// - `WORKBOARD_SESSION_TTL_HOURS`: session lifetime (default: 24)
    /// - `WORKBOARD_SESSION_FILE`: path of the session file (default: none, in-memory)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            jwt_secret: std::env::var("WORKBOARD_JWT_SECRET").unwrap_or(default.jwt_secret),
            issuer: std::env::var("WORKBOARD_ISSUER").unwrap_or(default.issuer),
            session_ttl_hours: std::env::var("WORKBOARD_SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.session_ttl_hours),
            session_file: std::env::var("WORKBOARD_SESSION_FILE").ok().map(PathBuf::from),
        }
    }

    /// Set the signing secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Set the session lifetime.
    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    /// Set the session file path.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Session lifetime as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> AuthResult<()> {
        if self.jwt_secret.len() < 32 {
            return Err(AuthError::ConfigError(
                "WORKBOARD_JWT_SECRET must be at least 32 bytes".to_string(),
            ));
        }
        if self.session_ttl_hours <= 0 {
            return Err(AuthError::ConfigError(
                "WORKBOARD_SESSION_TTL_HOURS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
