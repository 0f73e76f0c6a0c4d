//! Backend endpoint configuration.
//!
//! Where the REST backend lives and how patient the client is with it.
//! Loaded from environment variables with defaults for a local backend.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::retry::RetryConfig;

/// Default base URL of a locally running backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum attempts for idempotent reads, first try included.
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ApiConfig {
    /// Point at `base_url`, other settings default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WORKBOARD_API_URL`: backend base URL (default: http://localhost:8000/api)
    /// - `WORKBOARD_API_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    /// - `WORKBOARD_API_MAX_RETRIES`: attempts for reads (default: 3)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: std::env::var("WORKBOARD_API_URL").unwrap_or(default.base_url),
            timeout_secs: std::env::var("WORKBOARD_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            max_retries: std::env::var("WORKBOARD_API_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_retries),
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for reads.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retries.max(1),
            ..RetryConfig::default()
        }
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}
