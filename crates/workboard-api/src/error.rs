//! API client errors.

use thiserror::Error;

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when unreadable.
        message: String,
    },

    /// The bearer token was missing or rejected.
    #[error("Authentication failed")]
    Unauthorized,

    /// The addressed record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with something we could not read.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be built.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Whether trying again might succeed: timeouts, connection failures,
    /// rate limiting and server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status behind the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
