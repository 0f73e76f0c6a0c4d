//! # Workboard API
//!
//! Typed client for the Workboard backend's REST surface. No server lives
//! here; the app runs on the in-memory store until a backend is wired in,
//! and this crate is the contract that backend is expected to honour.
//!
//! ## Overview
//!
//! The workboard-api crate handles:
//! - **Client**: one method per endpoint, typed with the domain records
//! - **Configuration**: base URL, timeout and retry budget from the environment
//! - **Retry**: exponential backoff for idempotent reads
//! - **Errors**: HTTP failures mapped to `ApiError`
//!
//! ## Endpoints
//!
//! Paths are relative to `WORKBOARD_API_URL` (default `http://localhost:8000/api`):
//! - `POST /login`
//! - `GET|POST /projects`, `PUT|DELETE /projects/{id}`
//! - `GET|POST /tasks`, `PUT|DELETE /tasks/{id}`
//! - `GET|POST /team`, `PUT|DELETE /team/{id}`
//! - `GET|POST /time-entries`
//! - `GET /documents`, `POST /documents/upload`, `DELETE /documents/{id}`
//! - `GET /notifications`, `POST /notifications/{id}/read`
//! - `GET|POST /tasks/{id}/comments`
//!
//! Every request sends `Accept: application/json` and, once a token is set,
//! `Authorization: Bearer {token}`. Writes answer with a
//! `{ "success": true, "data": ... }` envelope; lists answer with a bare
//! JSON array.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workboard_api::{ApiClient, ApiConfig};
//! use workboard_store::TaskDraft;
//! use workboard_org::ProjectId;
//!
//! async fn example() -> workboard_api::ApiResult<()> {
//!     let client = ApiClient::new(ApiConfig::new("http://localhost:8000/api"))?
//!         .with_token("mock-token-12345");
//!
//!     let task = client
//!         .create_task(&ProjectId::from("1"), &TaskDraft::new("Design homepage mockup"))
//!         .await?;
//!     client.create_comment(task.id, "Wireframes are ready").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

// Re-export main types
pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use error::{ApiError, ApiResult};
pub use retry::{with_retry_if, RetryConfig};
pub use types::{
    ApiResponse, ApiUser, CommentBody, LoginRequest, LoginResponse, ProjectScoped, RecordId,
    UploadResponse, UploadedFile,
};
