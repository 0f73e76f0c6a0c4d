//! # Workboard Authentication
//!
//! Login against the mock credential directory, HS256 session tokens and
//! the persisted `currentUser` session.
//!
//! ## Overview
//!
//! The workboard-auth crate handles:
//! - **Credentials**: demo accounts with SHA-256 password digests
//! - **Tokens**: session token issue and validation
//! - **Sessions**: pluggable session storage (memory or JSON file)
//! - **Lifecycle**: login, restore on start, logout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workboard_auth::{AuthConfig, Authenticator};
//!
//! # async fn run() -> workboard_auth::AuthResult<()> {
//! let auth = Authenticator::from_config(&AuthConfig::from_env())?;
//!
//! // Pick up a session left by a previous run
//! if auth.restore().await?.is_none() {
//!     auth.login("admin@example.com", "admin123").await?;
//! }
//!
//! let user = auth.require_user().await?;
//! println!("signed in as {}", user.name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See [`AuthConfig::from_env`] for the environment variables read.

pub mod config;
pub mod credentials;
pub mod error;
pub mod service;
pub mod session;
pub mod token;

// Re-export main types for convenience
pub use config::AuthConfig;
pub use credentials::{password_digest, CredentialDirectory};
pub use error::{AuthError, AuthResult};
pub use service::{Authenticator, Session};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession, SESSION_KEY};
pub use token::{SessionClaims, TokenService};
