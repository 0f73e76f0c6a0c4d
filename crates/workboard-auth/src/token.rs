//! Session token generation and validation
//!
//! Session tokens are HS256 JWTs carrying enough of the user to rebuild it
//! on restore without another directory lookup.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workboard_org::User;
use workboard_rbac::UserRole;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,

    /// User email
    pub email: String,

    /// User display name
    pub name: String,

    /// Global role
    pub role: UserRole,
}

impl SessionClaims {
    /// Claims for `user`, valid for `duration` from now.
    pub fn new(user: &User, issuer: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            iss: issuer.into(),
            exp: (now + duration).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    /// Rebuild the user the token was issued for.
    pub fn user(&self) -> User {
        User::new(self.sub.as_str(), self.name.as_str(), self.email.as_str(), self.role)
    }

    /// Check if the claims have expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Issues and validates session tokens.
pub struct TokenService {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a token service from configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the configuration does not validate.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            issuer: config.issuer.clone(),
            ttl: config.session_ttl(),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        })
    }

    /// Create with a secret and otherwise default settings.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(&AuthConfig::default().with_secret(secret))
    }

    /// Issue a session token for `user`.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let claims = SessionClaims::new(user, self.issuer.as_str(), self.ttl);
        self.encode_claims(&claims)
    }

    /// Encode existing claims.
    pub fn encode_claims(&self, claims: &SessionClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<SessionClaims> = decode(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AuthError::InvalidToken("Malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("Invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AuthError::InvalidToken("Invalid issuer".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> String {
        "test-secret-key-for-jwt-signing-minimum-32-chars".to_string()
    }

    fn manager() -> User {
        User::new("2", "Manager User", "manager@example.com", UserRole::Manager)
    }

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let token = service.issue(&manager()).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "2");
        assert_eq!(claims.role, UserRole::Manager);
        assert_eq!(claims.user(), manager());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_invalid_token() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        assert!(matches!(
            service.validate("invalid-token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::with_secret(test_secret()).unwrap();
        let other = TokenService::with_secret("another-secret-key-that-is-long-enough!!").unwrap();

        let token = issuer.issue(&manager()).unwrap();
        assert!(matches!(other.validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let mut claims = SessionClaims::new(&manager(), "workboard", Duration::hours(1));
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(service.validate(&token), Err(AuthError::TokenExpired)));
        assert!(claims.is_expired());
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let claims = SessionClaims::new(&manager(), "someone-else", Duration::hours(1));
        let token = service.encode_claims(&claims).unwrap();

        assert!(matches!(service.validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_short_secret_is_config_error() {
        assert!(matches!(
            TokenService::with_secret("short"),
            Err(AuthError::ConfigError(_))
        ));
    }
}
