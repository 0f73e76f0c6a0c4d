//! Wire types for the backend REST API
//!
//! Request and response bodies that are specific to the HTTP surface.
//! Records themselves (projects, tasks, entries, documents, notifications)
//! travel as the domain types from `workboard-org` and `workboard-store`.

use serde::{Deserialize, Serialize};
use workboard_org::{ProjectId, User};
use workboard_rbac::UserRole;

use crate::error::{ApiError, ApiResult};

/// Record identifier as the backend sends it: numeric or string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric ID
    Number(i64),
    /// String ID
    String(String),
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::String(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::String(s)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::String(s) => f.write_str(s),
        }
    }
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User as the backend reports it after login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiUser {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl ApiUser {
    /// Convert to a domain user. Unknown roles are rejected rather than
    /// mapped to some default.
    pub fn into_user(self) -> ApiResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| ApiError::InvalidResponse(format!("unknown role '{}'", self.role)))?;
        Ok(User::new(self.id.to_string(), self.name, self.email, role))
    }
}

/// `POST /login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: ApiUser,
    pub token: String,
}

/// Envelope around write responses: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The payload of a successful response.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::InvalidResponse(
                self.message.unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("response carried no data".to_string()))
    }

    /// Check the success flag of a response without a payload.
    pub fn into_ack(self) -> ApiResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::InvalidResponse(
                self.message.unwrap_or_else(|| "request was not successful".to_string()),
            ))
        }
    }
}

/// A record body tagged with the project it belongs to.
///
/// The backend routes tasks, time entries, team changes and document
/// metadata by a `projectId` field next to the record's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScoped<T> {
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub body: T,
}

impl<T> ProjectScoped<T> {
    pub fn new(project_id: ProjectId, body: T) -> Self {
        Self { project_id, body }
    }
}

/// `POST /tasks/{id}/comments` body, echoed back on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentBody {
    pub comment: String,
}

/// Uploaded file as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
}

/// `POST /documents/upload` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file: UploadedFile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_user_id() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "user": { "id": 1, "name": "User", "email": "admin@example.com", "role": "admin" },
            "token": "mock-token-12345"
        }))
        .unwrap();

        assert_eq!(response.user.id, RecordId::Number(1));
        let user = response.user.into_user().unwrap();
        assert_eq!(user.id.as_str(), "1");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let user = ApiUser {
            id: "7".into(),
            name: "Eve".to_string(),
            email: "eve@example.com".to_string(),
            role: "superuser".to_string(),
        };
        assert!(matches!(user.into_user(), Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_project_scoped_flattens() {
        let body = ProjectScoped::new(ProjectId::from("1"), CommentBody { comment: "hi".into() });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "projectId": "1", "comment": "hi" })
        );
    }

    #[test]
    fn test_envelope() {
        let ok: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "success": true, "data": { "name": "x" } })).unwrap();
        assert_eq!(ok.into_data().unwrap()["name"], "x");

        let ack: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(ack.into_ack().is_ok());

        let failed: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "success": false, "message": "Validation failed" })).unwrap();
        assert!(failed.into_data().unwrap_err().to_string().contains("Validation failed"));
    }
}
