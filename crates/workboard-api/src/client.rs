//! Backend REST client.
//!
//! HTTP client for the Workboard backend. Every request carries the bearer
//! token once one is set; reads are retried with backoff, writes are sent
//! once.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use workboard_org::{Project, ProjectDraft, ProjectId, ProjectUpdate, TeamMembership, UserId};
use workboard_store::{
    Comment, Document, DocumentUpload, Notification, Task, TaskDraft, TaskUpdate, TimeEntry,
    TimeEntryDraft,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::retry::with_retry_if;
use crate::types::{
    ApiResponse, CommentBody, LoginRequest, LoginResponse, ProjectScoped, UploadResponse,
    UploadedFile,
};

/// Workboard backend client.
///
/// # Examples
///
/// ```rust,no_run
/// use workboard_api::{ApiClient, ApiConfig};
///
/// async fn example() -> workboard_api::ApiResult<()> {
///     let client = ApiClient::new(ApiConfig::from_env())?;
///     let login = client.login("admin@example.com", "admin123").await?;
///     let client = client.with_token(login.token);
///
///     for project in client.list_projects().await? {
///         println!("{} ({}%)", project.name, project.progress);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint configuration.
    config: ApiConfig,

    /// Bearer token from `POST /login`.
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client without a token.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Create a client from `WORKBOARD_API_*` environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ApiConfig::from_env())
    }

    /// Attach a bearer token to every following request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ============ AUTHENTICATION ============

    /// Exchange credentials for a user and token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send(self.request(Method::POST, "/login").json(&body), "/login")
            .await?;
        if !response.success {
            return Err(ApiError::Unauthorized);
        }
        info!(user = %response.user.email, "logged in");
        Ok(response)
    }

    // ============ PROJECTS ============

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get("/projects").await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project> {
        self.write(Method::POST, "/projects", draft).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_project(
        &self,
        id: &ProjectId,
        update: &ProjectUpdate,
    ) -> ApiResult<Project> {
        self.write(Method::PUT, &format!("/projects/{}", id), update).await
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &ProjectId) -> ApiResult<()> {
        self.delete(&format!("/projects/{}", id)).await
    }

    // ============ TASKS ============

    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get("/tasks").await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_task(&self, project_id: &ProjectId, draft: &TaskDraft) -> ApiResult<Task> {
        let body = ProjectScoped::new(project_id.clone(), draft);
        self.write(Method::POST, "/tasks", &body).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> ApiResult<Task> {
        self.write(Method::PUT, &format!("/tasks/{}", id), update).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("/tasks/{}", id)).await
    }

    // ============ TEAM ============

    pub async fn list_team_members(&self) -> ApiResult<Vec<TeamMembership>> {
        self.get("/team").await
    }

    #[instrument(skip(self, membership), fields(user_id = %membership.user_id))]
    pub async fn add_team_member(
        &self,
        project_id: &ProjectId,
        membership: &TeamMembership,
    ) -> ApiResult<TeamMembership> {
        let body = ProjectScoped::new(project_id.clone(), membership);
        self.write(Method::POST, "/team", &body).await
    }

    #[instrument(skip(self, membership), fields(user_id = %membership.user_id))]
    pub async fn update_team_member(
        &self,
        project_id: &ProjectId,
        membership: &TeamMembership,
    ) -> ApiResult<TeamMembership> {
        let body = ProjectScoped::new(project_id.clone(), membership);
        self.write(Method::PUT, &format!("/team/{}", membership.user_id), &body).await
    }

    #[instrument(skip(self))]
    pub async fn remove_team_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> ApiResult<()> {
        let path = format!("/team/{}", user_id);
        let request = self
            .request(Method::DELETE, &path)
            .query(&[("projectId", project_id.as_str())]);
        let response: ApiResponse<serde_json::Value> = self.send(request, &path).await?;
        response.into_ack()
    }

    // ============ TIME TRACKING ============

    pub async fn list_time_entries(&self) -> ApiResult<Vec<TimeEntry>> {
        self.get("/time-entries").await
    }

    #[instrument(skip(self, draft), fields(minutes = draft.minutes))]
    pub async fn create_time_entry(
        &self,
        project_id: &ProjectId,
        draft: &TimeEntryDraft,
    ) -> ApiResult<TimeEntry> {
        let body = ProjectScoped::new(project_id.clone(), draft);
        self.write(Method::POST, "/time-entries", &body).await
    }

    // ============ DOCUMENTS ============

    pub async fn list_documents(&self) -> ApiResult<Vec<Document>> {
        self.get("/documents").await
    }

    /// Upload a file with its metadata as a multipart form.
    #[instrument(
        skip(self, metadata, contents),
        fields(name = %metadata.name, bytes = contents.len())
    )]
    pub async fn upload_document(
        &self,
        project_id: &ProjectId,
        metadata: &DocumentUpload,
        contents: Vec<u8>,
    ) -> ApiResult<UploadedFile> {
        let metadata_json = serde_json::to_string(&ProjectScoped::new(project_id.clone(), metadata))
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(contents).file_name(metadata.name.clone()),
            )
            .text("metadata", metadata_json);

        let path = "/documents/upload";
        let response: UploadResponse = self
            .send(self.request(Method::POST, path).multipart(form), path)
            .await?;
        if !response.success {
            return Err(ApiError::InvalidResponse("upload was not accepted".to_string()));
        }
        Ok(response.file)
    }

    #[instrument(skip(self))]
    pub async fn delete_document(&self, id: Uuid) -> ApiResult<()> {
        self.delete(&format!("/documents/{}", id)).await
    }

    // ============ NOTIFICATIONS ============

    pub async fn list_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.get("/notifications").await
    }

    #[instrument(skip(self))]
    pub async fn mark_notification_read(&self, id: Uuid) -> ApiResult<()> {
        let path = format!("/notifications/{}/read", id);
        let response: ApiResponse<serde_json::Value> =
            self.send(self.request(Method::POST, &path), &path).await?;
        response.into_ack()
    }

    // ============ COMMENTS ============

    pub async fn list_comments(&self, task_id: Uuid) -> ApiResult<Vec<Comment>> {
        self.get(&format!("/tasks/{}/comments", task_id)).await
    }

    #[instrument(skip(self, comment))]
    pub async fn create_comment(&self, task_id: Uuid, comment: &str) -> ApiResult<CommentBody> {
        let body = CommentBody {
            comment: comment.to_string(),
        };
        self.write(Method::POST, &format!("/tasks/{}/comments", task_id), &body)
            .await
    }

    // ============ PLUMBING ============

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.config.url(path))
            .header("Accept", "application/json");

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    /// GET with retries.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        with_retry_if(
            &self.config.retry(),
            move || async move { self.send(self.request(Method::GET, path), path).await },
            ApiError::is_retryable,
        )
        .await
    }

    /// Send a JSON body and unwrap the `{ success, data }` envelope.
    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, %method, "write");
        let response: ApiResponse<T> = self
            .send(self.request(method, path).json(body), path)
            .await?;
        response.into_data()
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let response: ApiResponse<serde_json::Value> =
            self.send(self.request(Method::DELETE, path), path).await?;
        response.into_ack()
    }

    /// Send a request and parse the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            error!(path, "backend rejected the token");
            return Err(ApiError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(path, status = status.as_u16(), %message, "backend error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
