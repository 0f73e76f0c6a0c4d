//! Client tests against a mocked backend.
//!
//! Each test starts a wiremock server standing in for the REST backend and
//! checks the requests the client sends and how it reads the answers.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workboard_api::{ApiClient, ApiConfig, ApiError};
use workboard_org::{ProjectDraft, ProjectId, ProjectRole, TeamMembership, UserId};
use workboard_rbac::UserRole;
use workboard_store::{DocumentUpload, TaskDraft, TaskPriority, TaskStatus};

const TOKEN: &str = "mock-token-12345";

/// Mock backend plus a client pointed at it.
struct TestFixture {
    server: MockServer,
    config: ApiConfig,
}

impl TestFixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let config = ApiConfig::new(format!("{}/api", server.uri())).with_timeout_secs(5);
        Self { server, config }
    }

    fn anonymous(&self) -> ApiClient {
        ApiClient::new(self.config.clone()).unwrap()
    }

    fn client(&self) -> ApiClient {
        self.anonymous().with_token(TOKEN)
    }
}

fn project_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "Redesign company website with modern UI/UX",
        "status": "active",
        "progress": 65,
        "startDate": "2025-01-01",
        "endDate": "2025-03-31",
        "color": "bg-blue-500",
        "createdBy": "user1",
        "createdAt": "2025-01-01",
        "team": [
            { "userId": "user1", "name": "John Doe", "email": "user@example.com", "role": "manager" }
        ]
    })
}

fn task_json(id: Uuid, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "projectId": "1",
        "title": title,
        "assignee": "user1",
        "priority": "high",
        "status": "in-progress",
        "deadline": "2026-01-08",
        "createdBy": "user1",
        "createdAt": "2026-01-01T09:00:00Z"
    })
}

#[tokio::test]
async fn test_login_then_authenticated_reads() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": 1, "name": "User", "email": "admin@example.com", "role": "admin" },
            "token": TOKEN
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(header("Authorization", "Bearer mock-token-12345"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json("1", "Website Redesign"),
            project_json("2", "Mobile App Development"),
        ])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let client = fixture.anonymous();
    let login = client.login("admin@example.com", "admin123").await.unwrap();
    let user = login.user.clone().into_user().unwrap();
    assert_eq!(user.role, UserRole::Admin);

    let requests = fixture.server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({ "email": "admin@example.com", "password": "admin123" }));

    let client = client.with_token(login.token);
    let projects = client.list_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Website Redesign");
    assert_eq!(projects[0].team[0].role, ProjectRole::Manager);
}

#[tokio::test]
async fn test_create_task_sends_project_scoped_body() {
    let fixture = TestFixture::new().await;
    let id = Uuid::now_v7();

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(header("Authorization", "Bearer mock-token-12345"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": task_json(id, "Design homepage mockup")
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let draft = TaskDraft::new("Design homepage mockup")
        .with_assignee("user1")
        .with_priority(TaskPriority::High);
    let task = fixture
        .client()
        .create_task(&ProjectId::from("1"), &draft)
        .await
        .unwrap();
    assert_eq!(task.id, id);
    assert_eq!(task.status, TaskStatus::InProgress);

    let requests = fixture.server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["projectId"], "1");
    assert_eq!(body["title"], "Design homepage mockup");
    assert_eq!(body["priority"], "high");
}

#[tokio::test]
async fn test_reads_retry_on_server_errors() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let notifications = fixture.client().list_notifications().await.unwrap();
    assert!(notifications.is_empty());
}

#[tokio::test]
async fn test_writes_are_not_retried() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let draft = ProjectDraft::new(
        "API Integration",
        chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
    );
    let err = fixture.client().create_project(&draft).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_token_and_missing_records() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/documents/00000000-0000-0000-0000-000000000000"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let client = fixture.client();
    assert!(matches!(client.list_tasks().await, Err(ApiError::Unauthorized)));
    assert!(matches!(
        client.delete_document(Uuid::nil()).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_team_endpoints() {
    let fixture = TestFixture::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/team/user3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "userId": "user3", "name": "Mike Johnson", "email": "mike@example.com", "role": "admin" }
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/team/user3"))
        .and(query_param("projectId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let client = fixture.client();
    let membership = TeamMembership::new("user3", "Mike Johnson", "mike@example.com", ProjectRole::Admin);
    let updated = client
        .update_team_member(&ProjectId::from("1"), &membership)
        .await
        .unwrap();
    assert_eq!(updated, membership);

    client
        .remove_team_member(&ProjectId::from("1"), &UserId::from("user3"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_and_comments() {
    let fixture = TestFixture::new().await;
    let task_id = Uuid::now_v7();

    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .and(header("Authorization", "Bearer mock-token-12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "file": { "name": "Design System.pdf" }
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/tasks/{}/comments", task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "comment": "Wireframes are ready" }
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/tasks/{}/comments", task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let client = fixture.client();
    let file = client
        .upload_document(
            &ProjectId::from("1"),
            &DocumentUpload::new("Design System.pdf", 4).with_version("v2.0"),
            b"%PDF".to_vec(),
        )
        .await
        .unwrap();
    assert_eq!(file.name, "Design System.pdf");

    let upload = &fixture.server.received_requests().await.unwrap()[0];
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"metadata\""));
    assert!(body.contains("\"projectId\":\"1\""));
    assert!(body.contains("%PDF"));

    let echoed = client.create_comment(task_id, "Wireframes are ready").await.unwrap();
    assert_eq!(echoed.comment, "Wireframes are ready");
    assert!(client.list_comments(task_id).await.unwrap().is_empty());
}
