//! Integration tests for `taskflow projects` and `taskflow tasks`.

mod fixtures;

use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::{read_tokens, taskflow, write_tokens};

#[tokio::test(flavor = "multi_thread")]
async fn test_projects_list_renders_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .and(header("authorization", "Bearer acc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 7, "name": "Website relaunch", "description": null,
                "owner": "a@b.com", "members": [1, 2], "progress_percentage": 25.0
            }]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Website relaunch"))
        .stdout(predicate::str::contains("25%"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_projects_list_empty_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects yet"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_project_create_blank_name_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "create", "--name", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name is required"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_project_create_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/"))
        .and(body_json(json!({"name": "Launch", "description": "Q3"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12, "name": "Launch", "description": "Q3", "owner": "a@b.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "create", "--name", "Launch", "--description", "Q3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project #12 Launch"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_project_create_shows_server_field_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": ["project with this name already exists."]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "create", "--name", "Launch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_list_for_project_without_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .and(query_param("project", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["tasks", "list", "--project", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks in project 5."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_list_renders_row_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 4, "title": "Ship release", "status": "in_progress",
                "priority": "urgent", "deadline": null, "project": "Website relaunch",
                "assignee": "dev@b.com", "dependencies_count": 1,
                "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship release"))
        .stdout(predicate::str::contains("Website relaunch"))
        .stdout(predicate::str::contains("dev@b.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_access_token_is_refreshed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "ref"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1, "name": "Site"}]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "stale", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site"));

    let tokens = read_tokens(dir.path());
    assert_eq!(tokens["access_token"], "fresh");
    assert_eq!(tokens["refresh_token"], "ref");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "stale", "revoked");
    taskflow(dir.path(), &server.uri())
        .args(["projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired"))
        .stderr(predicate::str::contains("taskflow login"));

    let tokens = read_tokens(dir.path());
    assert!(tokens.get("access_token").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_task_toggle_completes_open_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "title": "Docs", "status": "in_progress", "project": 5
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks/3/status/"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Task status updated to completed",
            "task": {"id": 3, "title": "Docs", "status": "completed", "project": 5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["tasks", "toggle", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task #3 is now Completed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_task_create_requires_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_tokens(dir.path(), "acc", "ref");
    taskflow(dir.path(), &server.uri())
        .args(["tasks", "create", "--title", "Docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project is required"));
}
