//! Task endpoints.
//!
//! List and create answer the row shape, where `project` and `assignee`
//! are display strings rather than ids.
//!
//! Action endpoints (`status`, `assign`, `add-dependency`) answer
//! `{message, task}`; both that and a bare record are accepted.

use taskflow_types::{
    AssignRequest, CreateTaskData, DependencyRequest, Id, Page, StatusRequest, Task, TaskEnvelope,
    TaskStatus,
};

use super::fetch_page;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

/// Lists tasks, optionally filtered by project.
pub async fn list(client: &ApiClient, project: Option<Id>) -> ApiResult<Page<Task>> {
    let mut request = RequestSpec::get("/tasks/");
    if let Some(project) = project {
        request = request.with_query("project", project.to_string());
    }
    fetch_page(client, request).await
}

pub async fn get(client: &ApiClient, id: Id) -> ApiResult<Task> {
    client.send_json(RequestSpec::get(format!("/tasks/{id}/"))).await
}

pub async fn create(client: &ApiClient, data: &CreateTaskData) -> ApiResult<Task> {
    client
        .send_json(RequestSpec::post("/tasks/").with_json(data)?)
        .await
}

pub async fn update(client: &ApiClient, id: Id, data: &CreateTaskData) -> ApiResult<Task> {
    client
        .send_json(RequestSpec::put(format!("/tasks/{id}/")).with_json(data)?)
        .await
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .send_empty(RequestSpec::delete(format!("/tasks/{id}/")))
        .await
}

pub async fn update_status(client: &ApiClient, id: Id, status: TaskStatus) -> ApiResult<Task> {
    let request =
        RequestSpec::post(format!("/tasks/{id}/status/")).with_json(&StatusRequest { status })?;
    action(client, request).await
}

pub async fn assign(client: &ApiClient, id: Id, user_id: Id) -> ApiResult<Task> {
    let request =
        RequestSpec::post(format!("/tasks/{id}/assign/")).with_json(&AssignRequest { user_id })?;
    action(client, request).await
}

pub async fn add_dependency(client: &ApiClient, id: Id, dependency_id: Id) -> ApiResult<Task> {
    let request = RequestSpec::post(format!("/tasks/{id}/add-dependency/"))
        .with_json(&DependencyRequest { dependency_id })?;
    action(client, request).await
}

async fn action(client: &ApiClient, request: RequestSpec) -> ApiResult<Task> {
    let envelope: TaskEnvelope = client.send_json(request).await?;
    Ok(envelope.into_task())
}
