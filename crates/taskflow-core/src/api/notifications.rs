//! Notifications addressed to the current user.
//!
//! Read markers are set with `PATCH`; both mark endpoints and delete answer
//! `{message}`.

use taskflow_types::{Id, MessageResponse, Notification, Page};

use super::fetch_page;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

pub async fn list(client: &ApiClient) -> ApiResult<Page<Notification>> {
    fetch_page(client, RequestSpec::get("/notifications/")).await
}

pub async fn unread(client: &ApiClient) -> ApiResult<Page<Notification>> {
    fetch_page(client, RequestSpec::get("/notifications/unread/")).await
}

pub async fn mark_read(client: &ApiClient, id: Id) -> ApiResult<MessageResponse> {
    client
        .send_json(RequestSpec::patch(format!("/notifications/{id}/read/")))
        .await
}

pub async fn mark_all_read(client: &ApiClient) -> ApiResult<MessageResponse> {
    client
        .send_json(RequestSpec::patch("/notifications/mark-all-read/"))
        .await
}

/// The server answers 204 with a message body; the body is ignored.
pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .send_empty(RequestSpec::delete(format!("/notifications/{id}/")))
        .await
}
