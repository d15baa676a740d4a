//! Resource operations: stateless request/response pairs over [`ApiClient`].
//!
//! Paths are relative to the configured base URL and keep the trailing slash
//! the backend router expects.
//!
//! [`ApiClient`]: crate::client::ApiClient

pub mod activity;
pub mod auth;
pub mod notifications;
pub mod projects;
pub mod subscriptions;
pub mod tasks;

use serde::de::DeserializeOwned;
use serde_json::Value;
use taskflow_types::Page;

use crate::client::{ApiClient, RequestSpec};
use crate::error::{ApiError, ApiResult};

/// Fetches a list endpoint that answers either a bare array or a paginated
/// envelope.
async fn fetch_page<T: DeserializeOwned>(
    client: &ApiClient,
    request: RequestSpec,
) -> ApiResult<Page<T>> {
    let body: Value = client.send_json(request).await?;
    decode_page(body)
}

/// Branches on the body shape, then decodes items one at a time so a bad
/// record is reported with its index and the underlying serde error.
fn decode_page<T: DeserializeOwned>(body: Value) -> ApiResult<Page<T>> {
    match body {
        Value::Array(items) => Ok(Page::from_results(decode_items(items)?)),
        Value::Object(mut envelope) => {
            let items = match envelope.remove("results") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(parse_error(format!(
                        "`results` must be an array, got {}",
                        value_kind(&other)
                    )));
                }
                None => return Err(parse_error("object has no `results` list")),
            };
            envelope.insert("results".to_string(), Value::Array(Vec::new()));
            let mut page: Page<T> = serde_json::from_value(Value::Object(envelope))
                .map_err(|e| parse_error(format!("page envelope: {e}")))?;
            page.results = decode_items(items)?;
            Ok(page)
        }
        other => Err(parse_error(format!(
            "expected a list, got {}",
            value_kind(&other)
        ))),
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> ApiResult<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| parse_error(format!("results[{index}]: {e}")))
        })
        .collect()
}

fn parse_error(detail: impl std::fmt::Display) -> ApiError {
    ApiError::parse(format!("Failed to parse response: {detail}"))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
