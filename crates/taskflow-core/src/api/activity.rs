//! Activity history of the current user, newest first.

use taskflow_types::{ActivityLog, Page};

use super::fetch_page;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

pub async fn list(client: &ApiClient) -> ApiResult<Page<ActivityLog>> {
    fetch_page(client, RequestSpec::get("/activities/")).await
}
