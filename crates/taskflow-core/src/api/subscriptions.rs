//! Subscription plan and billing endpoints.

use taskflow_types::{
    ChangePlanRequest, Id, Page, SubscriptionPlan, TrialStarted, UsageLimits, UserSubscription,
};

use super::fetch_page;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

/// Plans come back as a bare array or a paginated envelope.
pub async fn plans(client: &ApiClient) -> ApiResult<Page<SubscriptionPlan>> {
    fetch_page(client, RequestSpec::get("/subscriptions/plans/")).await
}

pub async fn my_subscription(client: &ApiClient) -> ApiResult<UserSubscription> {
    client
        .send_json(RequestSpec::get("/subscriptions/my-subscription/"))
        .await
}

pub async fn change_plan(client: &ApiClient, plan_id: Id) -> ApiResult<UserSubscription> {
    let request = RequestSpec::put("/subscriptions/my-subscription/")
        .with_json(&ChangePlanRequest { plan_id })?;
    client.send_json(request).await
}

pub async fn check_limits(client: &ApiClient) -> ApiResult<UsageLimits> {
    client
        .send_json(RequestSpec::get("/subscriptions/check-limits/"))
        .await
}

pub async fn start_trial(client: &ApiClient) -> ApiResult<TrialStarted> {
    client
        .send_json(RequestSpec::post("/subscriptions/start-trial/"))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support;

    fn plan_json() -> serde_json::Value {
        json!({
            "id": 2,
            "name": "Pro",
            "description": "For teams",
            "price": "19.99",
            "projects_limit": 50,
            "team_members_limit": 20,
            "tasks_limit": 1000,
            "features": ["Priority support"]
        })
    }

    #[tokio::test]
    async fn test_plans_accepts_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/plans/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([plan_json()])))
            .mount(&server)
            .await;

        let page = plans(&test_support::client(&server)).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert!((page.results[0].price - 19.99).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_change_plan_puts_plan_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/my-subscription/"))
            .and(body_json(json!({"plan_id": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "user": 1,
                "plan": plan_json(),
                "status": "active",
                "auto_renew": true,
                "is_active_subscription": true,
                "is_trial_period": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sub = change_plan(&test_support::client(&server), 2).await.unwrap();
        assert_eq!(sub.plan.name, "Pro");
    }

    #[tokio::test]
    async fn test_check_limits_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/check-limits/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "within_limits": false,
                "message": "Project limit reached",
                "limits": {"projects_limit": 3, "team_members_limit": 5, "tasks_limit": 100}
            })))
            .mount(&server)
            .await;

        let limits = check_limits(&test_support::client(&server)).await.unwrap();
        assert!(!limits.within_limits);
        assert_eq!(limits.limits.projects_limit, 3);
    }
}
