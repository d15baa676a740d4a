//! Project endpoints.

use taskflow_types::{CreateProjectData, Id, MemberRequest, Page, Project};

use super::fetch_page;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

pub async fn list(client: &ApiClient) -> ApiResult<Page<Project>> {
    fetch_page(client, RequestSpec::get("/projects/")).await
}

pub async fn get(client: &ApiClient, id: Id) -> ApiResult<Project> {
    client
        .send_json(RequestSpec::get(format!("/projects/{id}/")))
        .await
}

pub async fn create(client: &ApiClient, data: &CreateProjectData) -> ApiResult<Project> {
    client
        .send_json(RequestSpec::post("/projects/").with_json(data)?)
        .await
}

/// Full replace (`PUT`).
pub async fn update(client: &ApiClient, id: Id, data: &CreateProjectData) -> ApiResult<Project> {
    client
        .send_json(RequestSpec::put(format!("/projects/{id}/")).with_json(data)?)
        .await
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .send_empty(RequestSpec::delete(format!("/projects/{id}/")))
        .await
}

/// Returns the updated project.
pub async fn add_member(client: &ApiClient, id: Id, user_id: Id) -> ApiResult<Project> {
    let request =
        RequestSpec::post(format!("/projects/{id}/add-member/")).with_json(&MemberRequest { user_id })?;
    client.send_json(request).await
}

pub async fn remove_member(client: &ApiClient, id: Id, user_id: Id) -> ApiResult<Project> {
    let request = RequestSpec::post(format!("/projects/{id}/remove-member/"))
        .with_json(&MemberRequest { user_id })?;
    client.send_json(request).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support;

    fn project_json(id: Id, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "owner": "a@b.com",
            "members": [1],
            "progress_percentage": 50.0
        })
    }

    #[tokio::test]
    async fn test_list_reads_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [project_json(3, "Site")]
            })))
            .mount(&server)
            .await;

        let page = list(&test_support::client(&server)).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Site");
        assert!(page.results[0].description.is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects/"))
            .and(body_json(json!({"name": "Site", "description": ""})))
            .respond_with(ResponseTemplate::new(201).set_body_json(project_json(4, "Site")))
            .expect(1)
            .mount(&server)
            .await;

        let data = CreateProjectData {
            name: "Site".to_string(),
            ..Default::default()
        };
        let project = create(&test_support::client(&server), &data).await.unwrap();
        assert_eq!(project.id, 4);
    }

    #[tokio::test]
    async fn test_update_uses_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/projects/4/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json(4, "Renamed")))
            .expect(1)
            .mount(&server)
            .await;

        let data = CreateProjectData {
            name: "Renamed".to_string(),
            ..Default::default()
        };
        let project = update(&test_support::client(&server), 4, &data).await.unwrap();
        assert_eq!(project.name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/4/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        delete(&test_support::client(&server), 4).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_member_posts_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects/4/add-member/"))
            .and(body_json(json!({"user_id": 7})))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json(4, "Site")))
            .expect(1)
            .mount(&server)
            .await;

        add_member(&test_support::client(&server), 4, 7).await.unwrap();
    }
}
