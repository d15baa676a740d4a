//! Credential endpoints. Login, register and refresh are sent without a bearer.

use taskflow_types::{AuthResponse, LoginCredentials, LogoutRequest, RegisterData, TokenPair, User};

use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiResult;

pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> ApiResult<AuthResponse> {
    let request = RequestSpec::post("/auth/login/")
        .with_json(credentials)?
        .without_auth();
    client.send_json(request).await
}

pub async fn register(client: &ApiClient, data: &RegisterData) -> ApiResult<AuthResponse> {
    let request = RequestSpec::post("/auth/register/")
        .with_json(data)?
        .without_auth();
    client.send_json(request).await
}

/// Blacklists the refresh token server-side.
pub async fn logout(client: &ApiClient, refresh: &str) -> ApiResult<()> {
    let request = RequestSpec::post("/auth/logout/").with_json(&LogoutRequest {
        refresh: refresh.to_string(),
    })?;
    client.send_empty(request).await
}

pub async fn profile(client: &ApiClient) -> ApiResult<User> {
    client.send_json(RequestSpec::get("/auth/profile/")).await
}

pub async fn refresh(client: &ApiClient, refresh: &str) -> ApiResult<TokenPair> {
    client.refresh_tokens(refresh).await
}
