//! HTTP client wrapper with bearer attach and refresh-once on 401.
//!
//! Every request reads the access token from the [`TokenStore`] and sends it
//! as `Authorization: Bearer <token>`. A 401 triggers a single refresh
//! exchange followed by exactly one replay of the original request. When the
//! exchange fails, persisted tokens are cleared, the navigator is sent to
//! [`Route::Login`] and subscribers receive [`AuthEvent::SessionExpired`].
//!
//! Refreshes are coalesced: the exchange runs under an async mutex, and a
//! request that waited for it replays with the already-rotated token.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use taskflow_types::{RefreshRequest, TokenPair};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::nav::{Navigator, Route};
use crate::storage::{TokenKind, TokenStore};

pub const USER_AGENT: &str = concat!("taskflow/", env!("CARGO_PKG_VERSION"));

/// Token exchange endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

const EVENT_CAPACITY: usize = 16;

/// A request as the caller describes it, before transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the base URL, with leading and trailing slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token to send; filled from storage when unset.
    pub authorization: Option<String>,
    /// Never attach a bearer and never refresh (credential endpoints).
    pub skip_auth: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authorization: None,
            skip_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Serializes `body` as the JSON payload.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::parse(format!("Failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn without_auth(mut self) -> Self {
        self.skip_auth = true;
        self.authorization = None;
        self
    }
}

/// A request in flight, carrying the retry mark.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request: RequestSpec,
    /// Set once the request has been replayed after a refresh.
    pub attempted: bool,
}

impl PendingRequest {
    pub fn new(request: RequestSpec) -> Self {
        Self {
            request,
            attempted: false,
        }
    }
}

/// Raw response with status and body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_result(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::http_status(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::parse(format!("Failed to parse response: {e}")))
    }
}

/// Notifications about the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Refresh failed; tokens were cleared.
    SessionExpired,
}

/// Transport settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.resolve_base_url()?,
            timeout: config.api.timeout(),
        })
    }
}

enum RefreshOutcome {
    Replay(String),
    NoRefreshToken,
    Failed,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    refresh_lock: Mutex<()>,
    events: broadcast::Sender<AuthEvent>,
}

/// Cheap-to-clone handle to the configured HTTP client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        options: ClientOptions,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: options.base_url.trim_end_matches('/').to_string(),
                store,
                navigator,
                refresh_lock: Mutex::new(()),
                events,
            }),
        })
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::new(ClientOptions::from_config(config)?, store, navigator)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.inner.navigator)
    }

    /// Subscribes to auth lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    /// Sends a request and returns the successful response.
    ///
    /// Non-2xx responses become [`ApiError`]s. A 401 is refreshed and
    /// replayed at most once.
    pub async fn send(&self, request: RequestSpec) -> ApiResult<ApiResponse> {
        let mut pending = PendingRequest::new(request);
        if !pending.request.skip_auth && pending.request.authorization.is_none() {
            pending.request.authorization = self.token(TokenKind::Access)?;
        }

        loop {
            let response = self.dispatch(&pending.request).await?;
            if response.status != 401 {
                return response.into_result();
            }

            let original = ApiError::http_status(response.status, &response.body);
            if pending.attempted || pending.request.skip_auth {
                return Err(original);
            }
            pending.attempted = true;

            match self
                .refresh_for(pending.request.authorization.as_deref())
                .await
            {
                RefreshOutcome::Replay(access) => {
                    debug!(path = %pending.request.path, "Replaying request after refresh");
                    pending.request.authorization = Some(access);
                }
                RefreshOutcome::NoRefreshToken => return Err(original),
                RefreshOutcome::Failed => {
                    self.expire_session();
                    return Err(original);
                }
            }
        }
    }

    /// Sends a request and parses the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestSpec) -> ApiResult<T> {
        self.send(request).await?.json()
    }

    /// Sends a request whose response body is ignored.
    pub async fn send_empty(&self, request: RequestSpec) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// Sent without a bearer and never retried.
    pub async fn refresh_tokens(&self, refresh: &str) -> ApiResult<TokenPair> {
        let request = RequestSpec::post(REFRESH_PATH)
            .with_json(&RefreshRequest {
                refresh: refresh.to_string(),
            })?
            .without_auth();
        self.dispatch(&request).await?.into_result()?.json()
    }

    fn token(&self, kind: TokenKind) -> ApiResult<Option<String>> {
        self.inner
            .store
            .get(kind)
            .map_err(|e| ApiError::storage(&e))
    }

    async fn refresh_for(&self, used: Option<&str>) -> RefreshOutcome {
        let _guard = self.inner.refresh_lock.lock().await;

        // Another request already rotated the token while we waited.
        if let Ok(Some(current)) = self.inner.store.get(TokenKind::Access)
            && used != Some(current.as_str())
        {
            return RefreshOutcome::Replay(current);
        }

        let refresh = match self.inner.store.get(TokenKind::Refresh) {
            Ok(Some(refresh)) => refresh,
            Ok(None) => return RefreshOutcome::NoRefreshToken,
            Err(e) => {
                warn!("Failed to read refresh token: {e:#}");
                return RefreshOutcome::NoRefreshToken;
            }
        };

        debug!("Access token rejected, refreshing");
        match self.refresh_tokens(&refresh).await {
            Ok(pair) => {
                let rotated = pair.refresh.unwrap_or(refresh);
                if let Err(e) = self.inner.store.set_pair(&pair.access, &rotated) {
                    warn!("Failed to persist refreshed tokens: {e:#}");
                }
                RefreshOutcome::Replay(pair.access)
            }
            Err(e) => {
                warn!("Token refresh failed: {e}");
                RefreshOutcome::Failed
            }
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to clear tokens: {e:#}");
        }
        self.inner.navigator.navigate(Route::Login);
        // No subscribers is fine.
        let _ = self.inner.events.send(AuthEvent::SessionExpired);
    }

    async fn dispatch(&self, request: &RequestSpec) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "API request");

        let mut builder = self.inner.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if !request.skip_auth
            && let Some(token) = &request.authorization
        {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| ApiError::from_reqwest(&e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        debug!(status, path = %request.path, "API response");

        Ok(ApiResponse { status, body })
    }
}
