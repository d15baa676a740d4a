//! Session/auth manager.
//!
//! An explicitly owned [`Session`] holds the current user and follows the
//! state machine `Unknown -> {Authenticated, Anonymous}`,
//! `Anonymous -> Authenticated` (login/register) and
//! `Authenticated -> Anonymous` (logout or unrecoverable refresh failure).

use std::sync::Arc;

use taskflow_types::{LoginCredentials, RegisterData, User};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::api::auth;
use crate::client::{ApiClient, AuthEvent};
use crate::error::{ApiError, ApiResult};
use crate::nav::{Navigator, Route};
use crate::storage::{TokenKind, TokenStore};

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Not yet resolved (before [`Session::init`]).
    Unknown,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    /// Whether moving to `next` is an allowed transition.
    pub fn can_transition(&self, next: &SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Unknown, SessionState::Anonymous | SessionState::Authenticated(_))
                | (SessionState::Anonymous, SessionState::Authenticated(_))
                | (SessionState::Authenticated(_), SessionState::Anonymous)
        )
    }

    fn name(&self) -> &'static str {
        match self {
            SessionState::Unknown => "unknown",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

pub struct Session {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
    state: SessionState,
    events: Option<broadcast::Receiver<AuthEvent>>,
}

impl Session {
    /// Navigation goes through the client's navigator.
    pub fn new(client: ApiClient) -> Self {
        let navigator = client.navigator();
        let events = Some(client.subscribe());
        Self {
            client,
            navigator,
            state: SessionState::Unknown,
            events,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current state, after applying any pending auth events.
    pub fn state(&mut self) -> &SessionState {
        self.drain_events();
        &self.state
    }

    pub fn current_user(&mut self) -> Option<&User> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&mut self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    /// Resolves the session from persisted tokens.
    ///
    /// Never fails: missing tokens or a rejected profile request leave the
    /// session anonymous.
    pub async fn init(&mut self) -> &SessionState {
        self.drain_events();

        let has_tokens = match self.client.store().has_any() {
            Ok(has) => has,
            Err(e) => {
                warn!("Failed to read tokens: {e:#}");
                false
            }
        };

        if !has_tokens {
            self.transition(SessionState::Anonymous);
            return &self.state;
        }

        match auth::profile(&self.client).await {
            Ok(user) => self.transition(SessionState::Authenticated(user)),
            Err(e) => {
                debug!("Session could not be resumed: {e}");
                self.drain_events();
                self.transition(SessionState::Anonymous);
            }
        }
        &self.state
    }

    /// Authenticates with email and password.
    ///
    /// On success tokens are persisted and the navigator is sent to the
    /// landing route. Rejections surface as `Authentication` errors.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<User> {
        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = auth::login(&self.client, &credentials)
            .await
            .map_err(ApiError::into_authentication)?;
        self.establish(&response.access, &response.refresh, response.user)
    }

    pub async fn register(&mut self, data: &RegisterData) -> ApiResult<User> {
        let response = auth::register(&self.client, data)
            .await
            .map_err(ApiError::into_authentication)?;
        self.establish(&response.access, &response.refresh, response.user)
    }

    /// Ends the session. Always succeeds locally.
    pub async fn logout(&mut self) {
        let store: Arc<dyn TokenStore> = self.client.store();

        match store.get(TokenKind::Refresh) {
            Ok(Some(refresh)) => {
                if let Err(e) = auth::logout(&self.client, &refresh).await {
                    warn!("Logout request failed: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read refresh token: {e:#}"),
        }

        if let Err(e) = store.clear() {
            warn!("Failed to clear tokens: {e:#}");
        }
        self.drain_events();
        self.force_state(SessionState::Anonymous);
        self.navigator.navigate(Route::Login);
    }

    /// Drops the user and the event subscription. Tokens are kept.
    pub fn teardown(&mut self) {
        self.events = None;
        self.state = SessionState::Unknown;
    }

    fn establish(&mut self, access: &str, refresh: &str, user: User) -> ApiResult<User> {
        self.client
            .store()
            .set_pair(access, refresh)
            .map_err(|e| ApiError::storage(&e))?;

        self.drain_events();
        self.force_state(SessionState::Authenticated(user.clone()));
        self.navigator.navigate(Route::Dashboard);
        Ok(user)
    }

    /// Re-authentication from any state passes through `Anonymous`.
    fn force_state(&mut self, next: SessionState) {
        if !self.state.can_transition(&next) && self.state != SessionState::Anonymous {
            self.transition(SessionState::Anonymous);
        }
        self.transition(next);
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition(&next) {
            debug!(from = self.state.name(), to = next.name(), "Ignoring session transition");
            return;
        }
        info!(from = self.state.name(), to = next.name(), "Session transition");
        self.state = next;
    }

    fn drain_events(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };
        let mut expired = false;
        loop {
            match events.try_recv() {
                // Only expiry events are ever sent.
                Ok(AuthEvent::SessionExpired) | Err(TryRecvError::Lagged(_)) => expired = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if expired && matches!(self.state, SessionState::Authenticated(_)) {
            self.transition(SessionState::Anonymous);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::{ClientOptions, RequestSpec};
    use crate::error::ApiErrorKind;
    use crate::nav::RecordingNavigator;
    use crate::storage::MemoryTokenStore;

    fn session_for(
        server: &MockServer,
        store: Arc<MemoryTokenStore>,
    ) -> (Session, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::new(
            ClientOptions::new(server.uri()),
            store,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )
        .unwrap();
        (Session::new(client), navigator)
    }

    fn user_json() -> serde_json::Value {
        json!({"id": 1, "email": "a@b.com", "username": "ab", "role": "member"})
    }

    #[test]
    fn test_transition_table() {
        let user = serde_json::from_value::<User>(user_json()).unwrap();
        let authed = SessionState::Authenticated(user);
        assert!(SessionState::Unknown.can_transition(&SessionState::Anonymous));
        assert!(SessionState::Unknown.can_transition(&authed));
        assert!(SessionState::Anonymous.can_transition(&authed));
        assert!(authed.can_transition(&SessionState::Anonymous));
        assert!(!SessionState::Anonymous.can_transition(&SessionState::Unknown));
        assert!(!authed.can_transition(&authed.clone()));
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .and(body_json(json!({"email": "a@b.com", "password": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "acc",
                "refresh": "ref",
                "user": user_json()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let (mut session, navigator) = session_for(&server, Arc::clone(&store));
        session.init().await;

        let user = session.login("a@b.com", "x").await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert!(session.is_authenticated());
        assert_eq!(store.get(TokenKind::Access).unwrap().as_deref(), Some("acc"));
        assert_eq!(store.get(TokenKind::Refresh).unwrap().as_deref(), Some("ref"));
        assert_eq!(navigator.last(), Some(Route::Dashboard));
    }

    #[tokio::test]
    async fn test_rejected_login_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"detail": "No active account found with the given credentials"}),
            ))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let (mut session, navigator) = session_for(&server, Arc::clone(&store));
        session.init().await;

        let err = session.login("a@b.com", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Authentication);
        assert_eq!(
            err.message,
            "No active account found with the given credentials"
        );
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(!store.has_any().unwrap());
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_init_without_tokens_makes_no_request() {
        let server = MockServer::start().await;
        let (mut session, _) = session_for(&server, Arc::new(MemoryTokenStore::new()));

        assert_eq!(session.init().await, &SessionState::Anonymous);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_resumes_with_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
        let (mut session, _) = session_for(&server, store);
        session.init().await;
        assert_eq!(session.current_user().map(|u| u.id), Some(1));
    }

    #[tokio::test]
    async fn test_init_with_rejected_token_is_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/token/refresh/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
        let (mut session, _) = session_for(&server, Arc::clone(&store));

        assert_eq!(session.init().await, &SessionState::Anonymous);
        assert!(!store.has_any().unwrap());
    }

    #[tokio::test]
    async fn test_logout_succeeds_when_server_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/logout/"))
            .and(body_json(json!({"refresh": "ref"})))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
        let (mut session, navigator) = session_for(&server, Arc::clone(&store));
        session.init().await;
        assert!(session.is_authenticated());

        session.logout().await;
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(!store.has_any().unwrap());
        assert_eq!(navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_refresh_failure_ends_authenticated_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/token/refresh/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
        let (mut session, navigator) = session_for(&server, store);
        session.init().await;
        assert!(session.is_authenticated());

        let client = session.client().clone();
        assert!(client.send(RequestSpec::get("/projects/")).await.is_err());

        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_teardown_keeps_tokens() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
        let (mut session, _) = session_for(&server, Arc::clone(&store));

        session.teardown();
        assert_eq!(session.state(), &SessionState::Unknown);
        assert!(store.has_any().unwrap());
    }
}
