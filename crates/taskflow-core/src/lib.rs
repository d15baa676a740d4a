//! Core Taskflow client library (config, storage, HTTP client, session, API).

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod nav;
pub mod session;
pub mod storage;

pub use client::{
    ApiClient, ApiResponse, AuthEvent, ClientOptions, PendingRequest, RequestSpec,
};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use nav::{Navigator, NoopNavigator, RecordingNavigator, Route};
pub use session::{Session, SessionState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenKind, TokenStore};
