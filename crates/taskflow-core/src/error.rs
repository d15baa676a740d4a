//! Structured errors surfaced by the HTTP client and API operations.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Categories of API errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection refused, DNS failure, TLS error, ...
    Network,
    /// The fixed overall request timeout elapsed.
    Timeout,
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Failed to parse a response body.
    Parse,
    /// Credentials were rejected by login or register.
    Authentication,
    /// Token storage could not be read or written.
    Storage,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Authentication => write!(f, "authentication"),
            ApiErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Error from an API call with kind and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Per-field validation messages reported by the server.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Raw response body, when there was one.
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            field_errors: BTreeMap::new(),
            details: None,
        }
    }

    /// Creates an HTTP status error, extracting the server's message if any.
    ///
    /// Falls back to `Request failed with status code <n>`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| format!("Request failed with status code {status}"));
        let field_errors = parsed.as_ref().map(extract_field_errors).unwrap_or_default();

        Self {
            kind: ApiErrorKind::HttpStatus,
            status: Some(status),
            message,
            field_errors,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::new(ApiErrorKind::Timeout, "Request timed out");
        }
        if err.is_decode() {
            return Self::new(ApiErrorKind::Parse, format!("Invalid response body: {err}"));
        }
        let mut error = Self::new(ApiErrorKind::Network, format!("Network Error: {err}"));
        error.status = err.status().map(|s| s.as_u16());
        error
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        Self::new(ApiErrorKind::Storage, format!("Token storage failed: {err:#}"))
    }

    /// Re-labels a rejected credential exchange, keeping the server's reason.
    #[must_use]
    pub fn into_authentication(self) -> Self {
        if self.kind == ApiErrorKind::HttpStatus {
            Self {
                kind: ApiErrorKind::Authentication,
                ..self
            }
        } else {
            self
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Picks a display message from a JSON error body.
///
/// Order: `detail`, `error`, `message`, `non_field_errors`, first field error.
fn extract_message(body: &Value) -> Option<String> {
    let obj = body.as_object()?;

    for key in ["detail", "error", "message"] {
        if let Some(text) = obj.get(key).and_then(Value::as_str)
            && !text.trim().is_empty()
        {
            return Some(text.to_string());
        }
    }

    if let Some(first) = obj.get("non_field_errors").and_then(first_string) {
        return Some(first);
    }

    extract_field_errors(body)
        .into_iter()
        .next()
        .and_then(|(field, messages)| {
            messages
                .into_iter()
                .next()
                .map(|msg| format!("{field}: {msg}"))
        })
}

/// Collects `{"field": ["msg", ...]}` entries from a validation body.
fn extract_field_errors(body: &Value) -> BTreeMap<String, Vec<String>> {
    let Some(obj) = body.as_object() else {
        return BTreeMap::new();
    };

    obj.iter()
        .filter(|(key, _)| !matches!(key.as_str(), "detail" | "error" | "message" | "code"))
        .filter_map(|(key, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (key.clone(), messages))
        })
        .collect()
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins() {
        let err = ApiError::http_status(
            401,
            r#"{"detail": "No active account found with the given credentials"}"#,
        );
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.status, Some(401));
        assert_eq!(
            err.message,
            "No active account found with the given credentials"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_error_key() {
        let err = ApiError::http_status(
            400,
            r#"{"error": "Cannot transition from todo to review"}"#,
        );
        assert_eq!(err.message, "Cannot transition from todo to review");
    }

    #[test]
    fn test_field_errors_collected() {
        let err = ApiError::http_status(
            400,
            r#"{"email": ["user with this email already exists."], "password": ["Too short."]}"#,
        );
        assert_eq!(err.message, "email: user with this email already exists.");
        assert_eq!(err.field_errors.len(), 2);
        assert_eq!(err.field_errors["password"], vec!["Too short.".to_string()]);
    }

    #[test]
    fn test_non_field_errors() {
        let err = ApiError::http_status(
            400,
            r#"{"non_field_errors": ["Passwords don't match."]}"#,
        );
        assert_eq!(err.message, "Passwords don't match.");
    }

    #[test]
    fn test_default_message_for_non_json_body() {
        let err = ApiError::http_status(502, "<html>Bad gateway</html>");
        assert_eq!(err.message, "Request failed with status code 502");
        assert_eq!(err.details.as_deref(), Some("<html>Bad gateway</html>"));

        let empty = ApiError::http_status(500, "");
        assert_eq!(empty.message, "Request failed with status code 500");
        assert!(empty.details.is_none());
    }

    #[test]
    fn test_into_authentication_only_relabels_http_errors() {
        let http = ApiError::http_status(401, r#"{"detail": "bad"}"#).into_authentication();
        assert_eq!(http.kind, ApiErrorKind::Authentication);
        assert_eq!(http.message, "bad");

        let network = ApiError::new(ApiErrorKind::Network, "down").into_authentication();
        assert_eq!(network.kind, ApiErrorKind::Network);
    }
}
