//! Error taxonomy for the Tavily API client.
//!
//! Every transport or HTTP failure is classified into an [`ErrorKind`]
//! whose retryability is fixed by the kind itself, so an [`ApiError`]
//! can never claim to be retryable when its kind says otherwise.

use serde::{Deserialize, Serialize};

/// Classification of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credential missing or rejected (HTTP 401/403).
    #[serde(rename = "AUTH_ERROR")]
    Auth,
    /// Request rejected as malformed, locally or by the service (HTTP 400).
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Too many requests (HTTP 429).
    #[serde(rename = "RATE_LIMIT_ERROR")]
    RateLimit,
    /// Server-side failure (HTTP 5xx other than 503).
    #[serde(rename = "SERVER_ERROR")]
    Server,
    /// Service temporarily unavailable (HTTP 503).
    #[serde(rename = "SERVICE_UNAVAILABLE")]
    ServiceUnavailable,
    /// Connect or read timeout.
    #[serde(rename = "TIMEOUT_ERROR")]
    Timeout,
    /// DNS failure, refused or reset connection.
    #[serde(rename = "NETWORK_ERROR")]
    Network,
}

impl ErrorKind {
    /// Returns `true` if a call failing with this kind may be re-attempted.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        match self {
            Self::Auth | Self::Validation => false,
            Self::RateLimit
            | Self::Server
            | Self::ServiceUnavailable
            | Self::Timeout
            | Self::Network => true,
        }
    }

    /// Returns the wire/display name (e.g. `"RATE_LIMIT_ERROR"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Server => "SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT_ERROR",
            Self::Network => "NETWORK_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed failure from the Tavily API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Failure classification.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// HTTP status code, when the failure came from a response.
    pub status: Option<u16>,
    /// Number of attempts made before giving up (1 = no retries).
    pub attempts: u32,
}

impl ApiError {
    /// Creates an error of the given kind from a single attempt.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            attempts: 1,
        }
    }

    /// Shorthand for a local `VALIDATION_ERROR`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Shorthand for an `AUTH_ERROR`.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    /// Attaches the HTTP status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Records how many attempts were made.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Whether the failure is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if self.attempts > 1 {
            write!(f, " (after {} attempts)", self.attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Maps an HTTP error status to an [`ErrorKind`].
///
/// Unlisted 4xx codes are treated as request rejections and are not retried.
#[must_use]
pub const fn classify_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Auth,
        429 => ErrorKind::RateLimit,
        503 => ErrorKind::ServiceUnavailable,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Validation,
    }
}

/// Builds an [`ApiError`] from a non-success response.
///
/// `body` is the raw response text; the service's own error message is
/// preferred over the bare status line when it can be found.
#[must_use]
pub fn from_response(status: u16, body: &str) -> ApiError {
    let message = service_message(body).unwrap_or_else(|| {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unexpected status");
        format!("HTTP {status} {reason}")
    });
    ApiError::new(classify_status(status), message).with_status(status)
}

/// Classifies a transport-level `reqwest` failure.
#[must_use]
pub fn classify_transport(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ErrorKind::Timeout, format!("request timed out: {err}"));
    }
    if let Some(status) = err.status() {
        return ApiError::new(classify_status(status.as_u16()), err.to_string())
            .with_status(status.as_u16());
    }
    if err.is_decode() {
        return ApiError::new(ErrorKind::Server, format!("invalid response body: {err}"));
    }
    ApiError::new(ErrorKind::Network, format!("connection failed: {err}"))
}

/// Pulls the error text out of a Tavily error body.
///
/// Accepts `{"detail": {"error": ..}}`, `{"detail": ..}`, `{"error": ..}`
/// and `{"message": ..}` shapes.
fn service_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/detail/error"),
        value.get("detail"),
        value.get("error"),
        value.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401, ErrorKind::Auth ; "unauthorized")]
    #[test_case(403, ErrorKind::Auth ; "forbidden")]
    #[test_case(400, ErrorKind::Validation ; "bad request")]
    #[test_case(422, ErrorKind::Validation ; "schema rejection")]
    #[test_case(429, ErrorKind::RateLimit ; "rate limited")]
    #[test_case(500, ErrorKind::Server ; "internal error")]
    #[test_case(502, ErrorKind::Server ; "bad gateway")]
    #[test_case(503, ErrorKind::ServiceUnavailable ; "unavailable")]
    #[test_case(504, ErrorKind::Server ; "gateway timeout")]
    fn test_classify_status(status: u16, expected: ErrorKind) {
        assert_eq!(classify_status(status), expected);
    }

    #[test]
    fn test_terminal_kinds_never_retry() {
        assert!(!ErrorKind::Auth.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
    }

    #[test]
    fn test_transient_kinds_retry() {
        for kind in [
            ErrorKind::RateLimit,
            ErrorKind::Server,
            ErrorKind::ServiceUnavailable,
            ErrorKind::Timeout,
            ErrorKind::Network,
        ] {
            assert!(kind.is_retryable(), "{kind} should be retryable");
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::RateLimit.to_string(), "RATE_LIMIT_ERROR");
        assert_eq!(
            ErrorKind::ServiceUnavailable.to_string(),
            "SERVICE_UNAVAILABLE"
        );
        let json = serde_json::to_string(&ErrorKind::Timeout).unwrap_or_default();
        assert_eq!(json, "\"TIMEOUT_ERROR\"");
    }

    #[test_case(ErrorKind::Auth ; "auth")]
    #[test_case(ErrorKind::Validation ; "validation")]
    #[test_case(ErrorKind::RateLimit ; "rate limit")]
    #[test_case(ErrorKind::Server ; "server")]
    #[test_case(ErrorKind::ServiceUnavailable ; "service unavailable")]
    #[test_case(ErrorKind::Timeout ; "timeout")]
    #[test_case(ErrorKind::Network ; "network")]
    fn test_serialized_name_matches_display(kind: ErrorKind) {
        let json = serde_json::to_string(&kind).unwrap_or_default();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
        let back: ErrorKind = serde_json::from_str(&json).unwrap_or_else(|_| unreachable!());
        assert_eq!(back, kind);
    }

    #[test]
    fn test_display_annotates_attempts() {
        let err = ApiError::new(ErrorKind::Server, "boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.with_attempts(4).to_string(), "boom (after 4 attempts)");
    }

    #[test]
    fn test_from_response_prefers_service_message() {
        let err = from_response(401, r#"{"detail":{"error":"Unauthorized: missing or invalid API key."}}"#);
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.status, Some(401));
        assert_eq!(err.message, "Unauthorized: missing or invalid API key.");
    }

    #[test]
    fn test_from_response_falls_back_to_status_line() {
        let err = from_response(503, "<html>down</html>");
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(err.message, "HTTP 503 Service Unavailable");
    }

    #[test]
    fn test_service_message_shapes() {
        assert_eq!(
            service_message(r#"{"detail":"bad query"}"#).as_deref(),
            Some("bad query")
        );
        assert_eq!(
            service_message(r#"{"error":"slow down"}"#).as_deref(),
            Some("slow down")
        );
        assert_eq!(service_message(r#"{"message":"  "}"#), None);
        assert_eq!(service_message("not json"), None);
    }
}
