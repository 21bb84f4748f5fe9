//! Error types for riftwatch.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Kind of failure reported by the remote API, keyed by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorised,
    /// 404
    NotFound,
    /// 429
    TooManyRequests,
    /// 500
    InternalServerError,
    /// 503
    ServiceUnavailable,
    /// Any other non-success status
    Other,
}

impl ErrorKind {
    /// Classify a non-success status code.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorised,
            404 => ErrorKind::NotFound,
            429 => ErrorKind::TooManyRequests,
            500 => ErrorKind::InternalServerError,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Other,
        }
    }

    /// Human-readable description of this kind.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorised => "Unauthorised",
            ErrorKind::NotFound => "Data not found",
            ErrorKind::TooManyRequests => "Too many requests",
            ErrorKind::InternalServerError => "Internal server error",
            ErrorKind::ServiceUnavailable => "Service unavailable",
            ErrorKind::Other => "Unexpected response status",
        }
    }
}

/// A remote call that completed with a non-success status.
///
/// The response status code and headers are kept so callers can
/// inspect things like `Retry-After`.
#[derive(Error, Debug, Clone)]
#[error("{} (status {})", .kind.message(), .status.as_u16())]
pub struct ApiError {
    kind: ErrorKind,
    status: StatusCode,
    headers: HeaderMap,
}

impl ApiError {
    /// Build the error for a response status and its headers.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            kind: ErrorKind::from_status(status),
            status,
            headers,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Server-suggested delay before retrying, from `Retry-After` in
    /// seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

/// Main error type for riftwatch operations.
#[derive(Error, Debug)]
pub enum RiftwatchError {
    /// The remote API answered with an error status
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The HTTP transport failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RiftwatchError {
    /// The API error kind, if this is an error status from the remote API.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            RiftwatchError::Api(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type alias for riftwatch operations.
pub type Result<T> = std::result::Result<T, RiftwatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (400, ErrorKind::BadRequest, "Bad request"),
            (401, ErrorKind::Unauthorised, "Unauthorised"),
            (404, ErrorKind::NotFound, "Data not found"),
            (429, ErrorKind::TooManyRequests, "Too many requests"),
            (500, ErrorKind::InternalServerError, "Internal server error"),
            (503, ErrorKind::ServiceUnavailable, "Service unavailable"),
            (418, ErrorKind::Other, "Unexpected response status"),
        ];

        for (code, kind, message) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(ErrorKind::from_status(status), kind);
            assert_eq!(kind.message(), message);
        }
    }

    #[test]
    fn test_api_error_keeps_status_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-type", HeaderValue::from_static("user"));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));

        let err = ApiError::new(StatusCode::TOO_MANY_REQUESTS, headers);

        assert_eq!(err.kind(), ErrorKind::TooManyRequests);
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.headers()["x-rate-limit-type"], "user");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(err.to_string(), "Too many requests (status 429)");
    }

    #[test]
    fn test_unknown_status_message_carries_code() {
        let err = ApiError::new(StatusCode::IM_A_TEAPOT, HeaderMap::new());
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.retry_after(), None);
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_api_kind() {
        let err: RiftwatchError = ApiError::new(StatusCode::NOT_FOUND, HeaderMap::new()).into();
        assert_eq!(err.api_kind(), Some(ErrorKind::NotFound));
        assert_eq!(RiftwatchError::Config("x".into()).api_kind(), None);
    }
}
