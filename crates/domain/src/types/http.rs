//! Transport request and response values
//!
//! These describe one logical API call as plain data. The transport adapter
//! turns an [`ApiRequest`] into one or more HTTP attempts and reports each
//! attempt as an [`AttemptRecord`].

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::types::page::Continuation;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical API call: method, path relative to the base URL, query, body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    /// Append a query parameter (order is preserved).
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful (2xx) response, decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` when the server sent no content.
    pub body: Value,
    /// Continuation indicator read from the body, for list endpoints.
    pub next_page: Continuation,
    /// Number of attempts it took, including the successful one.
    pub attempts: u32,
}

impl ApiResponse {
    /// Build a response whose continuation is derived from `body`.
    pub fn from_body(status: u16, body: Value, attempts: u32) -> Self {
        let next_page = Continuation::from_body(&body);
        Self { status, body, next_page, attempts }
    }
}

/// How a single attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RateLimited,
    ServerError,
    NetworkError,
    ClientError,
    /// 2xx whose body could not be decoded.
    InvalidBody,
}

impl AttemptOutcome {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError | Self::NetworkError)
    }
}

/// Metadata about one HTTP attempt, for logging collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub method: HttpMethod,
    pub path: String,
    /// 1-based attempt number.
    pub attempt: u32,
    /// HTTP status, absent for connection-level failures.
    pub status: Option<u16>,
    pub outcome: AttemptOutcome,
    /// Backoff the transport will sleep before the next attempt, if any.
    pub delay_before_next: Option<Duration>,
}
