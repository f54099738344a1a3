//! Shared test helpers for `vendorlink-core` integration tests.
//!
//! [`MockTransport`] answers requests from per-route handlers and records
//! every request, so tests can assert on exactly what went over the wire.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use vendorlink_core::ports::Transport;
use vendorlink_domain::{
    ApiRequest, ApiResponse, HttpMethod, Record, Result as DomainResult, VendorLinkError,
};

type Handler = Box<dyn Fn(&ApiRequest) -> DomainResult<Value> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    handler: Handler,
}

/// In-memory transport with per-route handlers.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `handler`.
    pub fn route<F>(mut self, method: HttpMethod, path: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> DomainResult<Value> + Send + Sync + 'static,
    {
        self.routes.push(Route { method, path: path.to_string(), handler: Box::new(handler) });
        self
    }

    /// Answer `method path` with a fixed body.
    pub fn reply(self, method: HttpMethod, path: &str, body: Value) -> Self {
        self.route(method, path, move |_| Ok(body.clone()))
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self, method: HttpMethod, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.method == method && r.path == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> DomainResult<ApiResponse> {
        self.requests.lock().push(request.clone());
        let route = self
            .routes
            .iter()
            .find(|route| route.method == request.method && route.path == request.path)
            .ok_or_else(|| VendorLinkError::Api { status: 404, body: request.path.clone() })?;
        let body = (route.handler)(&request)?;
        Ok(ApiResponse::from_body(200, body, 1))
    }
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

pub fn query_value<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
    request.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// One answered-tag question entry as the intake endpoint returns it.
pub fn answered_question(text: &str, required: bool) -> Value {
    json!({
        "identifier": format!("q-{}", text.to_lowercase().replace(' ', "-")),
        "text": text,
        "required": required,
        "type": "TEXT",
        "language": "ENGLISH",
        "answeredTag": "answered",
        "notApplicableTag": null,
        "questionLevelCommentTag": null,
        "fileUploadTag": null
    })
}

/// A small but realistic intake form: two required vendor fields, one
/// optional note and a "First Name" asked in two sections.
pub fn intake_form() -> Value {
    json!({
        "identifier": "qv-100",
        "sections": [
            {
                "identifier": "s-vendor",
                "heading": "Vendor Information",
                "controls": [{
                    "identifier": "c-vendor",
                    "heading": "Vendor",
                    "identification": "1",
                    "questions": [
                        answered_question("Vendor Name", true),
                        answered_question("Vendor URL", true),
                        answered_question("Notes", false)
                    ]
                }]
            },
            {
                "identifier": "s-owner",
                "heading": "Primary Business Owner Information",
                "controls": [{
                    "identifier": "c-owner",
                    "questions": [answered_question("First Name", true)]
                }]
            },
            {
                "identifier": "s-contact",
                "heading": "Primary Contact Information",
                "controls": [{
                    "identifier": "c-contact",
                    "questions": [answered_question("First Name", true)]
                }]
            }
        ]
    })
}
