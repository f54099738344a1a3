//! List-endpoint pages
//!
//! List endpoints answer with `{ "items": [...], "nextPage": ... }`. The
//! continuation indicator is either an opaque token or a plain boolean.

use serde_json::Value;

use crate::constants::{PAGE_ITEMS_FIELD, PAGE_NEXT_FIELD};
use crate::errors::{Result, VendorLinkError};
use crate::types::record::Record;

/// Whether another page follows, and how to ask for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Continuation {
    /// No further pages.
    #[default]
    Done,
    /// Opaque cursor to send back on the next request.
    Token(String),
    /// More pages exist; the caller advances its own page counter.
    More,
}

impl Continuation {
    /// Read the indicator from a decoded list body.
    ///
    /// A non-empty string is a token, `true` means more, anything else (absent,
    /// `null`, `false`, `""`, a non-object body) means done.
    pub fn from_body(body: &Value) -> Self {
        match body.get(PAGE_NEXT_FIELD) {
            Some(Value::String(token)) if !token.is_empty() => Self::Token(token.clone()),
            Some(Value::Number(token)) => Self::Token(token.to_string()),
            Some(Value::Bool(true)) => Self::More,
            _ => Self::Done,
        }
    }

    pub fn has_more(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

/// One page of item summaries. Transient: consumed by the paginator.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Record>,
    pub next: Continuation,
}

impl Page {
    /// Decode a list body.
    ///
    /// A bare JSON array is accepted as a single, final page. Non-object items
    /// are dropped.
    ///
    /// # Errors
    /// Returns `VendorLinkError::MalformedResponse` when the body is neither a
    /// list object nor an array.
    pub fn from_body(body: Value) -> Result<Self> {
        let next = Continuation::from_body(&body);
        let raw_items = match body {
            Value::Array(items) => return Ok(Self { items: objects(items), next: Continuation::Done }),
            Value::Object(mut map) => match map.remove(PAGE_ITEMS_FIELD) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(VendorLinkError::MalformedResponse(format!(
                        "'{PAGE_ITEMS_FIELD}' must be an array, got {}",
                        type_name(&other)
                    )))
                }
            },
            other => {
                return Err(VendorLinkError::MalformedResponse(format!(
                    "list body must be an object or array, got {}",
                    type_name(&other)
                )))
            }
        };

        Ok(Self { items: objects(raw_items), next })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn objects(items: Vec<Value>) -> Vec<Record> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
