//! Schema-less remote records
//!
//! Field sets vary by record and API version, so a record is a JSON object
//! rather than a fixed struct. `serde_json::Value` is the tagged variant
//! (null, bool, number, string, array, object-of-self).

use serde_json::{Map, Value};

use crate::constants::IDENTIFIER_FIELD;

/// One vendor or form document as returned by the API.
pub type Record = Map<String, Value>;

/// Typed accessors over [`Record`].
pub trait RecordExt {
    /// The remote-assigned `identifier`, when it is a string or a number.
    fn identifier(&self) -> Option<String>;

    /// A string-valued field.
    fn str_field(&self, key: &str) -> Option<&str>;
}

impl RecordExt for Record {
    fn identifier(&self) -> Option<String> {
        match self.get(IDENTIFIER_FIELD)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}
