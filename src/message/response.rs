use std::collections::HashMap;

use serde_json::{json, Value};

/// Provider-neutral response produced by [`App::run`](crate::App::run).
///
/// When `raw` is set, `body` holds an already encoded JSON document as a
/// string and adapters must emit it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
    pub headers: HashMap<String, String>,
    pub raw: bool,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: HashMap::new(),
            raw: false,
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, json!({ "error": message }))
    }

    /// A pre-encoded JSON document.
    pub fn raw(status: u16, encoded: String) -> Self {
        Self {
            raw: true,
            ..Self::new(status, Value::String(encoded))
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Body encoded as JSON text, honouring `raw`.
    pub fn encoded_body(&self) -> String {
        match (&self.body, self.raw) {
            (Value::String(encoded), true) => encoded.clone(),
            (body, _) => body.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self::error(404, "Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::error(405, "Method Not Allowed")
    }

    pub fn internal_error() -> Self {
        Self::error(500, "Internal Server Error")
    }
}
