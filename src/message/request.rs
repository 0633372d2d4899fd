use std::collections::{BTreeMap, HashMap};
use std::fmt;

use http::Method;
use serde_json::{json, Map, Value};

use crate::logging::RedactionLevel;

/// Provider-neutral request handed to [`App::run`](crate::App::run).
///
/// Adapters are expected to deliver decoded query parameters, a decoded JSON
/// body and header keys normalized to lower snake case (`x_custom_header`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// Header names normalized by the adapter
    pub headers: HashMap<String, String>,
    /// Request path, used verbatim as the route key
    pub path: String,
    pub method: Method,
    /// Decoded query parameters
    pub params: Map<String, Value>,
    /// Decoded JSON body, if any
    pub body: Option<Map<String, Value>>,
    /// The untouched provider event
    pub provider_data: Value,
}

impl ParsedRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            headers: HashMap::new(),
            path: path.into(),
            method,
            params: Map::new(),
            body: None,
            provider_data: Value::Null,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the body. Anything but a JSON object clears it.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => Some(map),
            _ => None,
        };
        self
    }

    pub fn with_provider_data(mut self, data: Value) -> Self {
        self.provider_data = data;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The document a composite request model is validated against.
    pub fn to_composite(&self) -> Value {
        json!({
            "headers": self.headers,
            "path": self.path,
            "method": self.method.as_str(),
            "params": self.params,
            "body": self.body,
            "provider_data": self.provider_data,
        })
    }

    /// A `Display` view masking values according to `level`.
    pub fn redacted(&self, level: RedactionLevel) -> Redacted<'_> {
        Redacted {
            request: self,
            level,
        }
    }
}

impl fmt::Display for ParsedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.redacted(RedactionLevel::None), f)
    }
}

/// Log rendering of a [`ParsedRequest`] with sensitive values masked.
pub struct Redacted<'a> {
    request: &'a ParsedRequest,
    level: RedactionLevel,
}

const MASK: &str = "<REDACTED>";

fn is_credential_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase().replace('-', "_");
    matches!(
        name.as_str(),
        "authorization" | "proxy_authorization" | "cookie" | "set_cookie" | "x_api_key"
    ) || name.contains("token")
        || name.contains("secret")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let req = self.request;
        let full = self.level == RedactionLevel::Full;
        write!(f, "{} {}", req.method, req.path)?;

        if !req.params.is_empty() {
            let query: Vec<String> = req
                .params
                .iter()
                .map(|(k, v)| {
                    if full {
                        format!("{k}={MASK}")
                    } else {
                        format!("{k}={}", render_value(v))
                    }
                })
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }

        if let Some(body) = req.body.as_ref().filter(|b| !b.is_empty()) {
            if full {
                write!(f, "\nbody: {MASK}")?;
            } else {
                write!(f, "\nbody: {}", Value::Object(body.clone()))?;
            }
        }

        if !req.headers.is_empty() {
            let headers: BTreeMap<&str, &str> = req
                .headers
                .iter()
                .map(|(k, v)| {
                    let masked = self.level != RedactionLevel::None && is_credential_header(k);
                    (k.as_str(), if masked { MASK } else { v.as_str() })
                })
                .collect();
            write!(f, "\nheaders: {headers:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedRequest {
        ParsedRequest::new(Method::POST, "/items")
            .with_param("limit", "10")
            .with_body(json!({"name": "widget"}))
            .with_header("authorization", "Bearer abc")
            .with_header("x_trace", "t-1")
    }

    #[test]
    fn test_display_includes_query_body_and_headers() {
        let text = sample().to_string();
        assert!(text.starts_with("POST /items?limit=10"));
        assert!(text.contains("body: {\"name\":\"widget\"}"));
        assert!(text.contains("Bearer abc"));
    }

    #[test]
    fn test_credentials_redaction_masks_auth_headers_only() {
        let req = sample();
        let text = req.redacted(RedactionLevel::Credentials).to_string();
        assert!(!text.contains("Bearer abc"));
        assert!(text.contains("t-1"));
        assert!(text.contains("widget"));
    }

    #[test]
    fn test_full_redaction_masks_params_and_body() {
        let req = sample();
        let text = req.redacted(RedactionLevel::Full).to_string();
        assert!(text.contains("limit=<REDACTED>"));
        assert!(!text.contains("widget"));
    }

    #[test]
    fn test_composite_shape() {
        let composite = sample().to_composite();
        assert_eq!(composite["method"], "POST");
        assert_eq!(composite["params"]["limit"], "10");
        assert_eq!(composite["body"]["name"], "widget");
        assert_eq!(composite["headers"]["x_trace"], "t-1");
    }

    #[test]
    fn test_non_object_body_is_dropped() {
        let req = ParsedRequest::new(Method::POST, "/").with_body(json!([1, 2]));
        assert!(req.body.is_none());
    }
}
