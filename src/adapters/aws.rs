use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use http::Method;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::Dispatch;
use crate::json::{json_decode_error_fragment, json_dumps};
use crate::message::{ParsedRequest, Response};

/// Why an API Gateway event could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// `httpMethod` is missing or not a valid method token
    InvalidMethod(String),
    /// The body is not valid JSON; carries a located fragment
    InvalidJson(String),
    /// The body decoded to something other than a JSON object
    BodyNotObject,
    /// `isBase64Encoded` was set but the body is not valid base64 UTF-8
    InvalidBase64(String),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::InvalidMethod(method) => write!(f, "Invalid HTTP method '{method}'"),
            AdapterError::InvalidJson(fragment) => write!(f, "Invalid JSON body:\n{fragment}"),
            AdapterError::BodyNotObject => write!(f, "JSON body must be an object"),
            AdapterError::InvalidBase64(message) => write!(f, "Invalid base64 body: {message}"),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Adapter for API Gateway REST proxy integrations (`{proxy+}` resources).
///
/// ```rust,no_run
/// use lambda_api::{AwsAdapter, App};
///
/// # async fn handle(event: serde_json::Value) -> serde_json::Value {
/// let adapter = AwsAdapter::new(App::new());
/// adapter.run(event).await
/// # }
/// ```
pub struct AwsAdapter<D> {
    app: D,
}

impl<D: Dispatch> AwsAdapter<D> {
    pub fn new(app: D) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &D {
        &self.app
    }

    /// Read an API Gateway event.
    ///
    /// The path comes from `pathParameters.proxy` and is kept verbatim, so
    /// `"/"` and `""` stay distinct. Header names are lower-cased with `-`
    /// mapped to `_`.
    pub fn parse_request(&self, event: &Value) -> Result<ParsedRequest, AdapterError> {
        let method_name = event
            .get("httpMethod")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let method = Method::from_bytes(method_name.to_ascii_uppercase().as_bytes())
            .map_err(|_| AdapterError::InvalidMethod(method_name.to_string()))?;

        let path = event
            .pointer("/pathParameters/proxy")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let params = match event.get("queryStringParameters") {
            Some(Value::Object(params)) => params.clone(),
            _ => Map::new(),
        };

        let headers = match event.get("headers") {
            Some(Value::Object(headers)) => headers
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (normalize_header(k), v.to_string())))
                .collect(),
            _ => HashMap::new(),
        };

        let base64 = event
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let body = decode_body(event.get("body"), base64)?;

        Ok(ParsedRequest {
            headers,
            path,
            method,
            params,
            body,
            provider_data: event.clone(),
        })
    }

    /// Encode a response as an API Gateway proxy result.
    pub fn format_response(&self, response: &Response) -> Value {
        let mut headers = Map::new();
        headers.insert("Content-Type".into(), json!("application/json"));
        for (name, value) in &response.headers {
            headers.insert(name.clone(), json!(value));
        }

        let body = if response.raw {
            response.encoded_body()
        } else {
            json_dumps(&response.body, false)
        };

        json!({
            "statusCode": response.status,
            "body": body,
            "headers": headers,
        })
    }

    /// Parse, dispatch and encode one event.
    pub async fn run(&self, event: Value) -> Value {
        let response = match self.parse_request(&event) {
            Ok(request) => self.app.dispatch(&request).await,
            Err(err) => {
                debug!(error = %err, "Rejected API Gateway event");
                Response::error(400, &err.to_string())
            }
        };
        self.format_response(&response)
    }

    /// Entry point with the Lambda runtime's `(event, context)` shape.
    pub async fn lambda_handler(&self, event: Value, _context: Value) -> Value {
        self.run(event).await
    }
}

fn normalize_header(name: &str) -> String {
    name.to_ascii_lowercase().replace('-', "_")
}

fn decode_body(body: Option<&Value>, base64: bool) -> Result<Option<Map<String, Value>>, AdapterError> {
    match body {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(Value::String(text)) => {
            let text = if base64 {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(text)
                    .map_err(|e| AdapterError::InvalidBase64(e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| AdapterError::InvalidBase64(e.to_string()))?
            } else {
                text.clone()
            };
            if text.trim().is_empty() {
                return Ok(None);
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => Ok(Some(map)),
                Ok(Value::Null) => Ok(None),
                Ok(_) => Err(AdapterError::BodyNotObject),
                Err(err) => Err(AdapterError::InvalidJson(json_decode_error_fragment(&text, &err))),
            }
        }
        Some(_) => Err(AdapterError::BodyNotObject),
    }
}
