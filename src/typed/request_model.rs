use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validator::Model;

/// A model bound from the whole request rather than one slice of it.
///
/// The composite document it is validated against carries `headers`, `path`,
/// `method`, `params`, `body` and `provider_data`.
pub trait RequestModel: Model {
    /// Type of the `headers` field; its properties are documented as header
    /// parameters.
    type Headers: Model;

    /// Security scheme the request requires, for documentation.
    fn auth_scheme() -> Option<&'static str> {
        None
    }
}

/// The standard composite request with headers typed as `H`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Request<H = HashMap<String, String>> {
    pub headers: H,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub provider_data: Value,
}

impl<H: Model> RequestModel for Request<H> {
    type Headers = H;
}

/// Headers of a bearer-token authenticated request.
///
/// The header is only declared here; verifying it is up to the handler or
/// the gateway's authorizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BearerAuthHeaders {
    #[serde(default)]
    pub authorization: Option<String>,
}

impl BearerAuthHeaders {
    /// The token with its `Bearer ` prefix removed.
    pub fn token(&self) -> Option<&str> {
        let value = self.authorization.as_deref()?;
        value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
    }
}

/// A request authenticated with a bearer token.
///
/// Documented with the `bearerAuth` security scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BearerAuthRequest {
    pub headers: BearerAuthHeaders,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub provider_data: Value,
}

impl RequestModel for BearerAuthRequest {
    type Headers = BearerAuthHeaders;

    fn auth_scheme() -> Option<&'static str> {
        Some("bearerAuth")
    }
}
