use http::{HeaderName, Method};
use url::Url;

use super::{CorsConfig, CorsConfigError, DEFAULT_MAX_AGE};

/// Fluent construction of a validated [`CorsConfig`].
///
/// ```rust
/// use lambda_api::cors::CorsConfigBuilder;
/// use http::Method;
///
/// let cors = CorsConfigBuilder::new()
///     .allowed_origins(&["https://example.com"])
///     .allowed_methods(&[Method::GET, Method::POST])
///     .allowed_headers(&["Content-Type", "X-Custom-Header"])
///     .max_age(600)
///     .build()
///     .unwrap();
/// assert_eq!(cors.max_age, 600);
/// ```
#[derive(Debug, Clone)]
pub struct CorsConfigBuilder {
    allowed_origins: Vec<String>,
    allowed_methods: Vec<Method>,
    allowed_headers: Vec<String>,
    max_age: u32,
}

impl CorsConfigBuilder {
    /// Defaults: no origins, `GET, POST, PUT, DELETE, OPTIONS`,
    /// `Content-Type, Authorization`, max age 3000 seconds.
    pub fn new() -> Self {
        Self {
            allowed_origins: vec![],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn allowed_origins(mut self, origins: &[&str]) -> Self {
        self.allowed_origins = origins.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn allowed_methods(mut self, methods: &[Method]) -> Self {
        self.allowed_methods = methods.to_vec();
        self
    }

    pub fn allowed_headers(mut self, headers: &[&str]) -> Self {
        self.allowed_headers = headers.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Seconds a preflight answer may be cached.
    pub fn max_age(mut self, seconds: u32) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn build(self) -> Result<CorsConfig, CorsConfigError> {
        if self.allowed_origins.is_empty() {
            return Err(CorsConfigError::EmptyOrigins);
        }
        if let Some(origin) = self.allowed_origins.iter().find(|o| !is_valid_origin(o)) {
            return Err(CorsConfigError::InvalidOriginFormat {
                origin: origin.clone(),
            });
        }
        if let Some(header) = self
            .allowed_headers
            .iter()
            .find(|h| h.as_str() != "*" && HeaderName::from_bytes(h.as_bytes()).is_err())
        {
            return Err(CorsConfigError::InvalidHeaderName {
                header: header.clone(),
            });
        }

        Ok(CorsConfig {
            allow_origins: self.allowed_origins,
            allow_methods: self
                .allowed_methods
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            allow_headers: self.allowed_headers,
            max_age: self.max_age,
        })
    }
}

impl Default for CorsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_origin(origin: &str) -> bool {
    if origin == "*" {
        return true;
    }
    // Must be exactly what a browser sends in the Origin header.
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    url.has_host()
        && matches!(url.path(), "" | "/")
        && url.query().is_none()
        && url.fragment().is_none()
        && url.origin().ascii_serialization() == origin
}
