//! # CORS
//!
//! Preflight answers for applications behind an API gateway. The dispatcher
//! answers every `OPTIONS` request on a known path itself, with headers baked
//! once from a [`CorsConfig`] when the application is built.
//!
//! Values are emitted as configured: lists are comma-joined in order and no
//! per-request origin matching takes place.

mod builder;
mod error;

use std::collections::HashMap;

use serde::Deserialize;

pub use builder::CorsConfigBuilder;
pub use error::CorsConfigError;

pub(crate) const DEFAULT_MAX_AGE: u32 = 3000;

fn default_max_age() -> u32 {
    DEFAULT_MAX_AGE
}

/// Preflight response settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

impl CorsConfig {
    pub fn builder() -> CorsConfigBuilder {
        CorsConfigBuilder::new()
    }

    /// The fixed header map sent with every preflight response.
    pub fn bake_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "Access-Control-Allow-Origin".to_string(),
                self.allow_origins.join(","),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                self.allow_methods.join(","),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                self.allow_headers.join(","),
            ),
            ("Access-Control-Max-Age".to_string(), self.max_age.to_string()),
        ])
    }
}
