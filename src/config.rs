//! Application settings from a file and the environment.
//!
//! ```yaml
//! prefix: /api
//! schema_id: orders
//! tags: [orders]
//! default_status: 200
//! redact_level: credentials
//! cors:
//!   allow_origins: ["https://shop.example"]
//!   allow_methods: [GET, POST]
//!   allow_headers: [Content-Type, Authorization]
//!   max_age: 600
//! ```
//!
//! Every field is optional. `LAMBDA_API_PREFIX`, `LAMBDA_API_SCHEMA_ID` and
//! `LAMBDA_API_LOG_REDACT_LEVEL` override the file when
//! [`AppConfig::with_env_overrides`] is applied.

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::cors::CorsConfig;
use crate::error::Error;
use crate::logging::RedactionLevel;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix shown in generated documents
    pub prefix: String,
    pub schema_id: Option<String>,
    /// Default route tags
    pub tags: Vec<String>,
    pub default_status: u16,
    pub cors: Option<CorsConfig>,
    pub redact_level: RedactionLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            schema_id: None,
            tags: Vec::new(),
            default_status: 200,
            cors: None,
            redact_level: RedactionLevel::default(),
        }
    }
}

impl AppConfig {
    /// Apply `LAMBDA_API_PREFIX`, `LAMBDA_API_SCHEMA_ID` and
    /// `LAMBDA_API_LOG_REDACT_LEVEL` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(prefix) = env::var("LAMBDA_API_PREFIX") {
            self.prefix = prefix;
        }
        if let Ok(id) = env::var("LAMBDA_API_SCHEMA_ID") {
            self.schema_id = Some(id).filter(|id| !id.is_empty());
        }
        if let Ok(level) = env::var("LAMBDA_API_LOG_REDACT_LEVEL") {
            self.redact_level = RedactionLevel::parse(&level);
        }
        self
    }
}

/// Read an [`AppConfig`] from YAML (`.yaml`, `.yml`) or JSON.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, Error> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        source: source.clone(),
        message: e.to_string(),
    })?;
    parse_config(&content, is_yaml(path)).map_err(|message| Error::Config { source, message })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_config(content: &str, yaml: bool) -> Result<AppConfig, String> {
    if yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}
