//! # lambda-api
//!
//! Typed request routing and validation for serverless HTTP handlers, with
//! OpenAPI documents generated from the same registrations.
//!
//! ## Overview
//!
//! Handlers are async functions whose argument and return types declare what
//! they accept and produce. Registering a handler compiles those declarations
//! into JSON Schema validators once; each invocation then runs a fixed
//! pipeline:
//!
//! ```mermaid
//! flowchart LR
//!     Event[Provider event] --> Adapter
//!     Adapter -->|ParsedRequest| App
//!     App -->|lookup path/method| Template[InvokeTemplate]
//!     Template -->|validate + bind| Handler
//!     Handler -->|output| Template
//!     Template -->|validate + dump| App
//!     App -->|Response| Adapter
//!     Adapter --> Reply[Provider reply]
//! ```
//!
//! ## Architecture
//!
//! - **[`message`]** - provider-neutral request and response values
//! - **[`typed`]** - handler argument extractors, return types and the `Handler` trait
//! - **[`validator`]** - model schemas, compiled validators and field errors
//! - **[`template`]** - per-handler invocation templates
//! - **[`router`]** - composable route groups
//! - **[`dispatcher`]** - the [`App`]: route table, dispatch and error mapping
//! - **[`generator`]** - OpenAPI document generation
//! - **[`adapters`]** - API Gateway event translation
//! - **[`cors`]**, **[`config`]**, **[`logging`]** - settings and observability
//!
//! ## Example
//!
//! ```rust
//! use lambda_api::typed::Params;
//! use lambda_api::{App, ParsedRequest, RouteConfig, Routes};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! async fn hello(Params(p): Params<Greeting>) -> anyhow::Result<String> {
//!     Ok(format!("Hello, {}", p.name))
//! }
//!
//! # futures::executor::block_on(async {
//! let mut app = App::builder().prefix("/api").build();
//! app.get("/hello", RouteConfig::new(), hello).unwrap();
//!
//! let request = ParsedRequest::new(http::Method::GET, "/hello").with_param("name", "World");
//! let response = app.run(&request).await;
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, "Hello, World");
//! # });
//! ```

pub mod adapters;
pub mod config;
pub mod cors;
pub mod dispatcher;
mod error;
pub mod generator;
pub mod ids;
pub mod json;
pub mod logging;
pub mod message;
pub mod router;
pub mod template;
pub mod typed;
pub mod validator;

pub use adapters::{AwsAdapter, Dispatch};
pub use config::{load_config, AppConfig};
pub use cors::CorsConfig;
pub use dispatcher::App;
pub use error::{ApiError, Error};
pub use generator::OpenApiGenerator;
pub use message::{ParsedRequest, Response};
pub use router::{RouteConfig, RouteEntry, Router, Routes, TagSpec};
pub use template::InvokeTemplate;
pub use validator::{FieldError, ValidationFailure};
