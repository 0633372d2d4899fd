//! # Dispatcher Module
//!
//! [`App`] owns the route table and turns a [`ParsedRequest`] into a
//! [`Response`].
//!
//! ## Request Flow
//!
//! ```text
//! path unknown ............................ 404 {"error": "Not Found"}
//! OPTIONS on a known path ................. 200, CORS headers, no body
//! method registered for path
//!   prepare_args fails .................... 400, raw {"error": [field errors]}
//!   handler returns ApiError .............. its status, {"error": message}
//!   handler errors or panics .............. 500, logged
//!   prepare_response fails ................ 500, logged
//!   otherwise ............................. template status, dumped body
//! method not registered ................... 405 {"error": "Method Not Allowed"}
//! ```
//!
//! Caller mistakes are answered in detail; handler failures are logged with
//! the (redacted) request and answered with a generic
//! `{"error": "Internal Server Error"}`.
//!
//! ## Registration
//!
//! ```rust
//! use lambda_api::{App, RouteConfig, Routes};
//!
//! async fn health() -> anyhow::Result<String> {
//!     Ok("ok".into())
//! }
//!
//! let mut app = App::builder().prefix("/api").tags(["ops"]).build();
//! app.get("/health", RouteConfig::new(), health).unwrap();
//! ```
//!
//! The first registration of a handler compiles its invocation template; the
//! status, tags and description of that first registration stick to the
//! handler wherever else it is mounted.
//!
//! [`ParsedRequest`]: crate::ParsedRequest
//! [`Response`]: crate::Response

mod core;

pub use self::core::{App, AppBuilder, Route};
