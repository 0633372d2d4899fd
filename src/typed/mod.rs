//! # Typed handlers
//!
//! Handlers are plain async functions. Their argument types say which part of
//! the request they want, and their return type says what they answer with:
//!
//! ```rust
//! use lambda_api::typed::{Body, Json, Params};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! struct PetQuery {
//!     species: Option<String>,
//! }
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! struct Pet {
//!     name: String,
//! }
//!
//! async fn create_pet(Body(pet): Body<Pet>, Params(_q): Params<PetQuery>) -> anyhow::Result<Json<Pet>> {
//!     Ok(Json(pet))
//! }
//! ```
//!
//! ## Arguments
//!
//! - [`Params<T>`] - decoded query parameters
//! - [`Body<T>`] - decoded JSON body
//! - [`Req<T>`] - the composite request ([`Request`], [`BearerAuthRequest`])
//!
//! Each kind may appear at most once. The types are inspected when the handler
//! is registered and compiled into an invocation template; nothing is
//! reflected per request.
//!
//! ## Return types
//!
//! - `()` - no body
//! - [`Json<T>`] - a structured model
//! - `String`, numbers, `bool`, `Vec<T>`, `Option<T>`, [`Plain<T>`] - documented
//!   through the [`Root`] wrapper
//! - [`Coerce<T>`] - an untyped value validated against `T` after the fact
//!
//! Errors travel as `anyhow::Error`; return an [`ApiError`](crate::ApiError)
//! to choose the status code.

mod core;
mod extract;
mod reply;
mod request_model;

pub use self::core::{Handler, HandlerRef, InvokeError};
pub use extract::{ArgKind, Argument, Body, BoundArgs, Declaration, Params, Req, RequestSchema};
pub use reply::{Coerce, HandlerOutput, Json, Plain, Reply, Root};
pub use request_model::{BearerAuthHeaders, BearerAuthRequest, Request, RequestModel};
