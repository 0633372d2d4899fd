//! # Generator Module
//!
//! Produces an OpenAPI document from the routes registered on an
//! [`App`](crate::App). Nothing is read from disk: the document is derived
//! from the same invocation templates the dispatcher uses, so it cannot drift
//! from what the handlers actually accept.
//!
//! ## Mapping
//!
//! ```text
//! Req<T>     -> header parameters from T::Headers, security from T::auth_scheme()
//! Params<T>  -> query parameters, one per property of T
//! Body<T>    -> requestBody referencing components.schemas.T
//! return R   -> responses.<status> referencing components.schemas.<R>
//! ```
//!
//! Paths are prefixed with the application prefix. Nested model definitions
//! end up in `components.schemas` and every `#/definitions/` reference is
//! rewritten to `#/components/schemas/`.

mod openapi;

pub use openapi::OpenApiGenerator;
