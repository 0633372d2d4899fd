//! Normalized request and response values.
//!
//! Adapters translate provider events into a [`ParsedRequest`] and turn the
//! [`Response`] produced by the dispatcher back into the provider's reply
//! shape. Neither type knows anything about a particular provider.

mod request;
mod response;

pub use request::{ParsedRequest, Redacted};
pub use response::Response;
