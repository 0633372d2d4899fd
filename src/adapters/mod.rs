//! Provider adapters.
//!
//! An adapter owns everything provider specific: reading the event into a
//! [`ParsedRequest`], handing it to something that can [`Dispatch`] it and
//! encoding the [`Response`] the way the provider expects.

mod aws;

use futures::future::{BoxFuture, FutureExt};

use crate::dispatcher::App;
use crate::message::{ParsedRequest, Response};

pub use aws::{AdapterError, AwsAdapter};

/// Something that answers normalized requests.
pub trait Dispatch: Send + Sync {
    fn dispatch<'a>(&'a self, request: &'a ParsedRequest) -> BoxFuture<'a, Response>;
}

impl Dispatch for App {
    fn dispatch<'a>(&'a self, request: &'a ParsedRequest) -> BoxFuture<'a, Response> {
        self.run(request).boxed()
    }
}

impl<D: Dispatch + ?Sized> Dispatch for std::sync::Arc<D> {
    fn dispatch<'a>(&'a self, request: &'a ParsedRequest) -> BoxFuture<'a, Response> {
        (**self).dispatch(request)
    }
}
