use std::any::TypeId;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use super::extract::{Argument, BoundArgs, Declaration};
use super::reply::{HandlerOutput, Reply};
use crate::error::Error;
use crate::validator::ValidationFailure;

/// Why a handler invocation did not produce output.
#[derive(Debug)]
pub enum InvokeError {
    /// An argument could not be constructed from its slice.
    Input(ValidationFailure),
    /// The handler returned an error.
    Handler(anyhow::Error),
}

/// An async function usable as an endpoint.
///
/// Implemented for every `Fn(A1, .., An) -> impl Future<Output =
/// anyhow::Result<R>>` with up to three [`Argument`]s and an `R: Reply`.
/// `Args` is the argument tuple and only serves to keep the impls apart.
pub trait Handler<Args>: Send + Sync + 'static {
    /// Inspect the signature: which arguments and which response it declares.
    fn declare() -> Result<Declaration, Error>;

    fn call(&self, args: BoundArgs) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>>;
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, R, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
            R: Reply,
            $($ty: Argument,)*
        {
            fn declare() -> Result<Declaration, Error> {
                let mut decl = Declaration::new(std::any::type_name::<F>());
                $($ty::declare(&mut decl)?;)*
                decl.response = R::declare()?;
                Ok(decl)
            }

            fn call(
                &self,
                mut args: BoundArgs,
            ) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>> {
                $(
                    let $ty = match $ty::bind(args.take($ty::KIND)) {
                        Ok(value) => value,
                        Err(failure) => return future::ready(Err(InvokeError::Input(failure))).boxed(),
                    };
                )*
                let fut = (self)($($ty),*);
                async move {
                    fut.await
                        .map(Reply::into_output)
                        .map_err(InvokeError::Handler)
                }
                .boxed()
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);

/// Object-safe view of a [`Handler`].
trait Endpoint: Send + Sync + 'static {
    fn declare(&self) -> Result<Declaration, Error>;

    fn call(&self, args: BoundArgs) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>>;
}

struct FnEndpoint<H, Args> {
    handler: H,
    _args: PhantomData<fn() -> Args>,
}

impl<H, Args> Endpoint for FnEndpoint<H, Args>
where
    H: Handler<Args>,
    Args: 'static,
{
    fn declare(&self) -> Result<Declaration, Error> {
        H::declare()
    }

    fn call(&self, args: BoundArgs) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>> {
        self.handler.call(args)
    }
}

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a handler value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HandlerId {
    /// A zero-sized function item or non-capturing closure: all values of the
    /// type are the same handler.
    Item(TypeId),
    /// A value carrying state, e.g. a capturing closure; unique per `new`.
    Instance(u64),
}

impl HandlerId {
    fn of<H: 'static>() -> Self {
        if mem::size_of::<H>() == 0 {
            HandlerId::Item(TypeId::of::<H>())
        } else {
            HandlerId::Instance(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
        }
    }
}

/// A registered handler.
///
/// Registering the same function on several routes yields equal references,
/// so they share one invocation template. Handlers that carry state, such as
/// closures built by a factory, are distinct per [`HandlerRef::new`] call;
/// clones of one reference stay equal.
#[derive(Clone)]
pub struct HandlerRef {
    id: HandlerId,
    name: &'static str,
    endpoint: Arc<dyn Endpoint>,
}

impl HandlerRef {
    pub fn new<H, Args>(handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        Self {
            id: HandlerId::of::<H>(),
            name: std::any::type_name::<H>(),
            endpoint: Arc::new(FnEndpoint {
                handler,
                _args: PhantomData,
            }),
        }
    }

    /// Fully qualified type name of the handler, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declare(&self) -> Result<Declaration, Error> {
        self.endpoint.declare()
    }

    pub fn call(&self, args: BoundArgs) -> BoxFuture<'static, Result<HandlerOutput, InvokeError>> {
        self.endpoint.call(args)
    }
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandlerRef {}

impl Hash for HandlerRef {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerRef").field(&self.name).finish()
    }
}
