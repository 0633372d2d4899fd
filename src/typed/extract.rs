use std::fmt;

use serde_json::Value;

use super::request_model::RequestModel;
use crate::error::Error;
use crate::validator::{Model, ModelSchema, ValidationFailure};

/// The slice of the request an argument is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Decoded query parameters
    Params,
    /// Decoded JSON body
    Body,
    /// The whole request: headers, path, method, params and body
    Request,
}

impl ArgKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgKind::Params => "params",
            ArgKind::Body => "body",
            ArgKind::Request => "request",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters bound to `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Params<T>(pub T);

/// JSON body bound to `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Body<T>(pub T);

/// The composite request bound to `T`, usually [`Request`](super::Request).
#[derive(Debug, Clone, PartialEq)]
pub struct Req<T>(pub T);

/// Schemas of a composite request model.
#[derive(Debug, Clone)]
pub struct RequestSchema {
    pub model: ModelSchema,
    /// Schema of the `headers` field alone, used for documentation
    pub headers: ModelSchema,
    /// Security scheme name the request requires, if any
    pub auth: Option<&'static str>,
}

/// What a handler declares about its inputs and output.
///
/// Built once from the handler's signature when it is first registered.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub handler: &'static str,
    pub params: Option<ModelSchema>,
    pub body: Option<ModelSchema>,
    pub request: Option<RequestSchema>,
    pub response: Option<ModelSchema>,
}

impl Declaration {
    pub fn new(handler: &'static str) -> Self {
        Self {
            handler,
            params: None,
            body: None,
            request: None,
            response: None,
        }
    }

    fn claim<T>(
        slot: &mut Option<T>,
        value: T,
        handler: &'static str,
        kind: ArgKind,
    ) -> Result<(), Error> {
        if slot.is_some() {
            return Err(Error::DuplicateArgument { handler, kind });
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn set_params(&mut self, schema: ModelSchema) -> Result<(), Error> {
        Self::claim(&mut self.params, schema, self.handler, ArgKind::Params)
    }

    pub fn set_body(&mut self, schema: ModelSchema) -> Result<(), Error> {
        Self::claim(&mut self.body, schema, self.handler, ArgKind::Body)
    }

    pub fn set_request(&mut self, schema: RequestSchema) -> Result<(), Error> {
        Self::claim(&mut self.request, schema, self.handler, ArgKind::Request)
    }
}

/// Validated slices of a request, ready to be bound to handler arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    pub request: Option<Value>,
    pub params: Option<Value>,
    pub body: Option<Value>,
}

impl BoundArgs {
    /// Take the slice for `kind`; `null` when it was not prepared.
    pub fn take(&mut self, kind: ArgKind) -> Value {
        let slot = match kind {
            ArgKind::Params => &mut self.params,
            ArgKind::Body => &mut self.body,
            ArgKind::Request => &mut self.request,
        };
        slot.take().unwrap_or(Value::Null)
    }
}

/// A handler argument type.
pub trait Argument: Sized + Send + 'static {
    const KIND: ArgKind;

    /// Record this argument's schema in the handler declaration.
    fn declare(decl: &mut Declaration) -> Result<(), Error>;

    /// Construct the argument from its validated slice.
    fn bind(value: Value) -> Result<Self, ValidationFailure>;
}

fn construct<T: Model>(kind: ArgKind, value: Value) -> Result<T, ValidationFailure> {
    serde_json::from_value(value).map_err(|e| ValidationFailure::from_serde(kind.as_str(), &e))
}

impl<T: Model> Argument for Params<T> {
    const KIND: ArgKind = ArgKind::Params;

    fn declare(decl: &mut Declaration) -> Result<(), Error> {
        decl.set_params(ModelSchema::of::<T>()?)
    }

    fn bind(value: Value) -> Result<Self, ValidationFailure> {
        construct(Self::KIND, value).map(Params)
    }
}

impl<T: Model> Argument for Body<T> {
    const KIND: ArgKind = ArgKind::Body;

    fn declare(decl: &mut Declaration) -> Result<(), Error> {
        decl.set_body(ModelSchema::of::<T>()?)
    }

    fn bind(value: Value) -> Result<Self, ValidationFailure> {
        construct(Self::KIND, value).map(Body)
    }
}

impl<T: RequestModel> Argument for Req<T> {
    const KIND: ArgKind = ArgKind::Request;

    fn declare(decl: &mut Declaration) -> Result<(), Error> {
        decl.set_request(RequestSchema {
            model: ModelSchema::of::<T>()?,
            headers: ModelSchema::of::<T::Headers>()?,
            auth: T::auth_scheme(),
        })
    }

    fn bind(value: Value) -> Result<Self, ValidationFailure> {
        construct(Self::KIND, value).map(Req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_second_body_is_rejected() {
        let mut decl = Declaration::new("h");
        <Body<Item> as Argument>::declare(&mut decl).unwrap();
        let err = <Body<Item> as Argument>::declare(&mut decl).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateArgument {
                kind: ArgKind::Body,
                ..
            }
        ));
    }

    #[test]
    fn test_take_returns_null_for_missing_slice() {
        let mut args = BoundArgs {
            body: Some(json!({"name": "x"})),
            ..Default::default()
        };
        assert_eq!(args.take(ArgKind::Params), Value::Null);
        assert_eq!(args.take(ArgKind::Body), json!({"name": "x"}));
        assert_eq!(args.take(ArgKind::Body), Value::Null);
    }

    #[test]
    fn test_bind_failure_is_located_at_slice() {
        let err = <Body<Item> as Argument>::bind(json!({"name": 1})).unwrap_err();
        assert_eq!(err.errors()[0].loc, vec!["body"]);
    }
}
