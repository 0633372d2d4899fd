use std::marker::PhantomData;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::validator::{Model, ModelSchema};

/// Single-field wrapper giving non-structured return types a named schema.
///
/// Serializes exactly like `T`; its schema is `T`'s schema titled `Root_<T>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root<T>(pub T);

impl<T: JsonSchema> JsonSchema for Root<T> {
    fn schema_name() -> String {
        format!("Root_{}", T::schema_name())
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        T::json_schema(gen)
    }
}

/// A structured model returned as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

/// A non-structured value, documented and validated through [`Root`].
#[derive(Debug, Clone, PartialEq)]
pub struct Plain<T>(pub T);

/// An untyped value that must validate against `T` before it is sent.
///
/// Validation happens after the handler returns; a mismatch is a handler
/// bug and answers 500.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerce<T> {
    value: Value,
    _model: PhantomData<fn() -> T>,
}

impl<T> Coerce<T> {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            _model: PhantomData,
        }
    }
}

/// What a handler produced, before the response contract is applied.
#[derive(Debug)]
pub enum HandlerOutput {
    /// The handler declares no response body.
    Empty,
    /// A typed value, already dumped.
    Dumped(Result<Value, serde_json::Error>),
    /// A raw value still to be validated.
    Untyped(Value),
}

/// Handler return types.
pub trait Reply: Send + 'static {
    /// Schema of the response body, if one is declared.
    fn declare() -> Result<Option<ModelSchema>, Error>;

    fn into_output(self) -> HandlerOutput;
}

impl Reply for () {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        Ok(None)
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Empty
    }
}

impl<T: Model> Reply for Json<T> {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        ModelSchema::of::<T>().map(Some)
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Dumped(serde_json::to_value(self.0))
    }
}

impl<T: Model> Reply for Plain<T> {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        ModelSchema::of::<Root<T>>().map(Some)
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Dumped(serde_json::to_value(self.0))
    }
}

impl<T: Model> Reply for Coerce<T> {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        ModelSchema::of::<T>().map(Some)
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Untyped(self.value)
    }
}

macro_rules! plain_reply {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reply for $ty {
                fn declare() -> Result<Option<ModelSchema>, Error> {
                    <Plain<$ty> as Reply>::declare()
                }

                fn into_output(self) -> HandlerOutput {
                    Plain(self).into_output()
                }
            }
        )*
    };
}

plain_reply!(String, bool, i32, i64, u32, u64, f32, f64, Value);

impl<T: Model> Reply for Vec<T> {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        <Plain<Vec<T>> as Reply>::declare()
    }

    fn into_output(self) -> HandlerOutput {
        Plain(self).into_output()
    }
}

impl<T: Model> Reply for Option<T> {
    fn declare() -> Result<Option<ModelSchema>, Error> {
        <Plain<Option<T>> as Reply>::declare()
    }

    fn into_output(self) -> HandlerOutput {
        Plain(self).into_output()
    }
}
