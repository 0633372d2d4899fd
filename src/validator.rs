//! # Model validation
//!
//! Every declared handler input and output is a *model*: a type that can be
//! deserialized, serialized and described as JSON Schema. At registration time
//! each model is turned into a [`ModelSchema`] holding its generated schema
//! document and a compiled [`JSONSchema`] validator, so the dispatch path never
//! compiles schemas.
//!
//! Validation failures are collected into a [`ValidationFailure`], a list of
//! field-level [`FieldError`]s that is safe to hand back to the caller.

use std::fmt;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Anything usable as a handler input or output.
pub trait Model: Serialize + DeserializeOwned + JsonSchema + Send + 'static {}

impl<T> Model for T where T: Serialize + DeserializeOwned + JsonSchema + Send + 'static {}

/// One field-level problem.
///
/// `loc` is the path to the offending value, starting with the slice of the
/// request (or response) it was found in, e.g. `["body", "items", "0", "name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    fn from_schema_error(origin: &str, error: &ValidationError<'_>) -> Self {
        let mut loc = vec![origin.to_string()];
        loc.extend(split_pointer(&error.instance_path.to_string()));
        let kind = match &error.kind {
            ValidationErrorKind::Required { property } => {
                if let Some(name) = property.as_str() {
                    loc.push(name.to_string());
                }
                "missing"
            }
            ValidationErrorKind::Type { .. } => "type_error",
            ValidationErrorKind::AdditionalProperties { .. } => "extra_forbidden",
            ValidationErrorKind::Enum { .. } => "enum",
            _ => "value_error",
        };
        Self::new(loc, error.to_string(), kind)
    }
}

/// Split a JSON pointer (`/a/0/b~1c`) into unescaped segments.
fn split_pointer(pointer: &str) -> impl Iterator<Item = String> + '_ {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
}

/// A model-validation failure: one or more [`FieldError`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// A failure with a single error that has no finer location than `origin`.
    pub fn single(origin: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(vec![origin.to_string()], msg, kind)])
    }

    /// Wrap a `serde_json` construction error for the given slice.
    pub fn from_serde(origin: &str, err: &serde_json::Error) -> Self {
        Self::single(origin, err.to_string(), "value_error")
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error list as a JSON array.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.errors
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "loc": e.loc,
                        "msg": e.msg,
                        "type": e.kind,
                    })
                })
                .collect(),
        )
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for e in &self.errors {
            write!(f, "; {}: {}", e.loc.join("."), e.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

type CoerceFn = fn(Value) -> Result<Value, ValidationFailure>;

/// The compiled description of one model type.
///
/// Cloning is cheap: the validator is shared.
#[derive(Clone)]
pub struct ModelSchema {
    name: String,
    document: Value,
    validator: Arc<JSONSchema>,
    coerce: CoerceFn,
}

impl ModelSchema {
    /// Generate and compile the schema for `T`.
    pub fn of<T: Model>() -> Result<Self, Error> {
        let name = T::schema_name();
        let document = serde_json::to_value(schemars::schema_for!(T))?;
        let validator = JSONSchema::compile(&document).map_err(|e| Error::SchemaCompile {
            model: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            document,
            validator: Arc::new(validator),
            coerce: coerce_into::<T>,
        })
    }

    /// Model name; used as the component name in generated documents.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The generated JSON Schema, including any `definitions` side-table.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Validate `value`, reporting errors located under `origin`.
    pub fn validate(&self, origin: &str, value: &Value) -> Result<(), ValidationFailure> {
        match self.validator.validate(value) {
            Ok(()) => Ok(()),
            Err(errors) => Err(ValidationFailure::new(
                errors
                    .map(|e| FieldError::from_schema_error(origin, &e))
                    .collect(),
            )),
        }
    }

    /// Construct the model from `value` and dump it back to JSON.
    ///
    /// This applies serde defaults and renames, so the result is the model's
    /// canonical serialized form.
    pub fn coerce(&self, value: Value) -> Result<Value, ValidationFailure> {
        (self.coerce)(value)
    }

    /// Schema of a top-level property, resolving nothing.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.document.get("properties").and_then(|p| p.get(name))
    }

    /// Names listed in the top-level `required` array.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.document
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required().any(|r| r == name)
    }
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn coerce_into<T: Model>(value: Value) -> Result<Value, ValidationFailure> {
    let model: T =
        serde_json::from_value(value).map_err(|e| ValidationFailure::from_serde("response", &e))?;
    serde_json::to_value(model).map_err(|e| ValidationFailure::from_serde("response", &e))
}

/// Convert string query values into the JSON types the params model declares.
///
/// Providers hand over query parameters as strings. Properties typed
/// `integer`, `number`, `boolean` or `array` (comma separated) are converted
/// when the text parses; anything else is left as it came so validation can
/// report it.
pub fn coerce_query_params(params: &Map<String, Value>, schema: &ModelSchema) -> Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| {
            let converted = match value {
                Value::String(raw) => decode_param_value(raw, schema.property(key)),
                other => other.clone(),
            };
            (key.clone(), converted)
        })
        .collect()
}

/// The first non-null `type` of a property schema.
fn schema_type(schema: Option<&Value>) -> Option<&str> {
    match schema?.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn decode_param_value(value: &str, schema: Option<&Value>) -> Value {
    fn convert_primitive(val: &str, schema: Option<&Value>) -> Value {
        match schema_type(schema) {
            Some("integer") => val
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            Some("number") => val
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            Some("boolean") => val
                .parse::<bool>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            _ => Value::String(val.to_string()),
        }
    }

    match schema_type(schema) {
        Some("array") => {
            let items = schema.and_then(|s| s.get("items"));
            Value::Array(
                value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|p| convert_primitive(p.trim(), items))
                    .collect(),
            )
        }
        _ => convert_primitive(value, schema),
    }
}
