//! # Invocation templates
//!
//! An [`InvokeTemplate`] is what the dispatcher knows about one handler: the
//! schemas of its declared inputs and output, the status it answers with, its
//! tags and its description. It is compiled once, the first time the handler
//! is registered, and shared by every route pointing at that handler.

use serde_json::Value;

use crate::message::{ParsedRequest, Response};
use crate::typed::{BoundArgs, Declaration, HandlerOutput, RequestSchema};
use crate::validator::{coerce_query_params, ModelSchema, ValidationFailure};

#[derive(Debug, Clone)]
pub struct InvokeTemplate {
    pub params: Option<ModelSchema>,
    pub body: Option<ModelSchema>,
    pub request: Option<RequestSchema>,
    pub response: Option<ModelSchema>,
    pub status: u16,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl InvokeTemplate {
    pub fn new(
        decl: Declaration,
        status: u16,
        tags: Vec<String>,
        description: Option<String>,
    ) -> Self {
        let mut unique = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self {
            params: decl.params,
            body: decl.body,
            request: decl.request,
            response: decl.response,
            status,
            tags: unique,
            description,
        }
    }

    /// Validate the declared slices of `request` and collect them for binding.
    ///
    /// Slices are checked in the order request, params, body; the first
    /// failing slice is reported.
    pub fn prepare_args(&self, request: &ParsedRequest) -> Result<BoundArgs, ValidationFailure> {
        let mut args = BoundArgs::default();

        if let Some(schema) = &self.request {
            let composite = request.to_composite();
            schema.model.validate("request", &composite)?;
            args.request = Some(composite);
        }

        if let Some(schema) = &self.params {
            let params = Value::Object(coerce_query_params(&request.params, schema));
            schema.validate("params", &params)?;
            args.params = Some(params);
        }

        if let Some(schema) = &self.body {
            let body = request
                .body
                .clone()
                .map(Value::Object)
                .unwrap_or(Value::Null);
            schema.validate("body", &body)?;
            args.body = Some(body);
        }

        Ok(args)
    }

    /// Apply the response contract to what the handler produced.
    ///
    /// Without a declared response model the body is always `null`. A failure
    /// here means the handler broke its own contract.
    pub fn prepare_response(&self, output: HandlerOutput) -> Result<Response, ValidationFailure> {
        let Some(schema) = &self.response else {
            return Ok(Response::new(self.status, Value::Null));
        };

        let body = match output {
            HandlerOutput::Dumped(Ok(value)) => value,
            HandlerOutput::Dumped(Err(err)) => {
                return Err(ValidationFailure::from_serde("response", &err))
            }
            HandlerOutput::Untyped(value) => {
                schema.validate("response", &value)?;
                schema.coerce(value)?
            }
            HandlerOutput::Empty => {
                schema.validate("response", &Value::Null)?;
                Value::Null
            }
        };
        Ok(Response::new(self.status, body))
    }
}
