//! Registration-time and declared API errors.
//!
//! [`Error`] is returned by everything that builds an [`App`](crate::App) or a
//! [`Router`](crate::Router): compiling invocation templates, composing routers,
//! loading configuration. It never crosses the dispatch boundary.
//!
//! [`ApiError`] is the other direction: handlers return it (through
//! `anyhow::Error`) to answer with their own status code and message.

use std::fmt;

use crate::typed::ArgKind;

/// Errors raised while assembling an application.
#[derive(Debug)]
pub enum Error {
    /// A handler declared two arguments of the same kind.
    DuplicateArgument {
        /// Type name of the offending handler
        handler: &'static str,
        /// The argument kind declared twice
        kind: ArgKind,
    },
    /// A model's generated JSON Schema could not be compiled into a validator.
    SchemaCompile {
        /// Model name as reported by its schema
        model: String,
        /// Compiler message
        message: String,
    },
    /// A router was added to itself.
    SelfComposition,
    /// Adding the router would make the composition graph cyclic.
    CyclicComposition {
        /// Base path of the router being added
        base: String,
    },
    /// Configuration could not be read or parsed.
    Config {
        /// Source of the configuration (file path or variable name)
        source: String,
        /// Underlying message
        message: String,
    },
    /// A JSON document could not be produced.
    Serialization(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateArgument { handler, kind } => write!(
                f,
                "handler '{handler}' declares more than one {kind} argument"
            ),
            Error::SchemaCompile { model, message } => {
                write!(f, "failed to compile schema for model '{model}': {message}")
            }
            Error::SelfComposition => write!(f, "cannot add router to itself"),
            Error::CyclicComposition { base } => write!(
                f,
                "adding router with base '{base}' would create a composition cycle"
            ),
            Error::Config { source, message } => {
                write!(f, "invalid configuration in {source}: {message}")
            }
            Error::Serialization(err) => write!(f, "serialization failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err)
    }
}

/// A business error a handler raises deliberately.
///
/// The dispatcher recognises it by downcasting the handler's `anyhow::Error`
/// and answers with `status` and `{"error": message}`. Any other error type is
/// treated as unhandled and becomes a generic 500.
///
/// ```
/// use lambda_api::ApiError;
///
/// async fn lookup(id: u64) -> anyhow::Result<String> {
///     if id == 0 {
///         return Err(ApiError::not_found("no such item").into());
///     }
///     Ok(format!("item {id}"))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: u16,
    message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, message)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
