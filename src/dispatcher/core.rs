use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use http::Method;
use serde_json::json;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::config::AppConfig;
use crate::cors::CorsConfig;
use crate::error::{ApiError, Error};
use crate::generator::OpenApiGenerator;
use crate::ids::RequestId;
use crate::logging::RedactionLevel;
use crate::message::{ParsedRequest, Response};
use crate::router::{RouteConfig, RouteEntry, Router, Routes, TagSpec};
use crate::template::InvokeTemplate;
use crate::typed::{HandlerRef, InvokeError};
use crate::validator::ValidationFailure;

/// A registered endpoint: the handler and its compiled template.
#[derive(Debug, Clone)]
pub struct Route {
    pub handler: HandlerRef,
    pub template: Arc<InvokeTemplate>,
    seq: u64,
}

/// The application: a flat route table plus dispatch settings.
///
/// Built once at cold start, then shared read-only across invocations.
#[derive(Debug)]
pub struct App {
    route_table: HashMap<String, HashMap<Method, Route>>,
    templates: HashMap<HandlerRef, Arc<InvokeTemplate>>,
    next_seq: u64,
    prefix: String,
    schema_id: Option<String>,
    cors: Option<CorsConfig>,
    common_response_headers: HashMap<String, String>,
    default_tags: Vec<String>,
    default_status: u16,
    redaction: RedactionLevel,
}

/// Settings for a new [`App`].
#[derive(Debug, Clone)]
pub struct AppBuilder {
    prefix: String,
    schema_id: Option<String>,
    cors: Option<CorsConfig>,
    tags: Vec<String>,
    default_status: u16,
    redaction: RedactionLevel,
}

impl AppBuilder {
    /// Path prefix shown in generated documents. Dispatch ignores it.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Identifier placed at the top of generated documents.
    pub fn schema_id(mut self, id: impl Into<String>) -> Self {
        self.schema_id = Some(id.into());
        self
    }

    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Tags for routes that do not choose their own.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Status for routes that do not choose their own.
    pub fn default_status(mut self, status: u16) -> Self {
        self.default_status = status;
        self
    }

    /// Masking applied when requests are written to error logs.
    pub fn redaction(mut self, level: RedactionLevel) -> Self {
        self.redaction = level;
        self
    }

    pub fn build(self) -> App {
        let common_response_headers = self
            .cors
            .as_ref()
            .map(CorsConfig::bake_headers)
            .unwrap_or_default();
        App {
            route_table: HashMap::new(),
            templates: HashMap::new(),
            next_seq: 0,
            prefix: self.prefix,
            schema_id: self.schema_id,
            cors: self.cors,
            common_response_headers,
            default_tags: self.tags,
            default_status: self.default_status,
            redaction: self.redaction,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            schema_id: None,
            cors: None,
            tags: Vec::new(),
            default_status: 200,
            redaction: RedactionLevel::default(),
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    pub fn from_config(config: AppConfig) -> Self {
        let mut builder = Self::builder()
            .prefix(config.prefix)
            .tags(config.tags)
            .default_status(config.default_status)
            .redaction(config.redact_level);
        if let Some(id) = config.schema_id {
            builder = builder.schema_id(id);
        }
        if let Some(cors) = config.cors {
            builder = builder.cors(cors);
        }
        builder.build()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    pub fn cors(&self) -> Option<&CorsConfig> {
        self.cors.as_ref()
    }

    pub fn redaction(&self) -> RedactionLevel {
        self.redaction
    }

    pub fn default_tags(&self) -> &[String] {
        &self.default_tags
    }

    /// Headers sent with preflight responses.
    pub fn common_response_headers(&self) -> &HashMap<String, String> {
        &self.common_response_headers
    }

    pub fn route(&self, path: &str, method: &Method) -> Option<&Route> {
        self.route_table.get(path)?.get(method)
    }

    /// All `(path, method, route)` registrations, oldest first.
    ///
    /// A replaced route counts from the time it was replaced.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Method, &Route)> {
        let mut routes: Vec<_> = self
            .route_table
            .iter()
            .flat_map(|(path, methods)| {
                methods
                    .iter()
                    .map(move |(method, route)| (path.as_str(), method, route))
            })
            .collect();
        routes.sort_by_key(|(_, _, route)| route.seq);
        routes.into_iter()
    }

    /// The OpenAPI document for every registered route.
    pub fn get_schema(&self) -> Result<serde_json::Value, Error> {
        OpenApiGenerator::new(self).get_schema()
    }

    fn resolve_tags(&self, spec: TagSpec) -> Vec<String> {
        match spec {
            TagSpec::Inherit => self.default_tags.clone(),
            TagSpec::Suppress => Vec::new(),
            TagSpec::Explicit(tags) => tags,
        }
    }

    /// The cached template for `handler`, or a fresh one built from `config`.
    ///
    /// Nothing is stored until [`App::insert_route`].
    fn compile(
        &self,
        handler: &HandlerRef,
        config: RouteConfig,
    ) -> Result<Arc<InvokeTemplate>, Error> {
        if let Some(template) = self.templates.get(handler) {
            return Ok(Arc::clone(template));
        }
        let decl = handler.declare()?;
        Ok(Arc::new(InvokeTemplate::new(
            decl,
            config.status.unwrap_or(self.default_status),
            self.resolve_tags(config.tags),
            config.description,
        )))
    }

    fn insert_route(
        &mut self,
        handler: HandlerRef,
        path: &str,
        method: Method,
        template: Arc<InvokeTemplate>,
    ) {
        let template = Arc::clone(self.templates.entry(handler.clone()).or_insert(template));
        let seq = self.next_seq;
        self.next_seq += 1;
        let handler_name = handler.name();
        let previous = self
            .route_table
            .entry(path.to_string())
            .or_default()
            .insert(method.clone(), Route { handler, template, seq });

        if let Some(previous) = previous {
            warn!(
                path,
                %method,
                replaced = previous.handler.name(),
                handler = handler_name,
                "Replaced existing route"
            );
        } else {
            debug!(path, %method, handler = handler_name, "Route registered");
        }
    }

    /// Dispatch one request.
    ///
    /// Never fails: every outcome, including handler panics, is a [`Response`].
    pub async fn run(&self, request: &ParsedRequest) -> Response {
        let request_id = RequestId::from_header_or_new(request.header("x_request_id"));
        let span = info_span!(
            "lambda_api.dispatch",
            %request_id,
            method = %request.method,
            path = %request.path,
        );
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: &ParsedRequest) -> Response {
        let Some(endpoint) = self.route_table.get(&request.path) else {
            debug!("No route for path");
            return Response::not_found();
        };

        if request.method == Method::OPTIONS {
            return Response::new(200, serde_json::Value::Null)
                .with_headers(self.common_response_headers.clone());
        }

        match endpoint.get(&request.method) {
            Some(route) => self.run_endpoint(route, request).await,
            None => {
                debug!("Method not registered for path");
                Response::method_not_allowed()
            }
        }
    }

    async fn run_endpoint(&self, route: &Route, request: &ParsedRequest) -> Response {
        let args = match route.template.prepare_args(request) {
            Ok(args) => args,
            Err(failure) => {
                debug!(handler = route.handler.name(), error = %failure, "Request validation failed");
                return bad_request(&failure);
            }
        };

        // Calling inside the future keeps panics raised before the first poll catchable.
        let outcome = AssertUnwindSafe(async { route.handler.call(args).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(output)) => match route.template.prepare_response(output) {
                Ok(response) => response,
                Err(failure) => {
                    error!(
                        handler = route.handler.name(),
                        request = %request.redacted(self.redaction),
                        error = %failure,
                        "Response data is invalid"
                    );
                    Response::internal_error()
                }
            },
            Ok(Err(InvokeError::Input(failure))) => bad_request(&failure),
            Ok(Err(InvokeError::Handler(err))) => match err.downcast_ref::<ApiError>() {
                Some(api) => Response::error(api.status(), api.message()),
                None => {
                    error!(
                        handler = route.handler.name(),
                        request = %request.redacted(self.redaction),
                        error = ?err,
                        "Unhandled exception"
                    );
                    Response::internal_error()
                }
            },
            Err(panic) => {
                error!(
                    handler = route.handler.name(),
                    request = %request.redacted(self.redaction),
                    panic_message = %panic_message(panic.as_ref()),
                    "Handler panicked"
                );
                Response::internal_error()
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn bad_request(failure: &ValidationFailure) -> Response {
    Response::raw(400, json!({ "error": failure.to_json() }).to_string())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Routes for App {
    fn add_route(
        &mut self,
        handler: HandlerRef,
        path: &str,
        method: Method,
        config: RouteConfig,
    ) -> Result<(), Error> {
        let template = self.compile(&handler, config)?;
        self.insert_route(handler, path, method, template);
        Ok(())
    }

    fn get_routes(&self, root: &str) -> Box<dyn Iterator<Item = RouteEntry> + '_> {
        let root = root.to_string();
        Box::new(self.routes().map(move |(path, method, route)| RouteEntry {
            handler: route.handler.clone(),
            path: format!("{root}{path}"),
            method: method.clone(),
            config: RouteConfig {
                status: Some(route.template.status),
                tags: TagSpec::Explicit(route.template.tags.clone()),
                description: route.template.description.clone(),
            },
        }))
    }

    /// Mount every route of `router`, or none of them if any handler fails
    /// to compile.
    fn add_router(&mut self, router: Router) -> Result<(), Error> {
        let mut compiled: HashMap<HandlerRef, Arc<InvokeTemplate>> = HashMap::new();
        let mut staged = Vec::new();
        for entry in router.get_routes("") {
            let template = match compiled.get(&entry.handler) {
                Some(template) => Arc::clone(template),
                None => {
                    let template = self.compile(&entry.handler, entry.config)?;
                    compiled.insert(entry.handler.clone(), Arc::clone(&template));
                    template
                }
            };
            staged.push((entry.handler, entry.path, entry.method, template));
        }

        for (handler, path, method, template) in staged {
            self.insert_route(handler, &path, method, template);
        }
        Ok(())
    }
}
