use std::sync::atomic::{AtomicU64, Ordering};

use http::Method;
use tracing::debug;

use crate::error::Error;
use crate::typed::{Handler, HandlerRef};

/// How a route picks its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagSpec {
    /// Use the enclosing router's tags, or the application defaults.
    #[default]
    Inherit,
    /// No tags, even if defaults exist.
    Suppress,
    /// Exactly these tags.
    Explicit(Vec<String>),
}

/// Per-route options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteConfig {
    /// Status of successful responses; the application default when unset
    pub status: Option<u16>,
    pub tags: TagSpec,
    /// Operation description for generated documents
    pub description: Option<String>,
}

impl RouteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = TagSpec::Explicit(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn no_tags(mut self) -> Self {
        self.tags = TagSpec::Suppress;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One `(path, method)` registration as yielded by [`Routes::get_routes`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub handler: HandlerRef,
    pub path: String,
    pub method: Method,
    pub config: RouteConfig,
}

/// Anything routes can be registered on: a [`Router`] or an
/// [`App`](crate::App).
pub trait Routes {
    /// Register `handler` for `(path, method)`, replacing any previous entry.
    fn add_route(
        &mut self,
        handler: HandlerRef,
        path: &str,
        method: Method,
        config: RouteConfig,
    ) -> Result<(), Error>;

    /// Every registration, with `root` prepended to each path.
    ///
    /// The iterator is lazy; calling again restarts the walk.
    fn get_routes(&self, root: &str) -> Box<dyn Iterator<Item = RouteEntry> + '_>;

    /// Include all routes of `router`.
    fn add_router(&mut self, router: Router) -> Result<(), Error>;

    fn route<H, Args>(
        &mut self,
        method: Method,
        path: &str,
        config: RouteConfig,
        handler: H,
    ) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.add_route(HandlerRef::new(handler), path, method, config)
    }

    fn get<H, Args>(&mut self, path: &str, config: RouteConfig, handler: H) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.route(Method::GET, path, config, handler)
    }

    fn post<H, Args>(&mut self, path: &str, config: RouteConfig, handler: H) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.route(Method::POST, path, config, handler)
    }

    fn put<H, Args>(&mut self, path: &str, config: RouteConfig, handler: H) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.route(Method::PUT, path, config, handler)
    }

    fn patch<H, Args>(&mut self, path: &str, config: RouteConfig, handler: H) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.route(Method::PATCH, path, config, handler)
    }

    fn delete<H, Args>(&mut self, path: &str, config: RouteConfig, handler: H) -> Result<(), Error>
    where
        H: Handler<Args>,
        Args: 'static,
        Self: Sized,
    {
        self.route(Method::DELETE, path, config, handler)
    }
}

static NEXT_ROUTER_ID: AtomicU64 = AtomicU64::new(1);

/// A composable group of routes sharing a base path and default tags.
///
/// Routers only record registrations. Handler signatures are compiled when
/// the router is mounted on an [`App`](crate::App), so a bad signature is
/// reported by `App::add_router`.
///
/// Clones keep the identity of the original: adding a clone next to its
/// original replaces it instead of duplicating the routes.
#[derive(Debug, Clone)]
pub struct Router {
    id: u64,
    base: String,
    tags: Vec<String>,
    routes: Vec<(String, Vec<(Method, HandlerRef, RouteConfig)>)>,
    routers: Vec<Router>,
}

impl Router {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            id: NEXT_ROUTER_ID.fetch_add(1, Ordering::Relaxed),
            base: base.into(),
            tags: Vec::new(),
            routes: Vec::new(),
            routers: Vec::new(),
        }
    }

    /// Tags given to every route that does not choose its own.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn contains(&self, id: u64) -> bool {
        self.id == id || self.routers.iter().any(|r| r.contains(id))
    }

    fn walk<'a>(
        &'a self,
        root: &str,
        inherited: &[String],
    ) -> Box<dyn Iterator<Item = RouteEntry> + 'a> {
        let base = format!("{root}{}", self.base);
        let tags = if self.tags.is_empty() {
            inherited.to_vec()
        } else {
            self.tags.clone()
        };

        let own_base = base.clone();
        let own_tags = tags.clone();
        let own = self.routes.iter().flat_map(move |(path, methods)| {
            let full = format!("{own_base}{path}");
            let tags = own_tags.clone();
            methods.iter().map(move |(method, handler, config)| {
                let mut config = config.clone();
                if config.tags == TagSpec::Inherit && !tags.is_empty() {
                    config.tags = TagSpec::Explicit(tags.clone());
                }
                RouteEntry {
                    handler: handler.clone(),
                    path: full.clone(),
                    method: method.clone(),
                    config,
                }
            })
        });

        let nested = self
            .routers
            .iter()
            .flat_map(move |router| router.walk(&base, &tags));

        Box::new(own.chain(nested))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("")
    }
}

impl Routes for Router {
    fn add_route(
        &mut self,
        handler: HandlerRef,
        path: &str,
        method: Method,
        config: RouteConfig,
    ) -> Result<(), Error> {
        debug!(base = %self.base, path, %method, handler = handler.name(), "Route recorded");
        let idx = match self.routes.iter().position(|(p, _)| p == path) {
            Some(idx) => idx,
            None => {
                self.routes.push((path.to_string(), Vec::new()));
                self.routes.len() - 1
            }
        };
        let methods = &mut self.routes[idx].1;
        match methods.iter_mut().find(|(m, _, _)| *m == method) {
            Some(entry) => *entry = (method, handler, config),
            None => methods.push((method, handler, config)),
        }
        Ok(())
    }

    fn get_routes(&self, root: &str) -> Box<dyn Iterator<Item = RouteEntry> + '_> {
        self.walk(root, &[])
    }

    fn add_router(&mut self, router: Router) -> Result<(), Error> {
        if router.id == self.id {
            return Err(Error::SelfComposition);
        }
        if router.contains(self.id) {
            return Err(Error::CyclicComposition { base: router.base });
        }
        match self.routers.iter_mut().find(|r| r.id == router.id) {
            Some(existing) => *existing = router,
            None => self.routers.push(router),
        }
        Ok(())
    }
}
