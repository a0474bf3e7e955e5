use http::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::dispatcher::{DispatchContext, Flow, Handler, HandlerResult};
use crate::request::Serializer;
use crate::router::{PathPattern, Route, RouteMatcher};

use super::{Hook, HookEvent};

/// Per-application configuration.
///
/// `Deserialize` so a server adapter can load it from its config file; all
/// fields default to unset, in which case the dispatcher's global defaults
/// apply (`text/html`, no charset, `text/plain` error rendering).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Content type applied when a response carries none
    pub default_content_type: Option<String>,
    /// Content type used when rendering synthesized 404/500 bodies
    pub error_content_type: Option<String>,
    /// Charset appended to content types that lack one
    pub charset: Option<String>,
}

/// A registered collection of routes, hooks, and configuration.
///
/// Created at startup and long-lived. The application carries no per-request
/// mutable state: everything scoped to one match attempt lives in the
/// [`DispatchContext`] the dispatcher threads through hooks and handlers, so
/// one `App` value can serve concurrent dispatches from multiple threads.
pub struct App {
    name: String,
    routes: HashMap<Method, Vec<Route>>,
    hooks: HashMap<HookEvent, Vec<Arc<dyn Hook>>>,
    serializer: Option<Arc<dyn Serializer>>,
    config: AppConfig,
}

impl App {
    /// Create an application with no routes, hooks, or serializer
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: HashMap::new(),
            hooks: HashMap::new(),
            serializer: None,
            config: AppConfig::default(),
        }
    }

    /// Application name, used in logs and synthesized errors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application's configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: AppConfig) {
        self.config = config;
    }

    /// The body deserialization engine, if one was bound
    #[must_use]
    pub fn serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.serializer.as_ref()
    }

    /// Bind a body deserialization engine
    pub fn set_serializer(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializer = Some(serializer);
    }

    /// Register a route under the given method.
    ///
    /// Routes are tried in registration order; the first match wins.
    pub fn route<M, H>(&mut self, method: Method, matcher: M, handler: H)
    where
        M: RouteMatcher + 'static,
        H: Handler + 'static,
    {
        let route = Route::new(method.clone(), Arc::new(matcher), Arc::new(handler));
        debug!(
            app = %self.name,
            method = %method,
            pattern = %route.pattern(),
            "Route registered"
        );
        self.routes.entry(method).or_default().push(route);
    }

    /// Register a `GET` route with a [`PathPattern`] matcher
    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&App, &mut DispatchContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::GET, PathPattern::new(pattern), handler);
    }

    /// Register a `POST` route with a [`PathPattern`] matcher
    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&App, &mut DispatchContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::POST, PathPattern::new(pattern), handler);
    }

    /// Register a `PUT` route with a [`PathPattern`] matcher
    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&App, &mut DispatchContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::PUT, PathPattern::new(pattern), handler);
    }

    /// Register a `DELETE` route with a [`PathPattern`] matcher
    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&App, &mut DispatchContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.route(Method::DELETE, PathPattern::new(pattern), handler);
    }

    /// Routes registered under the given method, in registration order
    #[must_use]
    pub fn routes_for(&self, method: &Method) -> &[Route] {
        self.routes.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Register a hook for the given event.
    ///
    /// Hooks of one event run in registration order.
    pub fn hook<H>(&mut self, event: HookEvent, hook: H)
    where
        H: Hook + 'static,
    {
        self.hooks.entry(event).or_default().push(Arc::new(hook));
    }

    /// Register a `before_request` hook
    pub fn before<F>(&mut self, hook: F)
    where
        F: Fn(&App, &mut DispatchContext) -> Result<(), Flow> + Send + Sync + 'static,
    {
        self.hook(HookEvent::BeforeRequest, hook);
    }

    /// Register an `after_request` hook
    pub fn after<F>(&mut self, hook: F)
    where
        F: Fn(&App, &mut DispatchContext) -> Result<(), Flow> + Send + Sync + 'static,
    {
        self.hook(HookEvent::AfterRequest, hook);
    }

    /// Register a `route_exception` hook
    pub fn on_exception<F>(&mut self, hook: F)
    where
        F: Fn(&App, &mut DispatchContext) -> Result<(), Flow> + Send + Sync + 'static,
    {
        self.hook(HookEvent::RouteException, hook);
    }

    /// Run all hooks registered for the event, in registration order.
    ///
    /// The first hook returning `Err` short-circuits the remainder.
    pub fn run_hooks(&self, event: &HookEvent, ctx: &mut DispatchContext) -> Result<(), Flow> {
        let Some(hooks) = self.hooks.get(event) else {
            return Ok(());
        };
        debug!(
            app = %self.name,
            event = ?event,
            hook_count = hooks.len(),
            "Running hooks"
        );
        for hook in hooks {
            hook.call(self, ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("route_count", &self.routes.values().map(Vec::len).sum::<usize>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
