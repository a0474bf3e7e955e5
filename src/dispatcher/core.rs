//! Dispatcher core module - hot path for request dispatch.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::app::{App, HookEvent};
use crate::request::{build_request, RawEnv, Request};
use crate::response::{Response, DEFAULT_CONTENT_TYPE};
use crate::router::Route;

use super::{DispatchContext, DispatchError, Flow, HandlerOutput, RouteOutcome, Session};

/// Orchestrates the match → hook → execute → error-handle cycle across one
/// or more applications.
///
/// Applications are tried in registration order; within an application,
/// routes registered under the request's method are tried in registration
/// order; the first match wins. The dispatcher itself holds no per-request
/// state, so one instance can serve concurrent dispatches.
#[derive(Clone, Default)]
pub struct Dispatcher {
    apps: Vec<Arc<App>>,
}

impl Dispatcher {
    /// Create a dispatcher with no applications
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an application. Registration order is dispatch order.
    pub fn register(&mut self, app: impl Into<Arc<App>>) {
        let app = app.into();
        info!(
            app = %app.name(),
            total_apps = self.apps.len() + 1,
            "Application registered"
        );
        self.apps.push(app);
    }

    /// Registered applications, in dispatch order
    #[must_use]
    pub fn apps(&self) -> &[Arc<App>] {
        &self.apps
    }

    /// Dispatch one request and produce exactly one response.
    ///
    /// If `request` is `None`, a request is built from `env` per application
    /// (using that application's serializer); a supplied request is reused
    /// across applications, which is how a forward re-enters dispatch without
    /// re-parsing. A supplied `session` is bound to the context of every
    /// match attempt.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when no application/route
    /// combination matched, and [`DispatchError::Internal`] when a hook or
    /// handler failed. Both are terminal: no hook execution or route
    /// continuation applies to them.
    pub fn dispatch(
        &self,
        env: &RawEnv,
        request: Option<Request>,
        session: Option<Session>,
    ) -> Result<Response, DispatchError> {
        for app in &self.apps {
            let mut req = match &request {
                Some(supplied) => supplied.clone(),
                None => build_request(env, app),
            };
            // A forwarded request may still carry its previous captures
            req.clear_route_params();
            let method = req.method.clone();

            let candidates = app.routes_for(&method);
            debug!(
                app = %app.name(),
                method = %method,
                path = %req.path,
                candidate_routes = candidates.len(),
                "Route match attempt"
            );

            for route in candidates {
                let Some(captures) = route.matches(&req) else {
                    continue;
                };

                let start = Instant::now();
                info!(
                    app = %app.name(),
                    method = %method,
                    path = %req.path,
                    pattern = %route.pattern(),
                    "Route matched"
                );

                req.set_route_params(captures);
                let mut ctx = DispatchContext::new(req);
                if let Some(session) = &session {
                    ctx.set_session(session.clone());
                }

                let outcome = match dispatch_route(app, route, &mut ctx) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        ctx.cleanup();
                        return Err(err);
                    }
                };

                match outcome {
                    RouteOutcome::Halted(resp) => {
                        ctx.cleanup();
                        info!(
                            app = %app.name(),
                            status = resp.status,
                            latency_ms = start.elapsed().as_millis() as u64,
                            "Dispatch halted"
                        );
                        return Ok(resp);
                    }
                    RouteOutcome::Handled(resp) => {
                        ctx.response = resp;
                        match app.run_hooks(&HookEvent::AfterRequest, &mut ctx) {
                            Ok(()) => {}
                            Err(Flow::Halt(mut resp)) => {
                                finalize_content_type(app, &mut resp);
                                ctx.cleanup();
                                return Ok(resp);
                            }
                            Err(Flow::Pass) => {
                                // A pass after completion has nothing to decline
                                warn!(
                                    app = %app.name(),
                                    pattern = %route.pattern(),
                                    "Pass ignored in after_request hook"
                                );
                            }
                            Err(Flow::Fail(err)) => {
                                let err = handler_failure(app, route, &mut ctx, err);
                                ctx.cleanup();
                                return Err(err);
                            }
                        }
                        let resp = std::mem::take(&mut ctx.response);
                        ctx.cleanup();
                        info!(
                            app = %app.name(),
                            status = resp.status,
                            latency_ms = start.elapsed().as_millis() as u64,
                            "Response produced"
                        );
                        return Ok(resp);
                    }
                    RouteOutcome::Passed => {
                        debug!(
                            app = %app.name(),
                            pattern = %route.pattern(),
                            "Route passed, trying next candidate"
                        );
                        // Captures are cleared here so the next candidate's
                        // match evaluation never sees them
                        ctx.cleanup();
                        req = ctx.into_request();
                    }
                }
            }
        }

        Err(response_not_found(env))
    }
}

/// Run the before-hooks and the matched route's handler for one attempt.
///
/// The single boundary that interprets [`Flow`]: halts and passes become
/// [`RouteOutcome`] variants, failures become a synthesized 500. Raw
/// failures never reach the dispatcher's outer loop.
fn dispatch_route(
    app: &App,
    route: &Route,
    ctx: &mut DispatchContext,
) -> Result<RouteOutcome, DispatchError> {
    match app.run_hooks(&HookEvent::BeforeRequest, ctx) {
        Ok(()) => {}
        Err(Flow::Halt(mut resp)) => {
            debug!(
                app = %app.name(),
                pattern = %route.pattern(),
                "Before hook halted, handler skipped"
            );
            finalize_content_type(app, &mut resp);
            return Ok(RouteOutcome::Halted(resp));
        }
        Err(Flow::Pass) => return Ok(RouteOutcome::Passed),
        Err(Flow::Fail(err)) => return Err(handler_failure(app, route, ctx, err)),
    }

    match route.handler().call(app, ctx) {
        Ok(output) => {
            match output {
                // A full response is authoritative verbatim
                HandlerOutput::Response(resp) => ctx.response = resp,
                HandlerOutput::Content(body) => ctx.response.set_text(body),
                HandlerOutput::Empty => {}
            }
            finalize_content_type(app, &mut ctx.response);
            Ok(RouteOutcome::Handled(std::mem::take(&mut ctx.response)))
        }
        Err(Flow::Halt(mut resp)) => {
            finalize_content_type(app, &mut resp);
            Ok(RouteOutcome::Halted(resp))
        }
        Err(Flow::Pass) => Ok(RouteOutcome::Passed),
        Err(Flow::Fail(err)) => Err(handler_failure(app, route, ctx, err)),
    }
}

/// Apply the application's content-type default and charset when the
/// response carries none of its own.
fn finalize_content_type(app: &App, resp: &mut Response) {
    let config = app.config();
    let default = config
        .default_content_type
        .as_deref()
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    resp.finalize_content_type(default, config.charset.as_deref());
}

/// Log a hook/handler failure, fire the `route_exception` hooks, and
/// synthesize the terminal 500.
fn handler_failure(
    app: &App,
    route: &Route,
    ctx: &mut DispatchContext,
    err: anyhow::Error,
) -> DispatchError {
    let detail = format!("{err:#}");
    error!(
        app = %app.name(),
        method = %ctx.request.method,
        path = %ctx.request.path,
        pattern = %route.pattern(),
        error = %detail,
        "Handler failed"
    );
    ctx.set_error(detail.clone());
    if let Err(flow) = app.run_hooks(&HookEvent::RouteException, ctx) {
        // Flow signals from exception hooks cannot redirect a terminal error
        warn!(app = %app.name(), flow = ?flow, "Flow signal ignored in route_exception hook");
    }
    response_internal_error(app, detail)
}

/// Synthesize the terminal 500 for a failed hook or handler.
#[must_use]
pub fn response_internal_error(app: &App, detail: String) -> DispatchError {
    DispatchError::Internal {
        app: app.name().to_string(),
        detail,
        content_type: app.config().error_content_type.clone(),
    }
}

// Process-wide pseudo-application used only to build a request for 404
// logging without requiring a real registered application. Identity is
// cached once; request and response content are rebuilt per call.
static NOT_FOUND_APP: OnceLock<Arc<App>> = OnceLock::new();

fn not_found_app() -> &'static Arc<App> {
    NOT_FOUND_APP.get_or_init(|| Arc::new(App::new("not_found")))
}

/// Construct the not-found pseudo-application eagerly at process startup.
///
/// Optional: the first 404 initializes it on demand through a race-free
/// one-time init either way.
pub fn init_not_found_app() {
    let _app = not_found_app();
}

/// Synthesize the terminal 404 for a request nothing matched.
#[must_use]
pub fn response_not_found(env: &RawEnv) -> DispatchError {
    let request = build_request(env, not_found_app());
    warn!(
        method = %request.method,
        path = %request.path,
        "No route matched"
    );
    DispatchError::NotFound { path: request.path }
}
