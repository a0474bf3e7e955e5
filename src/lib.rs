//! # cascade-router
//!
//! **cascade-router** is a multi-application HTTP request dispatcher: given an
//! inbound request and an ordered collection of registered applications (each
//! owning an ordered collection of routes keyed by HTTP method), it finds the
//! first route whose pattern matches, executes the hook/handler chain, and
//! produces exactly one outbound response — or a synthesized terminal 404/500.
//!
//! ## Architecture
//!
//! - **[`request`]** - Raw environment intake, request construction, body
//!   deserialization behind the `Serializer` trait
//! - **[`router`]** - Routes, the opaque `RouteMatcher` predicate, and the
//!   built-in regex-based `PathPattern`
//! - **[`app`]** - Applications: ordered routes per method, ordered hook
//!   registry, content-type configuration
//! - **[`response`]** - The outbound response and content-type finalization
//! - **[`dispatcher`]** - Orchestration, the typed `Flow` non-local return
//!   (halt / pass / fail), per-attempt `DispatchContext`, and 404/500
//!   synthesis
//!
//! ## Dispatch control flow
//!
//! Handlers and hooks return `Result<_, Flow>`. `Flow::Halt(response)` means
//! "final output already decided; skip everything later"; `Flow::Pass` means
//! "this route declines; try the next matching route"; `Flow::Fail(error)` is
//! caught at the dispatch boundary and converted to a 500 after the
//! `route_exception` hooks ran. Because the signal is a typed error variant
//! unwound with `?`, deeply nested application code can abort an attempt
//! without any stored escape handle and without intermediate functions
//! checking sentinels.
//!
//! ## Quick start
//!
//! ```
//! use cascade_router::{App, Dispatcher, HandlerOutput, RawEnv};
//! use std::sync::Arc;
//!
//! let mut app = App::new("hello");
//! app.get("/hello/{name}", |_app, ctx| {
//!     let name = ctx.request.route_param("name").unwrap_or("world").to_string();
//!     Ok(HandlerOutput::Content(format!("hi {name}")))
//! });
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(Arc::new(app));
//!
//! let env = RawEnv::new("GET", "/hello/ferris");
//! let response = dispatcher.dispatch(&env, None, None).unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(response.text(), Some("hi ferris"));
//! ```
//!
//! ## Concurrency
//!
//! Applications and the dispatcher carry no per-request mutable state; each
//! match attempt gets its own `DispatchContext`, so shared `Arc<App>` values
//! are safe under concurrent dispatches. Handlers are synchronous opaque
//! callables from the dispatcher's point of view; a hosting layer that wants
//! parallelism runs dispatch on its own threads.

pub mod app;
pub mod dispatcher;
pub mod request;
pub mod response;
pub mod router;

pub use app::{App, AppConfig, Hook, HookEvent};
pub use dispatcher::{
    init_not_found_app, response_internal_error, response_not_found, DispatchContext,
    DispatchError, Dispatcher, Flow, Handler, HandlerOutput, HandlerResult, RouteOutcome, Session,
};
pub use request::{
    build_request, Captures, HeaderVec, JsonSerializer, ParamVec, RawEnv, Request, Serializer,
};
pub use response::{Response, DEFAULT_CONTENT_TYPE};
pub use router::{PathPattern, Route, RouteMatcher};
