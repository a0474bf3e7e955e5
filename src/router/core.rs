//! Router core module - hot path for route matching.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use std::sync::Arc;

use crate::dispatcher::Handler;
use crate::request::{Captures, Request};

/// Match predicate bound to a route.
///
/// A matcher is a pure predicate: it inspects the request and either produces
/// the captured parameters or declines, with no side effects on failure. The
/// pattern language is not part of the dispatcher's contract; any
/// implementation of this trait can be registered. [`PathPattern`] is the
/// built-in regex-based implementation.
///
/// [`PathPattern`]: crate::router::PathPattern
pub trait RouteMatcher: Send + Sync {
    /// Evaluate the request, returning captures on a match
    fn matches(&self, req: &Request) -> Option<Captures>;

    /// Human-readable pattern for logging
    fn pattern(&self) -> &str {
        "<opaque>"
    }
}

impl<F> RouteMatcher for F
where
    F: Fn(&Request) -> Option<Captures> + Send + Sync,
{
    fn matches(&self, req: &Request) -> Option<Captures> {
        self(req)
    }
}

/// A single (method, pattern, handler) registration.
///
/// Immutable after registration: created at application setup time and
/// read-only during dispatch.
#[derive(Clone)]
pub struct Route {
    method: Method,
    matcher: Arc<dyn RouteMatcher>,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// Bind a matcher and handler under the given method
    pub fn new(
        method: Method,
        matcher: Arc<dyn RouteMatcher>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            method,
            matcher,
            handler,
        }
    }

    /// HTTP method this route is registered under
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern string of the matcher, for logging
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    /// Evaluate the match predicate against the request
    #[must_use]
    pub fn matches(&self, req: &Request) -> Option<Captures> {
        self.matcher.matches(req)
    }

    /// The handler bound to this route
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.matcher.pattern())
            .finish_non_exhaustive()
    }
}
