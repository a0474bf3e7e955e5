use serde_json::Value;

use crate::request::Request;
use crate::response::Response;

use super::Flow;

/// Opaque session value bound to a dispatch attempt.
///
/// Session storage and retrieval are external concerns; the dispatcher only
/// binds a supplied session into the context so hooks and handlers can reach
/// it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session(pub Value);

impl Session {
    /// Wrap a session value
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a key, when the session value is an object
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Per-attempt mutable state threaded through hooks and handlers.
///
/// One context is created for each match attempt and dropped when the
/// attempt ends; long-lived [`App`](crate::app::App) values never store it.
/// [`DispatchContext::cleanup`] clears the per-request slots and runs on
/// every exit path of an attempt (halt, pass, normal completion, failure).
#[derive(Debug)]
pub struct DispatchContext {
    /// The request being dispatched, carrying the match's captures
    pub request: Request,
    /// The response accumulated across hook and handler execution
    pub response: Response,
    session: Option<Session>,
    error: Option<String>,
}

impl DispatchContext {
    /// Create a context for one match attempt
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::default(),
            session: None,
            error: None,
        }
    }

    /// The bound session, if the caller supplied one
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Bind a session to this attempt
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Detail of the failure that triggered the `route_exception` hooks
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_error(&mut self, detail: String) {
        self.error = Some(detail);
    }

    /// Take the accumulated response and halt with it.
    ///
    /// For hooks and handlers that build the final output on
    /// `ctx.response` in place: `return Err(ctx.halt());`
    #[must_use]
    pub fn halt(&mut self) -> Flow {
        Flow::Halt(std::mem::take(&mut self.response))
    }

    /// Clear all per-request state. Idempotent; called on every exit path of
    /// a match attempt.
    pub fn cleanup(&mut self) {
        self.request.clear_route_params();
        self.session = None;
        self.error = None;
    }

    /// Hand the request back for the next candidate after a pass
    pub(crate) fn into_request(self) -> Request {
        self.request
    }
}
