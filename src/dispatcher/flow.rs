use crate::app::App;
use crate::response::Response;

use super::DispatchContext;

/// Non-local return signal for hooks and handlers.
///
/// Deeply nested application code aborts a match attempt by returning one of
/// these through `?`; the typed result unwinds the call chain to the
/// dispatcher without any intermediate function checking a sentinel. Exactly
/// one boundary (`dispatch_route`) interprets the signal, so it can never be
/// observed by unrelated later code.
#[derive(Debug)]
pub enum Flow {
    /// Final output already decided; skip the handler (if raised from a
    /// before-hook) and the `after_request` hooks, return this response
    Halt(Response),
    /// This route declines the request; try the next matching route with all
    /// captures cleared
    Pass,
    /// The hook or handler failed; converted to a synthesized 500 at the
    /// dispatch boundary, never propagated raw
    Fail(anyhow::Error),
}

impl Flow {
    /// Halt with a text response
    #[must_use]
    pub fn halt(status: u16, body: impl Into<String>) -> Self {
        Flow::Halt(Response::with_text(status, body))
    }

    /// Halt with a `302 Found` redirect
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Flow::Halt(Response::redirect(location))
    }
}

// Lets handlers use `?` on fallible calls; the failure is caught at the
// dispatch boundary and synthesized into a 500.
impl From<anyhow::Error> for Flow {
    fn from(err: anyhow::Error) -> Self {
        Flow::Fail(err)
    }
}

/// What a handler produced on normal completion.
#[derive(Debug)]
pub enum HandlerOutput {
    /// Body content; status and headers of the accumulated response are kept
    Content(String),
    /// A full response, authoritative verbatim (status, headers, body); only
    /// a missing content type is defaulted. This is how a handler returns an
    /// arbitrary low-level payload without going through the content path.
    Response(Response),
    /// No content; the accumulated response is returned as-is
    Empty,
}

impl From<String> for HandlerOutput {
    fn from(body: String) -> Self {
        HandlerOutput::Content(body)
    }
}

impl From<&str> for HandlerOutput {
    fn from(body: &str) -> Self {
        HandlerOutput::Content(body.to_string())
    }
}

impl From<Response> for HandlerOutput {
    fn from(resp: Response) -> Self {
        HandlerOutput::Response(resp)
    }
}

impl From<()> for HandlerOutput {
    fn from((): ()) -> Self {
        HandlerOutput::Empty
    }
}

/// Result of handler execution: output on completion, [`Flow`] to halt,
/// pass, or fail.
pub type HandlerResult = Result<HandlerOutput, Flow>;

/// A route handler.
///
/// Receives the owning application and the mutable per-attempt context. It
/// may read and mutate the accumulated response, return body content or a
/// full [`Response`], or abort through [`Flow`].
pub trait Handler: Send + Sync {
    /// Execute the handler for the current attempt
    fn call(&self, app: &App, ctx: &mut DispatchContext) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&App, &mut DispatchContext) -> HandlerResult + Send + Sync,
{
    fn call(&self, app: &App, ctx: &mut DispatchContext) -> HandlerResult {
        self(app, ctx)
    }
}

/// Tagged result of one match-and-execute step.
///
/// Exhaustive at the type level: the dispatcher's outer loop branches on
/// these three outcomes and nothing else.
#[derive(Debug)]
pub enum RouteOutcome {
    /// The handler completed normally; `after_request` hooks still run
    Handled(Response),
    /// An earlier stage finalized the output; no later stage runs
    Halted(Response),
    /// The route declined; the dispatcher tries the next candidate
    Passed,
}
