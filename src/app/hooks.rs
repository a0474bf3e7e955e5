use crate::dispatcher::{DispatchContext, Flow};

use super::App;

/// Named extension point in the dispatch cycle.
///
/// Hooks of one event run in registration order. `BeforeRequest` runs before
/// the matched handler, `AfterRequest` after normal (non-halted, non-passed)
/// completion, `RouteException` when a hook or handler failed. `Custom`
/// events are never fired by the dispatcher itself; applications may trigger
/// them through [`App::run_hooks`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookEvent {
    BeforeRequest,
    AfterRequest,
    RouteException,
    Custom(String),
}

/// A hook callable registered on an application.
///
/// Hooks receive the owning application and the mutable per-attempt context.
/// Returning `Err(Flow::Halt(_))` short-circuits every later stage of the
/// attempt; `Err(Flow::Pass)` declines the route; `Err(Flow::Fail(_))` is
/// converted to a 500 at the dispatch boundary. Return values are otherwise
/// not consumed by the dispatcher.
pub trait Hook: Send + Sync {
    /// Run the hook against the current attempt
    fn call(&self, app: &App, ctx: &mut DispatchContext) -> Result<(), Flow>;
}

impl<F> Hook for F
where
    F: Fn(&App, &mut DispatchContext) -> Result<(), Flow> + Send + Sync,
{
    fn call(&self, app: &App, ctx: &mut DispatchContext) -> Result<(), Flow> {
        self(app, ctx)
    }
}
