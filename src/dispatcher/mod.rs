//! # Dispatcher Module
//!
//! The dispatcher orchestrates the full match → hook → execute →
//! error-handle cycle across the registered applications.
//!
//! ## Dispatch flow
//!
//! 1. Applications are tried in registration order; per application, the
//!    routes under the request's method are tried in registration order.
//! 2. On the first match, a [`DispatchContext`] is created for the attempt
//!    and the `before_request` hooks run, then the route handler.
//! 3. Hooks and handlers abort non-locally by returning a [`Flow`] through
//!    `?`: `Halt` finalizes the output and skips every later stage, `Pass`
//!    declines the route so the next candidate is tried with all captures
//!    cleared, `Fail` is caught at the dispatch boundary and synthesized
//!    into a 500 after the `route_exception` hooks ran.
//! 4. Normal completion runs the `after_request` hooks and returns the
//!    response.
//! 5. When every candidate is exhausted, dispatch returns the terminal
//!    [`DispatchError::NotFound`] carrying the requested path.
//!
//! The typed [`Flow`]/[`RouteOutcome`] pair replaces mutable `halted`/
//! `passed` flags: the three outcomes of an attempt are exhaustive and
//! checked by the compiler, and the escape value unwinds through arbitrarily
//! deep handler call chains with `?` instead of a stored continuation handle.

mod context;
mod core;
mod error;
mod flow;

pub use context::{DispatchContext, Session};
pub use core::{
    init_not_found_app, response_internal_error, response_not_found, Dispatcher,
};
pub use error::DispatchError;
pub use flow::{Flow, Handler, HandlerOutput, HandlerResult, RouteOutcome};
