//! # Router Module
//!
//! Route registration and match evaluation.
//!
//! A [`Route`] binds an HTTP method and an opaque [`RouteMatcher`] to a
//! handler. Matching is a pure predicate producing
//! [`Captures`](crate::request::Captures); route order and first-match-wins
//! semantics are owned by the dispatcher, not here.
//!
//! [`PathPattern`] is the built-in matcher: at registration time it compiles
//! patterns like `/pets/{id}` or `/files/*` into regexes, and at match time it
//! extracts named and splat parameters.

mod core;
mod pattern;

pub use core::{Route, RouteMatcher};
pub use pattern::PathPattern;
