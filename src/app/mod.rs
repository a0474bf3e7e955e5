//! # Application Module
//!
//! An [`App`] groups routes per HTTP method in registration order, carries an
//! ordered hook registry, an optional body serializer, and content-type
//! configuration. Applications are long-lived and immutable during dispatch;
//! per-request state lives in the
//! [`DispatchContext`](crate::dispatcher::DispatchContext) instead, which is
//! what makes a shared `App` safe under concurrent dispatches.

mod core;
mod hooks;

pub use core::{App, AppConfig};
pub use hooks::{Hook, HookEvent};
