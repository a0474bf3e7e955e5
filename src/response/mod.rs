//! # Response Module
//!
//! The outbound [`Response`] type: status, headers, body, and content-type
//! finalization. Dispatch-control state (halt/pass) is not stored here; it is
//! expressed through the typed [`Flow`](crate::dispatcher::Flow) values the
//! dispatcher inspects, so the three outcomes of a match attempt stay
//! exhaustive at the type level.

mod core;

pub use core::{Response, DEFAULT_CONTENT_TYPE};
