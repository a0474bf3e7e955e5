//! # Request Module
//!
//! Request construction and parameter storage for the dispatcher.
//!
//! A server adapter hands the dispatcher a [`RawEnv`] (method, path, headers,
//! pre-parsed query parameters, raw body bytes). [`build_request`] turns it
//! into a [`Request`] using the owning application's [`Serializer`] for the
//! body; deserialization failures are logged and tolerated, never fatal.
//!
//! Route parameters ([`Captures`]) are stored on the request after a
//! successful match and cleared when a route passes, so no candidate ever
//! sees a previous candidate's captures.

mod core;

pub use core::{
    build_request, Captures, HeaderVec, JsonSerializer, ParamVec, RawEnv, Request, Serializer,
    SplatVec, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS,
};
