//! Request core module - hot path for request construction and parameter lookup.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::warn;

use crate::app::App;

/// Maximum number of path/query parameters before heap allocation.
/// Most routes carry ≤4 named captures.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
/// Most requests have ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` instead of `String` because names come from the
/// static route table (known at registration time), so `Arc::clone()` is an
/// O(1) atomic increment instead of an O(n) string copy. Values remain
/// `String` as they are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Stack-allocated header storage for the hot path.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Positional splat captures produced by wildcard pattern segments.
pub type SplatVec = SmallVec<[String; 4]>;

/// Captures produced by a successful route match: named parameters plus
/// positional splat segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captures {
    /// Named captures (e.g. `{id}` → `("id", "123")`)
    pub named: ParamVec,
    /// Positional wildcard captures, in pattern order
    pub splat: SplatVec,
}

impl Captures {
    /// True when no parameter of either kind was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.splat.is_empty()
    }
}

/// Raw environment map handed in by a server adapter.
///
/// The dispatcher performs no URL or query-string parsing: the adapter
/// supplies the path verbatim and the query parameters pre-parsed.
#[derive(Debug, Clone, Default)]
pub struct RawEnv {
    /// HTTP method string, matched case-insensitively ("get" and "GET" are equal)
    pub method: String,
    /// Request path (e.g. `/pets/123`)
    pub path: String,
    /// Header pairs as received
    pub headers: HeaderVec,
    /// Query parameters, pre-parsed by the adapter
    pub query_params: ParamVec,
    /// Raw body bytes, if the request carried a body
    pub body: Option<Vec<u8>>,
}

impl RawEnv {
    /// Create an environment for the given method and path
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Append a header pair
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Append a pre-parsed query parameter
    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query_params.push((Arc::from(name), value.into()));
        self
    }

    /// Attach raw body bytes
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Body deserialization engine bound to an application.
///
/// Deserialization failures are logged and tolerated: request construction
/// always succeeds, and the faulty body simply appears as `None` to handlers.
pub trait Serializer: Send + Sync {
    /// Deserialize raw body bytes into a JSON value
    fn deserialize(&self, body: &[u8]) -> anyhow::Result<Value>;
}

/// JSON body engine built on `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn deserialize(&self, body: &[u8]) -> anyhow::Result<Value> {
        serde_json::from_slice(body).map_err(Into::into)
    }
}

/// Structured view of one inbound request.
///
/// Built once per incoming environment (or supplied pre-built by the caller
/// for forwards/retries) and mutated in place by the matching step: route
/// parameters are stored after a successful match and cleared again when a
/// route passes, so a later candidate never observes stale captures.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method, parsed case-insensitively from the environment
    pub method: Method,
    /// Request path
    pub path: String,
    /// Header pairs as received
    pub headers: HeaderVec,
    /// Query parameters supplied by the adapter
    pub query_params: ParamVec,
    /// Body deserialized by the owning application's serializer, if any
    pub body: Option<Value>,
    /// Route parameters, populated post-match
    route_params: Option<Captures>,
}

impl Request {
    /// Create a bare request for the given method and path
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderVec::new(),
            query_params: ParamVec::new(),
            body: None,
            route_params: None,
        }
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name
    ///
    /// Uses "last write wins" semantics: if duplicate query parameter names
    /// exist (e.g., `?limit=10&limit=20`), returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a named route parameter captured by the matched pattern
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths (e.g., `/org/{id}/user/{id}`), returns the
    /// last occurrence.
    #[inline]
    #[must_use]
    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route_params
            .as_ref()?
            .named
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Positional splat captures of the matched pattern, in pattern order
    #[must_use]
    pub fn splat(&self) -> &[String] {
        self.route_params
            .as_ref()
            .map(|c| c.splat.as_slice())
            .unwrap_or(&[])
    }

    /// All captures of the matched pattern, if a match stored any
    #[must_use]
    pub fn captures(&self) -> Option<&Captures> {
        self.route_params.as_ref()
    }

    /// Store the captures of a successful match.
    ///
    /// Set at most once per match attempt; the previous attempt's captures
    /// must have been cleared by [`Request::clear_route_params`] first.
    pub(crate) fn set_route_params(&mut self, captures: Captures) {
        debug_assert!(self.route_params.is_none(), "stale route params not cleared");
        self.route_params = Some(captures);
    }

    /// Drop the captures of the current match attempt. Idempotent.
    pub(crate) fn clear_route_params(&mut self) {
        self.route_params = None;
    }
}

/// Build a [`Request`] from a raw environment for the given application.
///
/// Uses the application's serializer (if any) to deserialize the body.
/// Deserialization failures are logged but never fatal: a request is still
/// produced with an empty body. An unrecognizable method string is logged
/// and falls back to `GET`.
#[must_use]
pub fn build_request(env: &RawEnv, app: &App) -> Request {
    let method = match Method::from_bytes(env.method.to_ascii_uppercase().as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            warn!(
                app = %app.name(),
                method = %env.method,
                error = %e,
                "Unrecognizable HTTP method, defaulting to GET"
            );
            Method::GET
        }
    };

    let body = match (&env.body, app.serializer()) {
        (Some(bytes), Some(serializer)) => match serializer.deserialize(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    app = %app.name(),
                    path = %env.path,
                    error = %format!("{e:#}"),
                    "Body deserialization failed, continuing with empty body"
                );
                None
            }
        },
        _ => None,
    };

    Request {
        method,
        path: env.path.clone(),
        headers: env.headers.clone(),
        query_params: env.query_params.clone(),
        body,
        route_params: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_last_write_wins() {
        let mut req = Request::new(Method::GET, "/items");
        req.query_params.push((Arc::from("limit"), "10".to_string()));
        req.query_params.push((Arc::from("limit"), "20".to_string()));
        assert_eq!(req.get_query_param("limit"), Some("20"));
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut req = Request::new(Method::GET, "/");
        req.headers
            .push((Arc::from("Content-Type"), "text/plain".to_string()));
        assert_eq!(req.get_header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_route_params_cleared() {
        let mut req = Request::new(Method::GET, "/files/a/b");
        let mut captures = Captures::default();
        captures.splat.push("a/b".to_string());
        req.set_route_params(captures);
        assert_eq!(req.splat(), &["a/b".to_string()]);

        req.clear_route_params();
        req.clear_route_params();
        assert!(req.splat().is_empty());
        assert!(req.captures().is_none());
    }
}
