use regex::Regex;
use std::sync::Arc;

use super::RouteMatcher;
use crate::request::{Captures, Request};

/// Kind of each capture group in pattern order
#[derive(Debug, Clone)]
enum CaptureKind {
    Named(Arc<str>),
    Splat,
}

/// Regex-based path matcher.
///
/// Compiles patterns like `/users/{id}` into regexes that match and extract
/// path parameters. A `*` segment is a splat: it matches one or more
/// remaining characters (including `/`) and is captured positionally.
///
/// Compilation happens once at registration; matching is a pure predicate.
///
/// # Example
///
/// ```rust,ignore
/// let pattern = PathPattern::new("/users/{id}/files/*");
/// // matches "/users/7/files/a/b.txt" with id = "7", splat = ["a/b.txt"]
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    regex: Regex,
    captures: Vec<CaptureKind>,
}

impl PathPattern {
    /// Compile a path pattern.
    ///
    /// Segments wrapped in `{}` become named captures, `*` segments become
    /// positional splat captures, everything else matches literally.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(path: &str) -> Self {
        if path == "/" {
            return Self {
                pattern: path.to_string(),
                regex: Regex::new(r"^/$").expect("Failed to compile path regex"),
                captures: Vec::new(),
            };
        }

        // Reserve space for the final regex string and capture list
        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut captures = Vec::with_capacity(path.matches(['{', '*']).count());

        for segment in path.split('/') {
            if segment.is_empty() {
                continue;
            }
            if segment == "*" {
                pattern.push_str("/(.+)");
                captures.push(CaptureKind::Splat);
            } else if segment.starts_with('{') && segment.ends_with('}') {
                let name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                captures.push(CaptureKind::Named(Arc::from(name)));
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern).expect("Failed to compile path regex");

        Self {
            pattern: path.to_string(),
            regex,
            captures,
        }
    }
}

impl RouteMatcher for PathPattern {
    fn matches(&self, req: &Request) -> Option<Captures> {
        let caps = self.regex.captures(&req.path)?;
        let mut out = Captures::default();
        for (idx, kind) in self.captures.iter().enumerate() {
            let value = caps.get(idx + 1)?.as_str().to_string();
            match kind {
                CaptureKind::Named(name) => out.named.push((Arc::clone(name), value)),
                CaptureKind::Splat => out.splat.push(value),
            }
        }
        Some(out)
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}
