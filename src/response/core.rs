use crate::request::HeaderVec;
use std::sync::Arc;

/// Content type applied when neither the response nor the owning application
/// specifies one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Outbound response accumulated over one match attempt.
///
/// Accumulates status, headers, and body across hook and handler execution;
/// one instance becomes the return value of `dispatch` once finalized. The
/// body is raw bytes so a handler can return binary payloads; text helpers
/// cover the common case.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code (200, 404, 500, ...)
    pub status: u16,
    /// Response headers
    pub headers: HeaderVec,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

impl Response {
    /// Create an empty response with the given status
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    /// Create a response with a text body
    #[must_use]
    pub fn with_text(status: u16, body: impl Into<String>) -> Self {
        let mut resp = Self::new(status);
        resp.set_text(body);
        resp
    }

    /// Create a `302 Found` redirect to the given location
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        let mut resp = Self::new(302);
        resp.set_header("location", location.into());
        resp
    }

    /// Reason phrase for this response's status code
    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        // Remove existing header with same name (case-insensitive)
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Replace the body with UTF-8 text
    pub fn set_text(&mut self, body: impl Into<String>) {
        self.body = body.into().into_bytes();
    }

    /// The body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Set the content type if the response does not carry one, then append
    /// the charset when the final content type lacks one.
    pub fn finalize_content_type(&mut self, default: &str, charset: Option<&str>) {
        if self.get_header("content-type").is_none() {
            self.set_header("content-type", default.to_string());
        }
        if let Some(charset) = charset {
            let appended = self
                .get_header("content-type")
                .filter(|ct| !ct.contains("charset="))
                .map(|ct| format!("{ct}; charset={charset}"));
            if let Some(value) = appended {
                self.set_header("content-type", value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(Response::new(302).reason(), "Found");
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = Response::new(200);
        resp.set_header("Content-Type", "text/plain".to_string());
        resp.set_header("content-type", "application/json".to_string());
        assert_eq!(resp.get_header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.headers.len(), 1);
    }

    #[test]
    fn test_finalize_content_type_defaults_then_appends_charset() {
        let mut resp = Response::new(200);
        resp.finalize_content_type(DEFAULT_CONTENT_TYPE, Some("utf-8"));
        assert_eq!(
            resp.get_header("content-type"),
            Some("text/html; charset=utf-8")
        );

        // An explicit content type is kept, charset still appended once
        let mut resp = Response::new(200);
        resp.set_header("content-type", "application/json".to_string());
        resp.finalize_content_type(DEFAULT_CONTENT_TYPE, Some("utf-8"));
        resp.finalize_content_type(DEFAULT_CONTENT_TYPE, Some("utf-8"));
        assert_eq!(
            resp.get_header("content-type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn test_redirect() {
        let resp = Response::redirect("/login");
        assert_eq!(resp.status, 302);
        assert_eq!(resp.get_header("location"), Some("/login"));
    }
}
