use thiserror::Error;

use crate::response::Response;

/// Terminal error value synthesized by the dispatcher.
///
/// Distinguished from an ordinary [`Response`]: it is never subject to hook
/// execution or route continuation. The server adapter renders it with
/// [`DispatchError::into_response`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No application/route combination matched the request
    #[error("no route matched {path}")]
    NotFound {
        /// The requested path, also the rendered body
        path: String,
    },
    /// A hook or handler failed during execution
    #[error("handler failed in application `{app}`: {detail}")]
    Internal {
        /// Name of the application whose route failed
        app: String,
        /// Failure detail, also the rendered body
        detail: String,
        /// Error rendering content type configured on the application
        content_type: Option<String>,
    },
}

impl DispatchError {
    /// The HTTP status this error renders to
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound { .. } => 404,
            DispatchError::Internal { .. } => 500,
        }
    }

    /// Render the error as a terminal response: 404 carries the requested
    /// path, 500 carries the failure detail.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            DispatchError::NotFound { path } => {
                let mut resp = Response::with_text(404, path);
                resp.set_header("content-type", "text/plain".to_string());
                resp
            }
            DispatchError::Internal {
                detail,
                content_type,
                ..
            } => {
                let mut resp = Response::with_text(500, detail);
                let ct = content_type.unwrap_or_else(|| "text/plain".to_string());
                resp.set_header("content-type", ct);
                resp
            }
        }
    }
}
