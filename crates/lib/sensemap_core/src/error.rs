//! Proxy error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias for proxy operation results.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Everything that can go wrong while forwarding a call upstream.
///
/// `context` is the operation's failure prefix (e.g. `"Logout failed"`), so
/// the rendered message reads `"Logout failed: 401 Unauthorized, <body>"`.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Upstream rejected the credentials or bearer token.
    #[error("{context}: {status}, {body}")]
    Authentication {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Any other non-2xx answer.
    #[error("{context}: {status}, {body}")]
    Upstream {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    /// 2xx answer whose body does not have the expected shape.
    #[error("{context}: unexpected response body ({reason}): {body}")]
    MalformedResponse {
        context: &'static str,
        status: StatusCode,
        body: String,
        reason: String,
    },

    /// Connection, timeout, or body-read failure.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// Id that cannot be sent as a `boxes/{id}` path segment.
    #[error("Invalid SenseBox id: {0:?}")]
    InvalidBoxId(String),
}

impl ProxyError {
    /// Upstream status code, when a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProxyError::Authentication { status, .. }
            | ProxyError::Upstream { status, .. }
            | ProxyError::MalformedResponse { status, .. } => Some(*status),
            ProxyError::Transport(e) => e.status(),
            ProxyError::InvalidUrl(_) | ProxyError::InvalidBoxId(_) => None,
        }
    }

    /// Raw upstream response body, when one was read.
    pub fn body(&self) -> Option<&str> {
        match self {
            ProxyError::Authentication { body, .. }
            | ProxyError::Upstream { body, .. }
            | ProxyError::MalformedResponse { body, .. } => Some(body.as_str()),
            ProxyError::Transport(_)
            | ProxyError::InvalidUrl(_)
            | ProxyError::InvalidBoxId(_) => None,
        }
    }
}

impl From<url::ParseError> for ProxyError {
    fn from(e: url::ParseError) -> Self {
        ProxyError::InvalidUrl(e.to_string())
    }
}
