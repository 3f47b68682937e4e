use reqwest::header::{HeaderMap, RETRY_AFTER};
use thiserror::Error;

/// Failure of a single request attempt.
///
/// `Transport` carries the response metadata of a rejected request, which is
/// where a `Retry-After` hint is read from. Everything else is `Generic`.
#[derive(Error, Debug, Clone)]
pub enum RequestError {
    #[error("HTTP error {status}")]
    Transport { status: u16, headers: HeaderMap },

    #[error("{message}")]
    Generic { message: String },
}

impl RequestError {
    pub fn transport(status: u16, headers: HeaderMap) -> Self {
        RequestError::Transport { status, headers }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        RequestError::Generic {
            message: message.into(),
        }
    }

    /// Capture status and headers of a rejected response
    pub fn from_response(response: &reqwest::Response) -> Self {
        RequestError::Transport {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Transport { status, .. } => Some(*status),
            RequestError::Generic { .. } => None,
        }
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            RequestError::Transport { headers, .. } => Some(headers),
            RequestError::Generic { .. } => None,
        }
    }

    /// Raw `Retry-After` header value, if the failure carries one
    pub fn retry_after(&self) -> Option<&str> {
        self.headers()?.get(RETRY_AFTER)?.to_str().ok()
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::generic(e.to_string())
    }
}
