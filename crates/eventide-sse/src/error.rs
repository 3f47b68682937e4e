use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("HTTP error {status}")]
    Transport { status: u16 },

    /// An `error` event; the message is the event data verbatim
    #[error("{0}")]
    Protocol(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Stream error: {0}")]
    Body(String),
}

impl StreamError {
    /// Status code of a rejected stream request
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamError::Transport { status } => Some(*status),
            StreamError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, StreamError::Protocol(_))
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
