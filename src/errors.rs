use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between the input box and the endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response payload: {0}")]
    Payload(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    pub fn transport_error(msg: impl Into<String>) -> Self {
        ChatError::Transport(msg.into())
    }

    pub fn payload_error(msg: impl Into<String>) -> Self {
        ChatError::Payload(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ChatError::Config(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ChatError::Timeout(_))
    }
}
