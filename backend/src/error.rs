//! Errors raised while talking to the search engine.

use thiserror::Error;

/// Any of these aborts the whole search: no partial result is assembled.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("search engine unreachable ({url}): {message}")]
    Transport { url: String, message: String },

    #[error("search engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search engine response is not valid JSON: {message}")]
    Decode { message: String, raw_body: String },
}

impl EngineError {
    /// The payload the engine actually sent, when there was one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            EngineError::Transport { .. } => None,
            EngineError::Status { body, .. } => Some(body),
            EngineError::Decode { raw_body, .. } => Some(raw_body),
        }
    }
}
