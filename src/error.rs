//! Error handling for resty

use thiserror::Error;

/// Main error type for resty operations
#[derive(Error, Debug)]
pub enum RestyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network timeout")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl RestyError {
    /// Status code carried by a non-2xx failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestyError::Status { status, .. } => Some(*status),
            RestyError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for resty operations
pub type Result<T> = std::result::Result<T, RestyError>;
