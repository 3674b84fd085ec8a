//! Error types for DocDesk SDK operations

use docdesk_forms::BackendError;
use thiserror::Error;

/// Error type for DocDesk SDK operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Empty body or a body missing required keys
    #[error("Malformed response: {0}")]
    MalformedBody(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No session token, or the backend refused it
    #[error("Not authenticated")]
    Unauthenticated,

    /// The request's cancellation token fired
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Returns true if this is a not found error (404)
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Returns true if this is a validation error (400)
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Api { status: 400, .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<Error> for BackendError {
    fn from(e: Error) -> Self {
        match e {
            Error::Cancelled => BackendError::Cancelled,
            Error::Unauthenticated | Error::Api { status: 401, .. } => {
                BackendError::Unauthenticated
            }
            Error::Api { status: 404, message } => BackendError::NotFound(message),
            Error::Api { status, message } => BackendError::Status { code: status, message },
            Error::Http(e) => BackendError::Transport(e.to_string()),
            Error::MalformedBody(e) => BackendError::MalformedBody(e),
            Error::Json(e) => BackendError::MalformedBody(e.to_string()),
            Error::Url(e) => BackendError::Transport(e.to_string()),
            Error::Config(e) => BackendError::Transport(e),
        }
    }
}
