//! Error types for the remote validation rule

use thiserror::Error;

/// Failures raised while talking to the remote endpoint
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Endpoint answered outside the 2xx range
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The validated value has no string form (`null`)
    #[error("Cannot convert {0} to a string")]
    Stringify(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A newer check for the same field started before this one resolved
    #[error("Check superseded by a newer call")]
    Superseded,
}

impl RuleError {
    /// True when the remote check could not be completed, as opposed to
    /// a value that was judged invalid.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type RuleResult<T> = Result<T, RuleError>;
