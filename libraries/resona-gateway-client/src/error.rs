//! Error types for the gateway client.

use resona_core::PlayerError;
use thiserror::Error;

/// Errors that can occur when talking to the search/stream gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gateway returned an error response
    #[error("Gateway error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid gateway URL
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// Rejected before sending (empty query, blank track id)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to parse gateway response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Gateway answered but had no playable stream for the track
    #[error("No stream available for {0}")]
    NoStream(String),

    /// Gateway is offline or unreachable
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),
}

impl From<GatewayError> for PlayerError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidRequest(msg) => PlayerError::InvalidInput(msg),
            GatewayError::InvalidUrl(_) => PlayerError::invalid_input(err.to_string()),
            other => PlayerError::transport(other.to_string()),
        }
    }
}

/// Result type for gateway client operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
