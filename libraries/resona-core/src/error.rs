/// Core error types for Resona
use thiserror::Error;

/// Result type alias using `PlayerError`
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Core error type shared by the playback engine and its collaborators
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Input rejected before any state change (empty name, empty query, malformed track)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Addressed a playlist or track slot that does not exist
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Operation not allowed in the current state (deleting the last playlist)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The media output refused to start
    #[error("Playback failed: {0}")]
    PlaybackFailure(String),

    /// Search or stream resolution failed
    #[error("Transport failed: {0}")]
    TransportFailure(String),

    /// Durability sink errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PlayerError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an index out of range error
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a playback failure
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::PlaybackFailure(msg.into())
    }

    /// Create a transport failure
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error is an asynchronous failure that should be shown to the
    /// user as a transient message rather than a rejected command.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::PlaybackFailure(_) | Self::TransportFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = PlayerError::out_of_range("track", 4, 2);
        assert_eq!(err.to_string(), "track index 4 out of range (len 2)");
    }

    #[test]
    fn transient_classification() {
        assert!(PlayerError::playback("no source").is_transient());
        assert!(PlayerError::transport("timeout").is_transient());
        assert!(!PlayerError::invalid_input("empty").is_transient());
        assert!(!PlayerError::invalid_state("last playlist").is_transient());
    }
}
