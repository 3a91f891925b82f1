/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that cannot be mapped to a file name
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Stored value could not be parsed
    #[error("Serialization error for key {key:?}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writes are disabled on this store
    #[error("Store is read-only")]
    ReadOnly,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for resona_core::PlayerError {
    fn from(err: StorageError) -> Self {
        resona_core::PlayerError::storage(err.to_string())
    }
}
