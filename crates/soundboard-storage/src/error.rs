//! Error types for container storage

use thiserror::Error;

use crate::container::Container;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while loading or saving a container
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium could not be read or written
    #[error("Storage error on {container} container: {source}")]
    Storage {
        container: Container,
        #[source]
        source: std::io::Error,
    },

    /// The container exists but its content could not be decoded
    #[error("Corrupt {container} container: {message}")]
    Corrupt { container: Container, message: String },

    /// The mapping could not be encoded
    #[error("Failed to serialize {container} container: {message}")]
    Serialize { container: Container, message: String },
}

impl StoreError {
    /// The container this error refers to
    pub fn container(&self) -> Container {
        match self {
            StoreError::Storage { container, .. }
            | StoreError::Corrupt { container, .. }
            | StoreError::Serialize { container, .. } => *container,
        }
    }

    /// Whether the error came from decoding stored content
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}
