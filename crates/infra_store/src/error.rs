//! Storage error types
//!
//! Errors raised by the key-value stores and the port adapters built on
//! them. Adapters translate them into `PortError` at the port boundary.

use std::path::{Path, PathBuf};

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A namespace or key contains characters unsafe for a file name
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document decoded but holds an unusable value
    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// The configured store could not be opened
    #[error("Failed to open store: {0}")]
    OpenFailed(String),
}

impl StoreError {
    /// Wraps an I/O error with the path it occurred on
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a corrupt value error for a key
    pub fn corrupt(key: &str, message: impl std::fmt::Display) -> Self {
        StoreError::Corrupt {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Checks if this error comes from undecodable stored data
    pub fn is_data_error(&self) -> bool {
        matches!(self, StoreError::Serialization(_) | StoreError::Corrupt { .. })
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidKey(key) => PortError::validation_field("Invalid storage key", key),
            StoreError::Serialization(e) => PortError::serialization(e.to_string()),
            e @ StoreError::Corrupt { .. } => PortError::serialization(e.to_string()),
            StoreError::Io { path, source } => PortError::Unavailable {
                message: format!("I/O error on {}", path.display()),
                source: Some(Box::new(source)),
            },
            StoreError::OpenFailed(message) => PortError::unavailable(message),
        }
    }
}
