//! Store configuration and construction

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::error::StoreError;
use crate::kv::{FileStore, KeyValueStore, MemoryStore};

/// Which store backs the adapters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per key under `root`
    File { root: PathBuf },
    /// Process memory only
    Memory,
}

/// Configuration options for the key-value store
///
/// # Example
///
/// ```rust
/// use infra_store::{StoreBackend, StoreConfig};
///
/// let config = StoreConfig::file("/var/lib/quotes");
/// assert!(matches!(config.backend, StoreBackend::File { .. }));
/// assert_eq!(StoreConfig::memory().backend, StoreBackend::Memory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// A file-backed store rooted at `root`
    pub fn file(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::File { root: root.into() },
        }
    }

    /// An in-memory store
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file("./data")
    }
}

/// Opens the configured store
///
/// # Errors
///
/// Returns `StoreError::OpenFailed` if the file store's root directory
/// cannot be created.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match &config.backend {
        StoreBackend::File { root } => {
            info!(root = %root.display(), "Opening file store");
            let store = FileStore::open(root.clone())
                .await
                .map_err(|e| StoreError::OpenFailed(e.to_string()))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Opening in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AdapterHealth, HealthCheckable};

    #[tokio::test]
    async fn test_open_file_store_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("quotes");
        let store = open_store(&StoreConfig::file(&root)).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(store.health_check().await.status, AdapterHealth::Healthy);
    }

    #[tokio::test]
    async fn test_open_fails_when_root_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = open_store(&StoreConfig::file(file.path())).await.unwrap_err();
        assert!(matches!(err, StoreError::OpenFailed(_)));
    }

    #[test]
    fn test_backend_deserializes_from_tagged_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"backend":{"kind":"file","root":"/tmp/q"}}"#).unwrap();
        assert_eq!(config, StoreConfig::file("/tmp/q"));
    }
}
