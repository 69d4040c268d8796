//! Namespaced key-value stores
//!
//! Values are opaque strings (JSON documents in practice) addressed by a
//! namespace and a key. Both parts become file names in [`FileStore`], so
//! they are restricted to ASCII letters, digits, `-` and `_`.
//!
//! Writes are last-write-wins. There is no locking across processes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::error::StoreError;

/// Longest accepted namespace or key
const MAX_SEGMENT_LEN: usize = 128;

/// A namespaced string store
#[async_trait]
pub trait KeyValueStore: HealthCheckable + std::fmt::Debug {
    /// Reads a value, `None` when the key was never written or was deleted
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one
    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes a value; deleting an absent key succeeds
    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StoreError>;
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    let valid = !segment.is_empty()
        && segment.len() <= MAX_SEGMENT_LEN
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(segment.to_string()))
    }
}

// ============= FILE STORE =============

/// Stores each value in `<root>/<namespace>/<key>.json`
///
/// A write goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial document.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, namespace: &str, key: &str) -> Result<(PathBuf, PathBuf), StoreError> {
        check_segment(namespace)?;
        check_segment(key)?;
        let dir = self.root.join(namespace);
        let path = dir.join(format!("{key}.json"));
        Ok((dir, path))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let (_, path) = self.locate(namespace, key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Key not present");
                Ok(None)
            }
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display(), bytes = value.len()))]
    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let (dir, path) = self.locate(namespace, key)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        let temp = dir.join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp, value)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!(path = %temp.display(), error = %cleanup, "Failed to remove temporary file");
            }
            return Err(StoreError::io(&path, e));
        }

        debug!("Value written");
        Ok(())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        let (_, path) = self.locate(namespace, key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

#[async_trait]
impl HealthCheckable for FileStore {
    /// Verifies the root directory still exists
    async fn health_check(&self) -> HealthCheckResult {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => HealthCheckResult::healthy("file-store"),
            Ok(_) => HealthCheckResult::unhealthy(
                "file-store",
                format!("{} is not a directory", self.root.display()),
            ),
            Err(e) => HealthCheckResult::unhealthy(
                "file-store",
                format!("{}: {}", self.root.display(), e),
            ),
        }
    }
}

// ============= MEMORY STORE =============

/// Process-local store; contents are lost when the last clone is dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<(String, String), String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all namespaces
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        check_segment(namespace)?;
        check_segment(key)?;
        Ok(self
            .entries
            .read()
            .await
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        check_segment(namespace)?;
        check_segment(key)?;
        self.entries
            .write()
            .await
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        check_segment(namespace)?;
        check_segment(key)?;
        self.entries
            .write()
            .await
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}

#[async_trait]
impl HealthCheckable for MemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-store")
    }
}
