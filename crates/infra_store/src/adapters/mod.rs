//! Quotation Port Adapters
//!
//! Implementations of the quotation domain ports on top of any
//! [`KeyValueStore`]. Each adapter owns one key in the user's namespace and
//! translates `StoreError` into `PortError`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_store::{MemoryStore, QuoteStorage};
//!
//! let storage = QuoteStorage::new(Arc::new(MemoryStore::new()));
//! let sessions: Arc<dyn SessionStorePort> = Arc::new(storage.sessions());
//! ```

pub mod loyalty;
pub mod quotes;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::kv::KeyValueStore;

pub use loyalty::KvLoyaltyStore;
pub use quotes::KvQuoteStore;
pub use session::KvSessionStore;

/// Hands out the three adapters over one shared store
#[derive(Debug, Clone)]
pub struct QuoteStorage {
    store: Arc<dyn KeyValueStore>,
}

impl QuoteStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn sessions(&self) -> KvSessionStore {
        KvSessionStore::new(self.store.clone())
    }

    /// The saved quote history adapter
    ///
    /// Appends are serialized within one adapter, so share a single
    /// instance rather than calling this per request.
    pub fn quotes(&self) -> KvQuoteStore {
        KvQuoteStore::new(self.store.clone())
    }

    pub fn loyalty(&self) -> KvLoyaltyStore {
        KvLoyaltyStore::new(self.store.clone())
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}

#[async_trait]
impl HealthCheckable for QuoteStorage {
    async fn health_check(&self) -> HealthCheckResult {
        self.store.health_check().await
    }
}
