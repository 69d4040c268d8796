//! Form session adapter
//!
//! Stores the versioned form under `insuranceQuote`. The version check
//! itself belongs to the domain; this adapter only reports records it
//! cannot decode as `PortError::Serialization`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError, UserId};
use domain_quote::{SessionRecord, SessionStorePort};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::SESSION_KEY;

/// Key-value backed implementation of `SessionStorePort`
#[derive(Debug, Clone)]
pub struct KvSessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl KvSessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl DomainPort for KvSessionStore {}

#[async_trait]
impl SessionStorePort for KvSessionStore {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn load(&self, user_id: &UserId) -> Result<Option<SessionRecord>, PortError> {
        let Some(raw) = self.store.get(user_id.as_str(), SESSION_KEY).await? else {
            return Ok(None);
        };

        let record: SessionRecord = serde_json::from_str(&raw).map_err(StoreError::from)?;
        debug!(version = %record.version, step = ?record.step, "Loaded form session");
        Ok(Some(record))
    }

    #[instrument(skip(self, record), fields(user_id = %user_id, step = ?record.step))]
    async fn save(&self, user_id: &UserId, record: &SessionRecord) -> Result<(), PortError> {
        let raw = serde_json::to_string(record).map_err(StoreError::from)?;
        self.store.put(user_id.as_str(), SESSION_KEY, &raw).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn clear(&self, user_id: &UserId) -> Result<(), PortError> {
        debug!("Clearing form session");
        self.store.delete(user_id.as_str(), SESSION_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use domain_quote::{FormData, FormField, FORM_VERSION};

    fn user() -> UserId {
        UserId::parse("demo-user").unwrap()
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = KvSessionStore::new(Arc::new(MemoryStore::new()));
        let mut data = FormData::new();
        data.set(FormField::Make, "Nissan");
        let record = SessionRecord {
            version: FORM_VERSION.to_string(),
            data,
            step: Some(2),
            updated_at: None,
        };

        assert_eq!(store.load(&user()).await.unwrap(), None);
        store.save(&user(), &record).await.unwrap();
        assert_eq!(store.load(&user()).await.unwrap(), Some(record));

        store.clear(&user()).await.unwrap();
        assert_eq!(store.load(&user()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_garbage_is_a_serialization_error() {
        let memory = Arc::new(MemoryStore::new());
        memory.put("demo-user", SESSION_KEY, "{not json").await.unwrap();
        let store = KvSessionStore::new(memory);

        let err = store.load(&user()).await.unwrap_err();
        assert!(matches!(err, PortError::Serialization { .. }));
    }
}
