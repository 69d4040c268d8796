//! Saved quote history adapter
//!
//! The whole history lives in one JSON array under `savedQuotes`, oldest
//! first. Saving reads the array, appends and writes it back.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError, QuoteId, UserId};
use domain_quote::{QuoteStorePort, SavedQuote};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::SAVED_QUOTES_KEY;

/// Key-value backed implementation of `QuoteStorePort`
#[derive(Debug)]
pub struct KvQuoteStore {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-append-write cycles within this process
    append: Mutex<()>,
}

impl KvQuoteStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append: Mutex::new(()),
        }
    }

    async fn read_history(&self, user_id: &UserId) -> Result<Vec<SavedQuote>, StoreError> {
        match self.store.get(user_id.as_str(), SAVED_QUOTES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

impl DomainPort for KvQuoteStore {}

#[async_trait]
impl QuoteStorePort for KvQuoteStore {
    #[instrument(skip(self, quote), fields(user_id = %quote.user_id, quote_id = %quote.id))]
    async fn save(&self, quote: SavedQuote) -> Result<QuoteId, PortError> {
        let _guard = self.append.lock().await;
        let user_id = quote.user_id.clone();
        let id = quote.id;

        let mut history = self.read_history(&user_id).await?;
        history.push(quote);
        let raw = serde_json::to_string(&history).map_err(StoreError::from)?;
        self.store.put(user_id.as_str(), SAVED_QUOTES_KEY, &raw).await?;

        debug!(count = history.len(), "Saved quote appended");
        Ok(id)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<SavedQuote>, PortError> {
        let mut history = self.read_history(user_id).await?;
        history.reverse();
        Ok(history)
    }

    #[instrument(skip(self), fields(user_id = %user_id, quote_id = %id))]
    async fn get(&self, user_id: &UserId, id: QuoteId) -> Result<SavedQuote, PortError> {
        self.read_history(user_id)
            .await?
            .into_iter()
            .find(|quote| quote.id == id)
            .ok_or_else(|| PortError::not_found("SavedQuote", id))
    }
}
