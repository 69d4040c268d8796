//! Last quote time adapter
//!
//! `lastQuoteTime` holds the epoch milliseconds of the user's most recent
//! quote computation as a decimal string, e.g. `"1752744300000"`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{from_epoch_millis, to_epoch_millis, DomainPort, PortError, UserId};
use domain_quote::LoyaltyPort;

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::LAST_QUOTE_TIME_KEY;

/// Key-value backed implementation of `LoyaltyPort`
#[derive(Debug, Clone)]
pub struct KvLoyaltyStore {
    store: Arc<dyn KeyValueStore>,
}

impl KvLoyaltyStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

fn parse_millis(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    let millis: i64 = raw
        .trim()
        .parse()
        .map_err(|e| StoreError::corrupt(LAST_QUOTE_TIME_KEY, e))?;
    from_epoch_millis(millis).map_err(|e| StoreError::corrupt(LAST_QUOTE_TIME_KEY, e))
}

impl DomainPort for KvLoyaltyStore {}

#[async_trait]
impl LoyaltyPort for KvLoyaltyStore {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn last_quote_time(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, PortError> {
        let Some(raw) = self.store.get(user_id.as_str(), LAST_QUOTE_TIME_KEY).await? else {
            return Ok(None);
        };
        let at = parse_millis(&raw)?;
        debug!(%at, "Loaded last quote time");
        Ok(Some(at))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn record_quote_time(&self, user_id: &UserId, at: DateTime<Utc>) -> Result<(), PortError> {
        let raw = to_epoch_millis(at).to_string();
        self.store.put(user_id.as_str(), LAST_QUOTE_TIME_KEY, &raw).await?;
        Ok(())
    }
}
