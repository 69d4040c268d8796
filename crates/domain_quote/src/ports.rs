//! Quotation Domain Ports
//!
//! Storage interfaces the quotation service depends on. Adapters live in
//! `infra_store` (file-backed and in-memory key-value storage); the mock
//! adapters in this module keep unit tests free of any storage.
//!
//! | Port | Durable key | Content |
//! |------|-------------|---------|
//! | `SessionStorePort` | `insuranceQuote` | versioned in-progress form |
//! | `QuoteStorePort` | `savedQuotes` | append-only saved quote history |
//! | `LoyaltyPort` | `lastQuoteTime` | instant of the last computed quote |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_quote::ports::{QuoteStorePort, SessionStorePort, LoyaltyPort};
//!
//! let service = QuotationService::new(
//!     PremiumEstimator::default(),
//!     Arc::new(storage.sessions()),
//!     Arc::new(storage.quotes()),
//!     Arc::new(storage.loyalty()),
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, PortError, QuoteId, UserId};

use crate::quote::SavedQuote;
use crate::session::SessionRecord;

/// Append-only history of saved quotes per user
#[async_trait]
pub trait QuoteStorePort: DomainPort {
    /// Appends a saved quote and returns its identifier
    async fn save(&self, quote: SavedQuote) -> Result<QuoteId, PortError>;

    /// Lists a user's saved quotes, most recent first
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<SavedQuote>, PortError>;

    /// Fetches one saved quote belonging to the user
    async fn get(&self, user_id: &UserId, id: QuoteId) -> Result<SavedQuote, PortError>;
}

/// Durable in-progress form per user
#[async_trait]
pub trait SessionStorePort: DomainPort {
    /// Loads the stored record, if any
    ///
    /// A record that cannot be decoded is reported as
    /// `PortError::Serialization`.
    async fn load(&self, user_id: &UserId) -> Result<Option<SessionRecord>, PortError>;

    async fn save(&self, user_id: &UserId, record: &SessionRecord) -> Result<(), PortError>;

    async fn clear(&self, user_id: &UserId) -> Result<(), PortError>;
}

/// When each user last computed a quote
#[async_trait]
pub trait LoyaltyPort: DomainPort {
    async fn last_quote_time(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, PortError>;

    async fn record_quote_time(&self, user_id: &UserId, at: DateTime<Utc>) -> Result<(), PortError>;
}

/// Mock implementations of the quotation ports for testing
///
/// These adapters keep everything in memory and are useful for unit testing
/// services without touching the filesystem.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock of QuoteStorePort
    #[derive(Debug, Default)]
    pub struct MockQuoteStore {
        quotes: Arc<RwLock<HashMap<UserId, Vec<SavedQuote>>>>,
    }

    impl MockQuoteStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockQuoteStore {}

    #[async_trait]
    impl QuoteStorePort for MockQuoteStore {
        async fn save(&self, quote: SavedQuote) -> Result<QuoteId, PortError> {
            let id = quote.id;
            self.quotes
                .write()
                .await
                .entry(quote.user_id.clone())
                .or_default()
                .push(quote);
            Ok(id)
        }

        async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<SavedQuote>, PortError> {
            let mut quotes = self
                .quotes
                .read()
                .await
                .get(user_id)
                .cloned()
                .unwrap_or_default();
            quotes.reverse();
            Ok(quotes)
        }

        async fn get(&self, user_id: &UserId, id: QuoteId) -> Result<SavedQuote, PortError> {
            self.quotes
                .read()
                .await
                .get(user_id)
                .and_then(|quotes| quotes.iter().find(|q| q.id == id).cloned())
                .ok_or_else(|| PortError::not_found("SavedQuote", id))
        }
    }

    /// In-memory mock of SessionStorePort
    #[derive(Debug, Default)]
    pub struct MockSessionStore {
        records: Arc<RwLock<HashMap<UserId, SessionRecord>>>,
    }

    impl MockSessionStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates a record for testing
        pub async fn with_record(user_id: UserId, record: SessionRecord) -> Self {
            let store = Self::new();
            store.records.write().await.insert(user_id, record);
            store
        }

        /// Returns the stored record without going through the port
        pub async fn stored(&self, user_id: &UserId) -> Option<SessionRecord> {
            self.records.read().await.get(user_id).cloned()
        }
    }

    impl DomainPort for MockSessionStore {}

    #[async_trait]
    impl SessionStorePort for MockSessionStore {
        async fn load(&self, user_id: &UserId) -> Result<Option<SessionRecord>, PortError> {
            Ok(self.records.read().await.get(user_id).cloned())
        }

        async fn save(&self, user_id: &UserId, record: &SessionRecord) -> Result<(), PortError> {
            self.records
                .write()
                .await
                .insert(user_id.clone(), record.clone());
            Ok(())
        }

        async fn clear(&self, user_id: &UserId) -> Result<(), PortError> {
            self.records.write().await.remove(user_id);
            Ok(())
        }
    }

    /// In-memory mock of LoyaltyPort
    #[derive(Debug, Default)]
    pub struct MockLoyaltyPort {
        times: Arc<RwLock<HashMap<UserId, DateTime<Utc>>>>,
    }

    impl MockLoyaltyPort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockLoyaltyPort {}

    #[async_trait]
    impl LoyaltyPort for MockLoyaltyPort {
        async fn last_quote_time(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, PortError> {
            Ok(self.times.read().await.get(user_id).copied())
        }

        async fn record_quote_time(&self, user_id: &UserId, at: DateTime<Utc>) -> Result<(), PortError> {
            self.times.write().await.insert(user_id.clone(), at);
            Ok(())
        }
    }

    /// A store whose every operation fails as unavailable
    #[derive(Debug, Default, Clone, Copy)]
    pub struct UnavailableStore;

    impl DomainPort for UnavailableStore {}

    #[async_trait]
    impl QuoteStorePort for UnavailableStore {
        async fn save(&self, _quote: SavedQuote) -> Result<QuoteId, PortError> {
            Err(PortError::unavailable("store offline"))
        }

        async fn list_by_user(&self, _user_id: &UserId) -> Result<Vec<SavedQuote>, PortError> {
            Err(PortError::unavailable("store offline"))
        }

        async fn get(&self, _user_id: &UserId, _id: QuoteId) -> Result<SavedQuote, PortError> {
            Err(PortError::unavailable("store offline"))
        }
    }

    #[async_trait]
    impl SessionStorePort for UnavailableStore {
        async fn load(&self, _user_id: &UserId) -> Result<Option<SessionRecord>, PortError> {
            Err(PortError::unavailable("store offline"))
        }

        async fn save(&self, _user_id: &UserId, _record: &SessionRecord) -> Result<(), PortError> {
            Err(PortError::unavailable("store offline"))
        }

        async fn clear(&self, _user_id: &UserId) -> Result<(), PortError> {
            Err(PortError::unavailable("store offline"))
        }
    }

    #[async_trait]
    impl LoyaltyPort for UnavailableStore {
        async fn last_quote_time(&self, _user_id: &UserId) -> Result<Option<DateTime<Utc>>, PortError> {
            Err(PortError::unavailable("store offline"))
        }

        async fn record_quote_time(&self, _user_id: &UserId, _at: DateTime<Utc>) -> Result<(), PortError> {
            Err(PortError::unavailable("store offline"))
        }
    }
}
