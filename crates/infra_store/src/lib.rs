//! Infrastructure Storage Layer
//!
//! This crate provides durable storage for the quotation system behind the
//! domain's port traits.
//!
//! # Architecture
//!
//! Storage is a namespaced key-value store. The namespace is the user id and
//! each key holds one JSON document:
//!
//! | Key | Document |
//! |-----|----------|
//! | `insuranceQuote` | versioned in-progress form |
//! | `savedQuotes` | array of saved quotes, oldest first |
//! | `lastQuoteTime` | epoch milliseconds of the last computed quote |
//!
//! Two stores implement [`KeyValueStore`]:
//! - [`FileStore`]: one file per key under a root directory, written atomically
//! - [`MemoryStore`]: process-local, for tests and throwaway servers
//!
//! The adapters in [`adapters`] implement the domain ports on top of either.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::{open_store, QuoteStorage, StoreConfig};
//!
//! let store = open_store(&StoreConfig::file("./data")).await?;
//! let storage = QuoteStorage::new(store);
//! let service = QuotationService::new(
//!     PremiumEstimator::default(),
//!     Arc::new(storage.sessions()),
//!     Arc::new(storage.quotes()),
//!     Arc::new(storage.loyalty()),
//! );
//! ```

pub mod adapters;
pub mod config;
pub mod error;
pub mod kv;

pub use adapters::{KvLoyaltyStore, KvQuoteStore, KvSessionStore, QuoteStorage};
pub use config::{open_store, StoreBackend, StoreConfig};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Key of the in-progress form document
pub const SESSION_KEY: &str = "insuranceQuote";

/// Key of the saved quote history
pub const SAVED_QUOTES_KEY: &str = "savedQuotes";

/// Key of the last quote computation instant
pub const LAST_QUOTE_TIME_KEY: &str = "lastQuoteTime";
