//! File store integration tests
//!
//! Runs the quotation service over a file-backed store in a temporary
//! directory and checks what lands on disk.

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;

use core_kernel::{FixedClock, UserId};
use domain_quote::{
    FormField, LoyaltyPort, PremiumEstimator, QuotationService, QuoteStatus, QuoteStorePort,
    SavedQuote, SessionStorePort, Step, FORM_VERSION,
};
use infra_store::{
    open_store, FileStore, KeyValueStore, QuoteStorage, StoreConfig, LAST_QUOTE_TIME_KEY,
    SAVED_QUOTES_KEY, SESSION_KEY,
};
use test_utils::{FormFixtures, SavedQuoteBuilder, TemporalFixtures, UserFixtures};

async fn storage_at(root: &Path) -> QuoteStorage {
    let store = open_store(&StoreConfig::file(root)).await.unwrap();
    QuoteStorage::new(store)
}

fn service_over(storage: &QuoteStorage, clock: Arc<FixedClock>) -> QuotationService {
    QuotationService::new(
        PremiumEstimator::default(),
        Arc::new(storage.sessions()),
        Arc::new(storage.quotes()),
        Arc::new(storage.loyalty()),
    )
    .with_clock(clock)
}

fn read_document(root: &Path, user: &UserId, key: &str) -> String {
    std::fs::read_to_string(root.join(user.as_str()).join(format!("{key}.json"))).unwrap()
}

// ============= SESSION PERSISTENCE TESTS =============

mod session_persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_session_survives_reopening_the_store() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let clock = Arc::new(FixedClock::new(TemporalFixtures::quote_time()));

        {
            let storage = storage_at(dir.path()).await;
            let service = service_over(&storage, clock.clone());
            service.update_fields(&user, &FormFixtures::complete()).await;
            service.next_step(&user).await.unwrap();
            service.next_step(&user).await.unwrap();
        }

        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, clock);
        let session = service.open_session(&user).await;

        assert_eq!(session.step(), Step::History);
        assert_eq!(session.data(), &FormFixtures::complete());
    }

    #[tokio::test]
    async fn test_stored_document_carries_version() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));

        service.update_fields(&user, &FormFixtures::baseline()).await;

        let document: serde_json::Value =
            serde_json::from_str(&read_document(dir.path(), &user, SESSION_KEY)).unwrap();
        assert_eq!(document["version"], FORM_VERSION);
        assert_eq!(document["data"]["coverageType"], "third-party");
        assert_eq!(document["data"]["excessAmount"], "1000");
        assert_eq!(
            document["updatedAt"],
            serde_json::to_value(TemporalFixtures::quote_time()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_old_version_on_disk_is_discarded() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let store = FileStore::open(dir.path()).await.unwrap();
        store
            .put(
                user.as_str(),
                SESSION_KEY,
                r#"{"version":"0.9.0","data":{"make":"Toyota"},"step":3}"#,
            )
            .await
            .unwrap();

        let storage = QuoteStorage::new(Arc::new(store.clone()));
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));
        let session = service.open_session(&user).await;

        assert_eq!(session.step(), Step::Vehicle);
        assert!(session.data().is_empty());
        assert_eq!(store.get(user.as_str(), SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_truncated_document_is_discarded() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let store = FileStore::open(dir.path()).await.unwrap();
        store
            .put(user.as_str(), SESSION_KEY, r#"{"version":"1.0.0","da"#)
            .await
            .unwrap();

        let storage = QuoteStorage::new(Arc::new(store.clone()));
        let sessions = storage.sessions();
        assert!(sessions.load(&user).await.is_err());

        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));
        assert!(service.open_session(&user).await.data().is_empty());
        assert_eq!(store.get(user.as_str(), SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));

        service.update_fields(&user, &FormFixtures::baseline()).await;
        assert!(dir.path().join(user.as_str()).join("insuranceQuote.json").exists());

        service.reset(&user).await;
        assert!(!dir.path().join(user.as_str()).join("insuranceQuote.json").exists());
    }
}

// ============= SAVED QUOTE TESTS =============

mod saved_quote_tests {
    use super::*;

    #[tokio::test]
    async fn test_saved_quotes_document_is_an_array() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));

        service.update_fields(&user, &FormFixtures::baseline()).await;
        let saved = service.save_quote(&user, QuoteStatus::Saved).await.unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&read_document(dir.path(), &user, SAVED_QUOTES_KEY)).unwrap();
        let entries = document.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["quote"], 350);
        assert_eq!(entries[0]["status"], "saved");
        assert_eq!(entries[0]["userId"], user.as_str());
        assert_eq!(entries[0]["formData"]["driverAge"], "30");
        assert_eq!(entries[0]["id"], serde_json::to_value(saved.id).unwrap());
    }

    #[tokio::test]
    async fn test_history_order_and_lookup_after_reopen() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let older: SavedQuote = SavedQuoteBuilder::new().with_quote(350).build();
        let newer: SavedQuote = SavedQuoteBuilder::new()
            .with_quote(1463)
            .with_form_data(FormFixtures::high_risk())
            .with_timestamp(TemporalFixtures::quote_time() + Duration::hours(1))
            .build();

        {
            let storage = storage_at(dir.path()).await;
            let quotes = storage.quotes();
            quotes.save(older.clone()).await.unwrap();
            quotes.save(newer.clone()).await.unwrap();
        }

        let quotes = storage_at(dir.path()).await.quotes();
        let listed = quotes.list_by_user(&user).await.unwrap();
        assert_eq!(listed, vec![newer.clone(), older]);
        assert_eq!(quotes.get(&user, newer.id).await.unwrap().form_data, FormFixtures::high_risk());
    }

    #[tokio::test]
    async fn test_load_saved_quote_restores_the_form() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));

        service.update_fields(&user, &FormFixtures::high_risk()).await;
        let saved = service.save_quote(&user, QuoteStatus::Draft).await.unwrap();
        service.reset(&user).await;

        let session = service.load_saved_quote(&user, saved.id).await.unwrap();
        assert_eq!(session.step(), Step::Vehicle);
        assert_eq!(session.data().get(FormField::CoverageType).as_deref(), Some("comprehensive"));
        assert_eq!(service.open_session(&user).await.data(), &FormFixtures::high_risk());
    }
}

// ============= LOYALTY TESTS =============

mod loyalty_tests {
    use super::*;

    #[tokio::test]
    async fn test_last_quote_time_written_as_epoch_millis() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let storage = storage_at(dir.path()).await;
        let clock = Arc::new(FixedClock::new(TemporalFixtures::quote_time()));
        let service = service_over(&storage, clock);

        service.update_fields(&user, &FormFixtures::baseline()).await;
        service.estimate(&user).await;

        let raw = read_document(dir.path(), &user, LAST_QUOTE_TIME_KEY);
        assert_eq!(raw, TemporalFixtures::quote_time().timestamp_millis().to_string());
        assert_eq!(
            storage.loyalty().last_quote_time(&user).await.unwrap(),
            Some(TemporalFixtures::quote_time())
        );
    }

    #[tokio::test]
    async fn test_loyalty_discount_across_restarts() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let clock = Arc::new(FixedClock::new(TemporalFixtures::quote_time()));

        {
            let storage = storage_at(dir.path()).await;
            let service = service_over(&storage, clock.clone());
            service.update_fields(&user, &FormFixtures::baseline()).await;
            assert_eq!(service.estimate(&user).await.premium_amount, 350);
        }

        clock.advance(Duration::days(30));
        let storage = storage_at(dir.path()).await;
        let service = service_over(&storage, clock);
        assert_eq!(service.estimate(&user).await.premium_amount, 315);
    }

    #[tokio::test]
    async fn test_unreadable_loyalty_time_is_ignored() {
        let dir = TempDir::new().unwrap();
        let user = UserFixtures::demo();
        let store = FileStore::open(dir.path()).await.unwrap();
        store
            .put(user.as_str(), LAST_QUOTE_TIME_KEY, "last tuesday")
            .await
            .unwrap();

        let storage = QuoteStorage::new(Arc::new(store));
        let service = service_over(&storage, Arc::new(FixedClock::new(TemporalFixtures::quote_time())));
        service.update_fields(&user, &FormFixtures::baseline()).await;

        let quote = service.estimate(&user).await;
        assert_eq!(quote.premium_amount, 350);
        assert_eq!(
            read_document(dir.path(), &user, LAST_QUOTE_TIME_KEY),
            TemporalFixtures::quote_time().timestamp_millis().to_string()
        );
    }
}
