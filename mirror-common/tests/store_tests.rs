//! Integration tests for the SQLite key-value backend and record services
//!
//! Each test opens its own database inside a temporary directory.

use mirror_common::config::StorageBackend;
use mirror_common::db::init_database;
use mirror_common::records::{GiftService, NewGift, NewReceipt, ReceiptService, ReceiptStatus};
use mirror_common::store::{open_store, KeyValueStore, SqliteStore};
use mirror_common::Error;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

async fn sqlite_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let pool = init_database(&temp_dir.path().join("mirror.db"))
        .await
        .expect("database should initialize");
    (temp_dir, Arc::new(SqliteStore::new(pool)))
}

#[tokio::test]
async fn test_database_creates_kv_table() {
    let (_dir, store) = sqlite_store().await;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(store.pool())
    .await
    .unwrap();

    assert!(tables.contains(&"kv_store".to_string()));
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("mirror.db");

    let pool1 = init_database(&db_path).await.unwrap();
    let store = SqliteStore::new(pool1);
    store.set("receipts", &json!([])).await.unwrap();
    drop(store);

    let pool2 = init_database(&db_path).await.unwrap();
    let reopened = SqliteStore::new(pool2);
    assert_eq!(reopened.get("receipts").await.unwrap(), Some(json!([])));
}

#[tokio::test]
async fn test_sqlite_set_overwrites_and_deletes() {
    let (_dir, store) = sqlite_store().await;

    store.set("gifts", &json!([{"id": "1"}])).await.unwrap();
    store.set("gifts", &json!([{"id": "1"}, {"id": "2"}])).await.unwrap();
    assert_eq!(
        store.get("gifts").await.unwrap(),
        Some(json!([{"id": "1"}, {"id": "2"}]))
    );
    assert_eq!(store.keys().await.unwrap(), vec!["gifts".to_string()]);

    assert!(store.delete("gifts").await.unwrap());
    assert!(store.get("gifts").await.unwrap().is_none());
    assert!(!store.delete("gifts").await.unwrap());
}

#[tokio::test]
async fn test_receipts_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mirror.db");

    let receipt = {
        let store = open_store(StorageBackend::Sqlite, &db_path).await.unwrap();
        let receipts = ReceiptService::new(store);
        receipts
            .create_receipt(NewReceipt {
                email: "night@example.com".to_string(),
                name: "Night Owl".to_string(),
                plan: "premium".to_string(),
                amount_cents: 2900,
                currency: Some("eur".to_string()),
                payment_id: None,
                status: Some(ReceiptStatus::Pending),
            })
            .await
            .unwrap()
    };

    let store = open_store(StorageBackend::Sqlite, &db_path).await.unwrap();
    let receipts = ReceiptService::new(store);
    let loaded = receipts.get_receipt(&receipt.id).await.unwrap();
    assert_eq!(loaded, receipt);
    assert_eq!(loaded.currency, "EUR");
}

#[tokio::test]
async fn test_gift_redeem_on_sqlite() {
    let (_dir, store) = sqlite_store().await;
    let gifts = GiftService::new(store);

    let gift = gifts
        .create_gift(NewGift {
            giver_name: "Sun".to_string(),
            giver_email: "sun@example.com".to_string(),
            recipient_name: "Moon".to_string(),
            recipient_email: "moon@example.com".to_string(),
            message: None,
            plan: "essential".to_string(),
            amount_cents: 1500,
            paid: true,
        })
        .await
        .unwrap();

    gifts.redeem_gift(&gift.gift_code, "moon@example.com").await.unwrap();
    let second = gifts.redeem_gift(&gift.gift_code, "moon@example.com").await;
    assert!(matches!(second, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_memory_backend_selected() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let store = open_store(StorageBackend::Memory, &db_path).await.unwrap();

    assert_eq!(store.backend_name(), "memory");
    assert!(!db_path.exists(), "memory backend must not create a database");
}
