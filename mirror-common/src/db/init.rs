//! Database bootstrap
//!
//! `mirror.db` holds a single `kv_store` table. Records are kept as whole
//! JSON arrays under one key each, so there is no relational schema to
//! migrate.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::Result;

const MAX_CONNECTIONS: u32 = 10;

/// Open `db_path`, creating the file and its parent folder when missing,
/// and ensure `kv_store` exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // WAL lets readers proceed while a record array is rewritten
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    create_kv_store_table(&pool).await?;

    let verb = if existed { "Opened" } else { "Created" };
    info!("{} database {}", verb, db_path.display());
    Ok(pool)
}

/// `value` holds serialized JSON text
pub async fn create_kv_store_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
