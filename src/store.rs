//! Opening and creating store files.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::FeedError;

/// Create a store file at `path` and return a single-connection pool.
///
/// The import is single-writer by design; one connection keeps every
/// statement on the same transaction-capable handle.
pub async fn create_store(path: &Path) -> Result<SqlitePool, FeedError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open an existing store read-only for queries.
pub async fn open_store(path: &Path) -> Result<SqlitePool, FeedError> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}
