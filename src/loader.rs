//! Column-mapped bulk loading of feed files into store tables.

use sqlx::{Sqlite, Transaction};

use crate::error::FeedError;
use crate::feed::FeedFile;
use crate::time::decode_clock;

/// Insert one record per feed row, projecting the source columns named in
/// `column_map` (ordered `(source_column, target_column)` pairs) into the
/// target table. Values are bound verbatim; the store applies column
/// affinity. A constraint violation aborts the whole load.
pub async fn load_table(
    tx: &mut Transaction<'_, Sqlite>,
    file: &mut FeedFile,
    table: &str,
    column_map: &[(&str, &str)],
) -> Result<u64, FeedError> {
    let mut indices = Vec::with_capacity(column_map.len());
    for (source, _) in column_map {
        indices.push(file.require_column(source)?);
    }
    let targets: Vec<&str> = column_map.iter().map(|(_, target)| *target).collect();
    let placeholders = vec!["?"; column_map.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        targets.join(", ")
    );

    let mut inserted = 0u64;
    for record in file.records() {
        let record = record?;
        let mut query = sqlx::query(&sql);
        for &idx in &indices {
            query = query.bind(record.get(idx).unwrap_or("").to_string());
        }
        query.execute(&mut **tx).await?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Specialized loader for the stop-times file: `stop_id` and `trip_id` are
/// copied verbatim, `departure_time_seconds` is computed from the raw
/// `departure_time` clock string. A malformed clock string aborts the load.
pub async fn load_stop_times(
    tx: &mut Transaction<'_, Sqlite>,
    file: &mut FeedFile,
) -> Result<u64, FeedError> {
    let idx_stop = file.require_column("stop_id")?;
    let idx_trip = file.require_column("trip_id")?;
    let idx_departure = file.require_column("departure_time")?;

    let mut inserted = 0u64;
    for record in file.records() {
        let record = record?;
        let seconds = decode_clock(record.get(idx_departure).unwrap_or(""))?;
        sqlx::query(
            "INSERT INTO stop_times (stop_id, trip_id, departure_time_seconds) \
             VALUES (?, ?, ?)",
        )
        .bind(record.get(idx_stop).unwrap_or("").to_string())
        .bind(record.get(idx_trip).unwrap_or("").to_string())
        .bind(seconds as i64)
        .execute(&mut **tx)
        .await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::create_schema;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::path::PathBuf;
    use std::str::FromStr;

    async fn fresh_store() -> SqlitePool {
        // Match the documented store behavior: foreign keys declared but not
        // enforced (sqlx enables the pragma by default, SQLite does not).
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    fn write_feed_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_mapped_columns_in_order() {
        let pool = fresh_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_feed_file(
            &dir,
            "routes.txt",
            "route_long_name,route_id,route_short_name\nTest Route,29,T29\n",
        );

        let mut file = FeedFile::open(&path).unwrap();
        let mut tx = pool.begin().await.unwrap();
        let count = load_table(
            &mut tx,
            &mut file,
            "routes",
            &[
                ("route_id", "id"),
                ("route_short_name", "short_name"),
                ("route_long_name", "long_name"),
            ],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(count, 1);

        let row: (i64, String, String) =
            sqlx::query_as("SELECT id, short_name, long_name FROM routes")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row, (29, "T29".to_string(), "Test Route".to_string()));
    }

    #[tokio::test]
    async fn fails_on_missing_source_column() {
        let pool = fresh_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_feed_file(&dir, "trips.txt", "trip_id\nT1\n");

        let mut file = FeedFile::open(&path).unwrap();
        let mut tx = pool.begin().await.unwrap();
        let result = load_table(
            &mut tx,
            &mut file,
            "trips",
            &[("trip_id", "id"), ("route_id", "route_id")],
        )
        .await;
        assert!(matches!(result, Err(FeedError::Format(_))));
    }

    #[tokio::test]
    async fn duplicate_primary_key_is_a_storage_error() {
        let pool = fresh_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_feed_file(&dir, "stops.txt", "stop_id,stop_name\n100,A\n100,B\n");

        let mut file = FeedFile::open(&path).unwrap();
        let mut tx = pool.begin().await.unwrap();
        let result = load_table(
            &mut tx,
            &mut file,
            "stops",
            &[("stop_id", "id"), ("stop_name", "name")],
        )
        .await;
        assert!(matches!(result, Err(FeedError::Storage(_))));
    }

    #[tokio::test]
    async fn stop_times_loader_computes_departure_seconds() {
        let pool = fresh_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_feed_file(
            &dir,
            "stop_times.txt",
            "trip_id,stop_id,departure_time\nT1,100,05:40:36\nT1,200,25:00:00\n",
        );

        let mut file = FeedFile::open(&path).unwrap();
        let mut tx = pool.begin().await.unwrap();
        let count = load_stop_times(&mut tx, &mut file).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(count, 2);

        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT stop_id, trip_id, departure_time_seconds \
             FROM stop_times ORDER BY departure_time_seconds",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows[0], (100, "T1".to_string(), 20436));
        assert_eq!(rows[1], (200, "T1".to_string(), 90000));
    }

    #[tokio::test]
    async fn malformed_departure_time_aborts_the_load() {
        let pool = fresh_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_feed_file(
            &dir,
            "stop_times.txt",
            "trip_id,stop_id,departure_time\nT1,100,not-a-time\n",
        );

        let mut file = FeedFile::open(&path).unwrap();
        let mut tx = pool.begin().await.unwrap();
        let result = load_stop_times(&mut tx, &mut file).await;
        assert!(matches!(result, Err(FeedError::Format(_))));
    }
}
