//! Store schema: the five normalized tables an import populates.

use sqlx::SqlitePool;

use crate::error::FeedError;

/// Create the five tables in a fresh store.
///
/// Plain CREATE TABLE, no IF NOT EXISTS: if any table already exists the
/// statement fails, so a non-empty target store is rejected up front.
/// Foreign keys are declared but not enforced at runtime (SQLite default);
/// referential integrity is best-effort and depends on feed consistency.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), FeedError> {
    sqlx::query(
        r#"
        CREATE TABLE routes (
            id INTEGER PRIMARY KEY,
            short_name TEXT,
            long_name TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE trips (
            id TEXT PRIMARY KEY,
            route_id INTEGER,
            FOREIGN KEY(route_id) REFERENCES routes(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE stops (
            name TEXT,
            id INTEGER PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE stop_times (
            stop_id INTEGER,
            trip_id TEXT,
            departure_time_seconds INTEGER,
            FOREIGN KEY(trip_id) REFERENCES trips(id),
            FOREIGN KEY(stop_id) REFERENCES stops(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE stop_routes (
            route_id INTEGER,
            stop_id INTEGER,
            FOREIGN KEY(route_id) REFERENCES routes(id),
            FOREIGN KEY(stop_id) REFERENCES stops(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
