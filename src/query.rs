//! Read-only lookups over a populated store.
//!
//! Absence of data is not an error in this domain: every lookup returns an
//! empty-result sentinel (false, empty string, empty set) when nothing
//! matches. Only store-access failures surface as errors.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::error::FeedError;
use crate::time::encode_seconds;

pub async fn stop_exists(pool: &SqlitePool, stop_id: i64) -> Result<bool, FeedError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM stops WHERE id = ?")
        .bind(stop_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// The stop's name, or an empty string if the stop is absent.
pub async fn stop_name(pool: &SqlitePool, stop_id: i64) -> Result<String, FeedError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM stops WHERE id = ?")
        .bind(stop_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(name,)| name).unwrap_or_default())
}

/// Ids of every route with at least one trip serving the stop.
pub async fn routes_through_stop(
    pool: &SqlitePool,
    stop_id: i64,
) -> Result<HashSet<i64>, FeedError> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT route_id FROM stop_routes WHERE stop_id = ?")
            .bind(stop_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(route_id,)| route_id).collect())
}

/// The route's short name, or an empty string if the route is absent.
pub async fn route_short_name(pool: &SqlitePool, route_id: i64) -> Result<String, FeedError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT short_name FROM routes WHERE id = ?")
            .bind(route_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(name,)| name).unwrap_or_default())
}

/// The route's long name, or an empty string if the route is absent.
pub async fn route_long_name(pool: &SqlitePool, route_id: i64) -> Result<String, FeedError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT long_name FROM routes WHERE id = ?")
            .bind(route_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(name,)| name).unwrap_or_default())
}

/// Earliest departure of the route at the stop as "HH:MM:SS", or an empty
/// string when the pair has no scheduled stop-time.
pub async fn earliest_departure(
    pool: &SqlitePool,
    route_id: i64,
    stop_id: i64,
) -> Result<String, FeedError> {
    departure_bound(pool, route_id, stop_id, "MIN").await
}

/// Latest departure of the route at the stop, analogous to
/// [`earliest_departure`].
pub async fn latest_departure(
    pool: &SqlitePool,
    route_id: i64,
    stop_id: i64,
) -> Result<String, FeedError> {
    departure_bound(pool, route_id, stop_id, "MAX").await
}

async fn departure_bound(
    pool: &SqlitePool,
    route_id: i64,
    stop_id: i64,
    aggregate: &str,
) -> Result<String, FeedError> {
    let sql = format!(
        "SELECT {aggregate}(stop_times.departure_time_seconds) \
         FROM stop_times JOIN trips ON stop_times.trip_id = trips.id \
         WHERE stop_times.stop_id = ? AND trips.route_id = ?"
    );
    let (seconds,): (Option<i64>,) = sqlx::query_as(&sql)
        .bind(stop_id)
        .bind(route_id)
        .fetch_one(pool)
        .await?;
    Ok(seconds
        .map(|s| encode_seconds(s as u32))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded_store() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO routes (id, short_name, long_name) VALUES (29, 'T29', 'Test Route')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO stops (id, name) VALUES (100, 'Main St')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO trips (id, route_id) VALUES ('T1', 29)")
            .execute(&pool)
            .await
            .unwrap();
        for seconds in [20436i64, 30000, 45000] {
            sqlx::query(
                "INSERT INTO stop_times (stop_id, trip_id, departure_time_seconds) \
                 VALUES (100, 'T1', ?)",
            )
            .bind(seconds)
            .execute(&pool)
            .await
            .unwrap();
        }
        sqlx::query("INSERT INTO stop_routes (route_id, stop_id) VALUES (29, 100)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn present_stop_is_found() {
        let pool = seeded_store().await;
        assert!(stop_exists(&pool, 100).await.unwrap());
        assert_eq!(stop_name(&pool, 100).await.unwrap(), "Main St");
        assert_eq!(
            routes_through_stop(&pool, 100).await.unwrap(),
            HashSet::from([29])
        );
        assert_eq!(route_short_name(&pool, 29).await.unwrap(), "T29");
        assert_eq!(route_long_name(&pool, 29).await.unwrap(), "Test Route");
    }

    #[tokio::test]
    async fn absent_ids_return_sentinels() {
        let pool = seeded_store().await;
        assert!(!stop_exists(&pool, 999).await.unwrap());
        assert_eq!(stop_name(&pool, 999).await.unwrap(), "");
        assert!(routes_through_stop(&pool, 999).await.unwrap().is_empty());
        assert_eq!(route_short_name(&pool, 999).await.unwrap(), "");
        assert_eq!(route_long_name(&pool, 999).await.unwrap(), "");
        assert_eq!(earliest_departure(&pool, 999, 100).await.unwrap(), "");
        assert_eq!(latest_departure(&pool, 29, 999).await.unwrap(), "");
    }

    #[tokio::test]
    async fn departure_bounds_are_ordered() {
        let pool = seeded_store().await;
        let earliest = earliest_departure(&pool, 29, 100).await.unwrap();
        let latest = latest_departure(&pool, 29, 100).await.unwrap();
        assert_eq!(earliest, "05:40:36");
        assert_eq!(latest, "12:30:00");
        assert!(earliest <= latest);
    }
}
