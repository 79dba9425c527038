//! The import pipeline.
//!
//! Linear and fail-fast: validate the archive, replace any existing store,
//! extract into a scoped working area, create the schema, load the four
//! source tables, derive the stop-route association table, commit. Any step
//! failure aborts the rest; a partially written store is the caller's to
//! discard.

use std::path::Path;

use tracing::info;

use crate::error::FeedError;
use crate::feed::{self, FeedFile, WorkingArea};
use crate::loader::{load_stop_times, load_table};
use crate::schema::create_schema;
use crate::store::create_store;

/// Row counts from a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub routes: u64,
    pub trips: u64,
    pub stops: u64,
    pub stop_times: u64,
    pub stop_routes: u64,
}

/// Import the feed archive at `archive` into a fresh store at `store`.
///
/// Full-refresh: an existing store file at the target path is removed first,
/// never merged into. The import runs single-writer inside one transaction;
/// the working area is removed when this function returns, on success or
/// failure.
pub async fn import_feed(archive: &Path, store: &Path) -> Result<ImportSummary, FeedError> {
    feed::validate_archive(archive)?;

    if store.exists() {
        std::fs::remove_file(store)?;
        info!(store = %store.display(), "Removed existing store");
    }

    let area = WorkingArea::new()?;
    feed::extract(archive, &area)?;

    let pool = create_store(store).await?;
    create_schema(&pool).await?;

    let mut tx = pool.begin().await?;

    let mut routes_file = FeedFile::open(&area.file("routes.txt"))?;
    let routes = load_table(
        &mut tx,
        &mut routes_file,
        "routes",
        &[
            ("route_id", "id"),
            ("route_short_name", "short_name"),
            ("route_long_name", "long_name"),
        ],
    )
    .await?;
    info!(count = routes, "Loaded routes");

    let mut trips_file = FeedFile::open(&area.file("trips.txt"))?;
    let trips = load_table(
        &mut tx,
        &mut trips_file,
        "trips",
        &[("trip_id", "id"), ("route_id", "route_id")],
    )
    .await?;
    info!(count = trips, "Loaded trips");

    let mut stops_file = FeedFile::open(&area.file("stops.txt"))?;
    let stops = load_table(
        &mut tx,
        &mut stops_file,
        "stops",
        &[("stop_id", "id"), ("stop_name", "name")],
    )
    .await?;
    info!(count = stops, "Loaded stops");

    let mut stop_times_file = FeedFile::open(&area.file("stop_times.txt"))?;
    let stop_times = load_stop_times(&mut tx, &mut stop_times_file).await?;
    info!(count = stop_times, "Loaded stop times");

    // Derived table: one row per distinct (route, stop) pair reachable
    // through some trip. Recomputed from scratch each import.
    let stop_routes = sqlx::query(
        "INSERT INTO stop_routes (route_id, stop_id) \
         SELECT DISTINCT trips.route_id, stop_times.stop_id \
         FROM trips JOIN stop_times ON stop_times.trip_id = trips.id",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();
    info!(count = stop_routes, "Derived stop-route associations");

    tx.commit().await?;
    pool.close().await;

    Ok(ImportSummary {
        routes,
        trips,
        stops,
        stop_times,
        stop_routes,
    })
}
