//! GTFS feed import into a normalized SQLite store, plus lookup queries.
//!
//! The import pipeline validates a feed archive, extracts the required files
//! into a scoped working area, loads them into five normalized tables, and
//! derives the stop-route association table. The query side answers which
//! routes serve a stop and the earliest/latest departure of a route at a
//! stop.

pub mod error;
pub mod feed;
pub mod import;
pub mod loader;
pub mod query;
pub mod schema;
pub mod store;
pub mod time;

pub use error::FeedError;
pub use import::{import_feed, ImportSummary};
