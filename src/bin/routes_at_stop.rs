//! Print the routes serving a stop, with earliest and latest departures.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gtfs_store::{query, store::open_store, FeedError};

#[derive(Parser)]
#[command(name = "routes-at-stop", about = "List the routes serving a stop")]
struct Args {
    /// Path to an imported store file (.sqlite)
    store: PathBuf,
    /// Stop id to look up
    stop_id: i64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,sqlx=warn".into()),
        )
        .init();

    let args = Args::parse();

    if args.store.extension().and_then(|e| e.to_str()) != Some("sqlite") {
        eprintln!("{} is not a .sqlite store", args.store.display());
        return ExitCode::FAILURE;
    }
    if !args.store.exists() {
        eprintln!("Store {} not found", args.store.display());
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), FeedError> {
    let pool = open_store(&args.store).await?;

    if !query::stop_exists(&pool, args.stop_id).await? {
        println!("Stop {} not found in store.", args.stop_id);
        return Ok(());
    }

    println!("Stop ID : {}", args.stop_id);
    println!("Stop Name : {}", query::stop_name(&pool, args.stop_id).await?);

    let mut route_ids: Vec<i64> = query::routes_through_stop(&pool, args.stop_id)
        .await?
        .into_iter()
        .collect();
    route_ids.sort_unstable();

    if route_ids.is_empty() {
        println!("No routes found stopping at ID {}", args.stop_id);
        return Ok(());
    }

    println!("Routes Stopping:");
    for route_id in route_ids {
        let short_name = query::route_short_name(&pool, route_id).await?;
        let long_name = query::route_long_name(&pool, route_id).await?;
        let earliest = query::earliest_departure(&pool, route_id, args.stop_id).await?;
        let latest = query::latest_departure(&pool, route_id, args.stop_id).await?;
        println!("{short_name} - {long_name} (earliest {earliest}; latest {latest})");
    }
    Ok(())
}
