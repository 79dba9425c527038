//! Import a GTFS feed archive into a SQLite store.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gtfs_store::import_feed;

#[derive(Parser)]
#[command(name = "gtfs-import", about = "Import a GTFS feed archive into a SQLite store")]
struct Args {
    /// Path to the feed archive (.zip)
    archive: PathBuf,
    /// Path of the store file to create
    store: PathBuf,
    /// Overwrite an existing store without asking
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let args = Args::parse();

    if args.archive.extension().and_then(|e| e.to_str()) != Some("zip") {
        eprintln!("{} is not a .zip archive", args.archive.display());
        return ExitCode::FAILURE;
    }
    if !args.archive.exists() {
        eprintln!("Archive {} not found", args.archive.display());
        return ExitCode::FAILURE;
    }
    if args.store.exists() && !args.force && !confirm_overwrite(&args.store) {
        eprintln!("Aborting.");
        return ExitCode::FAILURE;
    }

    match import_feed(&args.archive, &args.store).await {
        Ok(summary) => {
            tracing::info!(
                routes = summary.routes,
                trips = summary.trips,
                stops = summary.stops,
                stop_times = summary.stop_times,
                stop_routes = summary.stop_routes,
                "Import complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Import failed");
            ExitCode::FAILURE
        }
    }
}

fn confirm_overwrite(store: &std::path::Path) -> bool {
    let stdin = io::stdin();
    loop {
        print!("Store {} already exists, overwrite? (y/n) ", store.display());
        let _ = io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() {
            return false;
        }
        match line.trim().to_lowercase().as_str() {
            "y" => return true,
            "n" => return false,
            _ => continue,
        }
    }
}
