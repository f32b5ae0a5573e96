//! Statusboard API Server
//!
//! Run with: cargo run --bin statusboard-api
//!
//! # Configuration
//!
//! Settings come from `--config <PATH>` or, without it, the first config file
//! found (see [`Config::load_default`]), with environment overrides applied:
//! - `STATUSBOARD_API_HOST` / `STATUSBOARD_API_PORT`: bind address (default: 0.0.0.0:8086)
//! - `STATUSBOARD_DATA_DIR`: directory for local state
//! - `STATUSBOARD_PROBE_TIMEOUT_MS`: per-probe timeout (default: 10000)
//! - `STATUSBOARD_REFRESH_INTERVAL_SECS`: periodic refresh, 0 disables it
//! - `STATUSBOARD_TRANSIT_URL`: transport API base url
//! - `RUST_LOG`: Log filter, overrides the configured level

use statusboard::api::{serve, AppState};
use statusboard::config::Config;
use statusboard::feed::ActivityFeed;
use statusboard::status::{HttpProber, RefreshScheduler, StatusTracker};
use statusboard::store::LocalStore;
use statusboard::transit::{SearchHistory, TransitClient};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "statusboard-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Statusboard API server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_from(args.config.as_deref())?;
    statusboard::logging::init(&config.logging)?;

    tracing::info!("Starting Statusboard API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {:?}", config.storage.data_dir);

    // Status tracker with the configured targets
    let prober = Arc::new(HttpProber::new()?);
    let tracker = Arc::new(StatusTracker::new(prober).with_timeout(config.status.timeout()));
    for target in config.status.targets.iter().cloned() {
        tracker.register_target(target).await;
    }
    tracing::info!("Registered {} status targets", tracker.len().await);

    // Local state and transit
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;
    let store = Arc::new(LocalStore::open_in(&config.storage.data_dir).await);
    let history = Arc::new(SearchHistory::new(store).with_limit(config.transit.history_limit));
    let transit = Arc::new(TransitClient::new(
        config.transit.base_url.clone(),
        config.transit.timeout(),
    )?);
    tracing::info!("Transit API: {}", transit.base_url());

    let feed = Arc::new(ActivityFeed::with_defaults_today());

    // Initial refresh so the first requests see resolved entries
    let summary = tracker.refresh_all().await;
    tracing::info!(
        online = summary.online,
        probed = summary.probed,
        duration_ms = summary.duration_ms,
        "Initial status refresh complete"
    );

    let scheduler = config.status.refresh_interval().map(|interval| {
        tracing::info!("Refreshing status every {:?}", interval);
        let scheduler = Arc::new(RefreshScheduler::new(Arc::clone(&tracker), interval));
        let handle = Arc::clone(&scheduler).start();
        (scheduler, handle)
    });

    let state = AppState::new(tracker, feed, transit, history, config.api.clone())
        .with_transit_limit(config.transit.default_limit);

    // Run server
    serve(state).await?;

    if let Some((scheduler, handle)) = scheduler {
        tracing::info!("Stopping status scheduler...");
        scheduler.stop().await;
        handle.abort();
    }

    tracing::info!("Statusboard API server stopped");
    Ok(())
}
