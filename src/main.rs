//! Statusboard one-shot check
//!
//! Probes every configured target once and prints the status list.

use statusboard::config::Config;
use statusboard::status::{render_status_list, HttpProber, StatusTracker};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "statusboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Probe every configured target once and print the result")]
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

    tracing::info!("Statusboard v{}", env!("CARGO_PKG_VERSION"));

    let prober = Arc::new(HttpProber::new()?);
    let tracker = StatusTracker::new(prober).with_timeout(config.status.timeout());

    for target in config.status.targets.iter().cloned() {
        tracker.register_target(target).await;
    }

    if tracker.is_empty().await {
        println!("No status targets configured");
        return Ok(());
    }

    tracing::info!(
        targets = tracker.len().await,
        timeout_ms = config.status.timeout_ms,
        "Checking targets"
    );

    let summary = tracker.refresh_all().await;
    print!("{}", render_status_list(&tracker.snapshot().await));
    println!();
    println!(
        "{}/{} online ({} offline, {} timeout, {} error) in {} ms",
        summary.online,
        summary.probed,
        summary.offline,
        summary.timeout,
        summary.error,
        summary.duration_ms
    );

    Ok(())
}
