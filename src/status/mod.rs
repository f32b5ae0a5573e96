//! API Status Tracking
//!
//! Probes a list of named endpoints and keeps their last known state:
//! - [`Prober`] / [`HttpProber`]: one bounded-time check, classified as
//!   online, offline, timeout or error
//! - [`StatusTracker`]: registered targets, concurrent refresh, snapshots
//! - [`RefreshScheduler`]: optional periodic refresh
//! - [`WeekWindow`]: Monday-to-Monday window used by weekly-JSON probes
//!
//! # Example
//!
//! ```rust,no_run
//! use statusboard::status::{HttpProber, ProbeStrategy, StatusTracker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = StatusTracker::new(Arc::new(HttpProber::new()?));
//!     tracker.register("GitHub API", "https://api.github.com").await;
//!     tracker
//!         .register_with(
//!             "ETH Mensa",
//!             "https://idapps.ethz.ch/cookpit-pub-services/v1/weeklyrotas?client-id=ethz-wcms&lang=de",
//!             ProbeStrategy::WeeklyJson,
//!         )
//!         .await;
//!
//!     tracker.refresh_all().await;
//!     for entry in tracker.snapshot().await {
//!         println!("{}: {}", entry.name, entry.status);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod indicator;
mod prober;
mod scheduler;
mod tracker;
mod types;
mod window;

pub use error::StatusError;
pub use indicator::{render_dots, render_status_list, Indicator};
pub use prober::{HttpProber, Prober, DEFAULT_PROBE_TIMEOUT_MS};
pub use scheduler::RefreshScheduler;
pub use tracker::StatusTracker;
pub use types::{ProbeStatus, ProbeStrategy, RefreshSummary, StatusSnapshot, Target};
pub use window::{WeekWindow, VALID_AFTER_PARAM, VALID_BEFORE_PARAM};
