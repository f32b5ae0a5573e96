//! # Statusboard
//!
//! Personal dashboard backend: live API status checks, an activity feed and
//! Swiss public transit connection lookups, served over a small REST API.
//!
//! ## Features
//!
//! - **Status tracking**: concurrent, time-bounded probes classified as
//!   online, offline, timeout or error
//! - **Weekly JSON checks**: endpoints validated against the current
//!   Monday-to-Monday window
//! - **Transit**: connection search with formatted summaries and a search history
//! - **Activity feed**: dated dashboard items with links and popups
//!
//! ## Modules
//!
//! - [`status`]: Prober, tracker and status indicators
//! - [`transit`]: Connection search, formatting and history
//! - [`feed`]: Activity feed items
//! - [`store`]: File-backed key/value state
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statusboard::status::{render_status_list, HttpProber, StatusTracker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = StatusTracker::new(Arc::new(HttpProber::new()?));
//!     tracker.register("GitHub API", "https://api.github.com").await;
//!     tracker.register("JSONPlaceholder", "https://jsonplaceholder.typicode.com").await;
//!
//!     let summary = tracker.refresh_all().await;
//!     println!("{}/{} online", summary.online, summary.probed);
//!     print!("{}", render_status_list(&tracker.snapshot().await));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod feed;
pub mod logging;
pub mod status;
pub mod store;
pub mod transit;

// Re-export top-level types for convenience
pub use status::{
    HttpProber, ProbeStatus, ProbeStrategy, Prober, RefreshScheduler, RefreshSummary,
    StatusError, StatusSnapshot, StatusTracker, Target, WeekWindow,
};

pub use transit::{
    ConnectionQuery, FormattedConnection, FormattedSection, SearchHistory, SearchRecord,
    TransitClient, TransitError,
};

pub use feed::{ActivityAction, ActivityFeed, ActivityIcon, ActivityItem};

pub use store::{LocalStore, StoreError, StoreResult};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, Config, ConfigError, LoggingConfig, StatusConfig, StorageConfig, TransitConfig,
};
