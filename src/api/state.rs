//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::feed::ActivityFeed;
use crate::status::StatusTracker;
use crate::transit::{SearchHistory, TransitClient};

pub use crate::config::ApiConfig;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Registered targets and their last known status
    pub tracker: Arc<StatusTracker>,
    /// Dashboard activity feed
    pub feed: Arc<ActivityFeed>,
    /// Connection search client
    pub transit: Arc<TransitClient>,
    /// Recent transit searches
    pub history: Arc<SearchHistory>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Connections requested when the client gives no limit
    pub transit_limit: u32,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        tracker: Arc<StatusTracker>,
        feed: Arc<ActivityFeed>,
        transit: Arc<TransitClient>,
        history: Arc<SearchHistory>,
        config: ApiConfig,
    ) -> Self {
        Self {
            tracker,
            feed,
            transit,
            history,
            config: Arc::new(config),
            transit_limit: 10,
            start_time: Instant::now(),
        }
    }

    pub fn with_transit_limit(mut self, limit: u32) -> Self {
        self.transit_limit = limit;
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
