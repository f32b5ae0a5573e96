//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::feed::{ActivityAction, ActivityItem};
use crate::status::{ProbeStatus, ProbeStrategy, RefreshSummary, StatusSnapshot};
use crate::transit::{FormattedConnection, FormattedSection, SearchRecord};

// ============================================
// STATUS DTOs
// ============================================

/// One target with its indicator
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusEntry {
    pub name: String,
    pub url: String,
    pub strategy: ProbeStrategy,
    pub status: ProbeStatus,
    /// Indicator color (green, red, yellow, orange, gray)
    pub color: String,
    pub label: String,
    pub symbol: String,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

impl From<&StatusSnapshot> for StatusEntry {
    fn from(snapshot: &StatusSnapshot) -> Self {
        let indicator = snapshot.status.indicator();
        Self {
            name: snapshot.name.clone(),
            url: snapshot.url.clone(),
            strategy: snapshot.strategy,
            status: snapshot.status,
            color: indicator.color.to_string(),
            label: indicator.label.to_string(),
            symbol: indicator.symbol.to_string(),
            checked_at: snapshot.checked_at,
            latency_ms: snapshot.latency_ms,
        }
    }
}

/// Counts per status over the current snapshot
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub timeout: usize,
    pub error: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn from_snapshots(snapshots: &[StatusSnapshot]) -> Self {
        let mut counts = StatusCounts {
            total: snapshots.len(),
            ..Default::default()
        };
        for snapshot in snapshots {
            match snapshot.status {
                ProbeStatus::Online => counts.online += 1,
                ProbeStatus::Offline => counts.offline += 1,
                ProbeStatus::Timeout => counts.timeout += 1,
                ProbeStatus::Error => counts.error += 1,
                ProbeStatus::Pending => counts.pending += 1,
            }
        }
        counts
    }
}

/// Status list response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusListResponse {
    pub entries: Vec<StatusEntry>,
    pub counts: StatusCounts,
    /// One symbol per target, in registration order
    pub dots: String,
    /// Summary of the last completed refresh
    #[serde(default)]
    pub last_refresh: Option<RefreshSummary>,
}

/// Register target request
#[derive(Debug, Deserialize)]
pub struct RegisterTargetRequest {
    pub name: String,
    pub url: String,
    /// "reachability" (default) or "weekly-json"
    #[serde(default)]
    pub strategy: Option<String>,
}

/// Register target response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterTargetResponse {
    /// Position in registration order
    pub index: usize,
    pub entry: StatusEntry,
}

// ============================================
// FEED DTOs
// ============================================

/// Feed listing
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub total: usize,
    pub items: Vec<ActivityItem>,
}

/// New feed item
#[derive(Debug, Deserialize)]
pub struct CreateFeedItemRequest {
    /// Icon name, unknown names render as "menu"
    #[serde(default)]
    pub icon: Option<String>,
    pub title: String,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub action: Option<ActivityAction>,
}

// ============================================
// TRANSIT DTOs
// ============================================

/// Query string for a connection search
#[derive(Debug, Deserialize)]
pub struct ConnectionsParams {
    pub from: String,
    pub to: String,
    /// `YYYY-MM-DDTHH:MM[:SS]`, local time
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Formatted connection with its sections
#[derive(Debug, Serialize)]
pub struct ConnectionEntry {
    #[serde(flatten)]
    pub summary: FormattedConnection,
    pub sections: Vec<FormattedSection>,
}

/// Connection search response
#[derive(Debug, Serialize)]
pub struct ConnectionsListResponse {
    pub from: String,
    pub to: String,
    pub total: usize,
    pub connections: Vec<ConnectionEntry>,
}

/// Search history response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub searches: Vec<SearchRecord>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy, starting
    pub status: String,
    /// Registered targets
    pub targets: usize,
    /// Targets online after the last refresh
    pub online: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
