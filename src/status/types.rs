//! Status types
//!
//! Classification values, probe strategies and the per-target snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::StatusError;

/// Outcome of a probe against one target.
///
/// `Pending` only exists before the first refresh; every probe resolves to
/// one of the four other values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Registered but never probed
    #[default]
    Pending,
    /// Responded in time with a success status (and a valid payload)
    Online,
    /// Transport failure other than a timeout
    Offline,
    /// No response before the timeout elapsed
    Timeout,
    /// Responded in time but reported failure
    Error,
}

impl ProbeStatus {
    /// The four values a completed probe can produce
    pub const OUTCOMES: [ProbeStatus; 4] = [
        ProbeStatus::Online,
        ProbeStatus::Offline,
        ProbeStatus::Timeout,
        ProbeStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Pending => "pending",
            ProbeStatus::Online => "online",
            ProbeStatus::Offline => "offline",
            ProbeStatus::Timeout => "timeout",
            ProbeStatus::Error => "error",
        }
    }

    /// True once the target has been probed at least once
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ProbeStatus::Pending)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a target is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStrategy {
    /// HEAD request, success status means online
    #[default]
    Reachability,
    /// GET with the current week window as query parameters; the body must
    /// parse as JSON
    WeeklyJson,
}

impl ProbeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStrategy::Reachability => "reachability",
            ProbeStrategy::WeeklyJson => "weekly-json",
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeStrategy {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reachability" | "head" => Ok(ProbeStrategy::Reachability),
            "weekly-json" | "weekly_json" | "json" => Ok(ProbeStrategy::WeeklyJson),
            _ => Err(StatusError::InvalidStrategy(s.to_string())),
        }
    }
}

/// A registered probe target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub strategy: ProbeStrategy,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            strategy: ProbeStrategy::Reachability,
        }
    }

    pub fn strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Last observed state of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub name: String,
    pub url: String,
    pub strategy: ProbeStrategy,
    pub status: ProbeStatus,
    /// When the last probe resolved
    pub checked_at: Option<DateTime<Utc>>,
    /// Wall time of the last probe in milliseconds
    pub latency_ms: Option<u64>,
}

impl StatusSnapshot {
    pub fn pending(target: Target) -> Self {
        Self {
            name: target.name,
            url: target.url,
            strategy: target.strategy,
            status: ProbeStatus::Pending,
            checked_at: None,
            latency_ms: None,
        }
    }

    pub fn target(&self) -> Target {
        Target {
            name: self.name.clone(),
            url: self.url.clone(),
            strategy: self.strategy,
        }
    }
}

/// Counts produced by one `refresh_all` round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub probed: usize,
    pub online: usize,
    pub offline: usize,
    pub timeout: usize,
    pub error: usize,
    pub duration_ms: u64,
}

impl RefreshSummary {
    pub fn record(&mut self, status: ProbeStatus) {
        self.probed += 1;
        match status {
            ProbeStatus::Online => self.online += 1,
            ProbeStatus::Offline => self.offline += 1,
            ProbeStatus::Timeout => self.timeout += 1,
            ProbeStatus::Error => self.error += 1,
            ProbeStatus::Pending => {}
        }
    }

    /// True when every probed target came back online
    pub fn all_online(&self) -> bool {
        self.online == self.probed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProbeStatus::Timeout).unwrap();
        assert_eq!(json, "\"timeout\"");
        let parsed: ProbeStatus = serde_json::from_str("\"offline\"").unwrap();
        assert_eq!(parsed, ProbeStatus::Offline);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "weekly-json".parse::<ProbeStrategy>().unwrap(),
            ProbeStrategy::WeeklyJson
        );
        assert_eq!(
            "HEAD".parse::<ProbeStrategy>().unwrap(),
            ProbeStrategy::Reachability
        );
        assert!(matches!(
            "ping".parse::<ProbeStrategy>(),
            Err(StatusError::InvalidStrategy(name)) if name == "ping"
        ));
    }

    #[test]
    fn test_target_defaults_to_reachability() {
        let target: Target =
            toml::from_str("name = \"GitHub API\"\nurl = \"https://api.github.com\"").unwrap();
        assert_eq!(target.strategy, ProbeStrategy::Reachability);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = RefreshSummary::default();
        summary.record(ProbeStatus::Online);
        summary.record(ProbeStatus::Timeout);
        summary.record(ProbeStatus::Online);

        assert_eq!(summary.probed, 3);
        assert_eq!(summary.online, 2);
        assert_eq!(summary.timeout, 1);
        assert!(!summary.all_online());
    }
}
