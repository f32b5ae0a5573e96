//! Status presentation
//!
//! Maps a classification to a colored indicator and renders snapshot lists
//! for terminals and API clients.

use serde::Serialize;
use std::fmt::Write as _;

use super::types::{ProbeStatus, StatusSnapshot};

/// Visual representation of one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub color: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
}

impl ProbeStatus {
    pub fn indicator(&self) -> Indicator {
        match self {
            ProbeStatus::Online => Indicator {
                color: "green",
                label: "Online",
                symbol: "✓",
            },
            ProbeStatus::Offline => Indicator {
                color: "red",
                label: "Offline",
                symbol: "✗",
            },
            ProbeStatus::Timeout => Indicator {
                color: "yellow",
                label: "Timeout",
                symbol: "⏱",
            },
            ProbeStatus::Error => Indicator {
                color: "orange",
                label: "Error",
                symbol: "⚠",
            },
            ProbeStatus::Pending => Indicator {
                color: "gray",
                label: "Pending",
                symbol: "⋯",
            },
        }
    }
}

/// Compact strip with one symbol per target, in registration order
pub fn render_dots(snapshots: &[StatusSnapshot]) -> String {
    snapshots
        .iter()
        .map(|s| s.status.indicator().symbol)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per target: symbol, label, name, url and last latency
pub fn render_status_list(snapshots: &[StatusSnapshot]) -> String {
    if snapshots.is_empty() {
        return "No status targets registered\n".to_string();
    }

    let name_width = snapshots.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();

    for snapshot in snapshots {
        let indicator = snapshot.status.indicator();
        let latency = snapshot
            .latency_ms
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            out,
            "{} {:<8} {:<width$}  {}  ({})",
            indicator.symbol,
            indicator.label,
            snapshot.name,
            snapshot.url,
            latency,
            width = name_width
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::types::{ProbeStrategy, Target};

    fn snapshot(name: &str, status: ProbeStatus, latency_ms: Option<u64>) -> StatusSnapshot {
        let mut s = StatusSnapshot::pending(Target::new(name, format!("https://{}", name)));
        s.status = status;
        s.latency_ms = latency_ms;
        s
    }

    #[test]
    fn test_indicator_colors() {
        assert_eq!(ProbeStatus::Online.indicator().color, "green");
        assert_eq!(ProbeStatus::Offline.indicator().color, "red");
        assert_eq!(ProbeStatus::Timeout.indicator().color, "yellow");
        assert_eq!(ProbeStatus::Error.indicator().color, "orange");
        assert_eq!(ProbeStatus::Pending.indicator().color, "gray");
    }

    #[test]
    fn test_render_dots() {
        let snapshots = vec![
            snapshot("a", ProbeStatus::Online, Some(12)),
            snapshot("b", ProbeStatus::Timeout, Some(10_000)),
            snapshot("c", ProbeStatus::Pending, None),
        ];
        assert_eq!(render_dots(&snapshots), "✓ ⏱ ⋯");
    }

    #[test]
    fn test_render_status_list() {
        let mut weekly = snapshot("mensa", ProbeStatus::Error, Some(80));
        weekly.strategy = ProbeStrategy::WeeklyJson;
        let snapshots = vec![snapshot("github", ProbeStatus::Online, Some(42)), weekly];

        let rendered = render_status_list(&snapshots);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("✓ Online"));
        assert!(lines[0].contains("https://github"));
        assert!(lines[0].ends_with("(42 ms)"));
        assert!(lines[1].starts_with("⚠ Error"));
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_status_list(&[]), "No status targets registered\n");
    }
}
