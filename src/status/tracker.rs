//! Status Tracker
//!
//! Owns the ordered list of probe targets and their last known status.
//! `refresh_all` probes every target concurrently on the calling task and
//! writes each result back as soon as that probe resolves.

use chrono::Utc;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};

use super::prober::{Prober, DEFAULT_PROBE_TIMEOUT_MS};
use super::types::{ProbeStatus, ProbeStrategy, RefreshSummary, StatusSnapshot, Target};

/// Aggregates probe results for a set of named targets
pub struct StatusTracker {
    prober: Arc<dyn Prober>,
    timeout: Duration,
    entries: RwLock<Vec<StatusSnapshot>>,
    completed: watch::Sender<Option<RefreshSummary>>,
}

impl StatusTracker {
    /// Create an empty tracker using the default 10 s probe timeout
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        let (completed, _) = watch::channel(None);
        Self {
            prober,
            timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            entries: RwLock::new(Vec::new()),
            completed,
        }
    }

    /// Override the per-probe timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register a reachability target. Returns its index.
    pub async fn register(&self, name: impl Into<String>, url: impl Into<String>) -> usize {
        self.register_target(Target::new(name, url)).await
    }

    /// Register a target with an explicit strategy. Returns its index.
    pub async fn register_with(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        strategy: ProbeStrategy,
    ) -> usize {
        self.register_target(Target::new(name, url).strategy(strategy))
            .await
    }

    pub async fn register_target(&self, target: Target) -> usize {
        let mut entries = self.entries.write().await;
        tracing::debug!(
            target_name = %target.name,
            url = %target.url,
            strategy = %target.strategy,
            "Registered status target"
        );
        entries.push(StatusSnapshot::pending(target));
        entries.len() - 1
    }

    /// Probe every registered target concurrently.
    ///
    /// Returns once the slowest probe has resolved. Targets registered while
    /// the refresh is running keep their current status until the next one.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let targets: Vec<(usize, Target)> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| (index, entry.target()))
                .collect()
        };

        let started = Instant::now();

        let probes = targets
            .iter()
            .map(|(index, target)| self.probe_and_store(*index, target));
        let statuses = join_all(probes).await;

        let mut summary = RefreshSummary::default();
        for status in statuses {
            summary.record(status);
        }
        summary.duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            probed = summary.probed,
            online = summary.online,
            offline = summary.offline,
            timeout = summary.timeout,
            error = summary.error,
            duration_ms = summary.duration_ms,
            "Status refresh completed"
        );

        self.completed.send_replace(Some(summary.clone()));
        summary
    }

    async fn probe_and_store(&self, index: usize, target: &Target) -> ProbeStatus {
        let started = Instant::now();
        // Backstop for probers that do not honor the timeout themselves
        let status = tokio::time::timeout(self.timeout, self.prober.probe(target, self.timeout))
            .await
            .unwrap_or(ProbeStatus::Timeout);
        let latency_ms = started.elapsed().as_millis() as u64;

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(index) {
            entry.status = status;
            entry.checked_at = Some(Utc::now());
            entry.latency_ms = Some(latency_ms);
        }

        if status != ProbeStatus::Online {
            tracing::warn!(
                target_name = %target.name,
                url = %target.url,
                status = %status,
                latency_ms,
                "Target is not online"
            );
        }

        status
    }

    /// Current state of every target, without probing
    pub async fn snapshot(&self) -> Vec<StatusSnapshot> {
        self.entries.read().await.clone()
    }

    /// Receiver that observes the summary of each completed refresh
    pub fn subscribe(&self) -> watch::Receiver<Option<RefreshSummary>> {
        self.completed.subscribe()
    }

    /// Summary of the most recent refresh, if any
    pub fn last_summary(&self) -> Option<RefreshSummary> {
        self.completed.borrow().clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted prober: each target name maps to a response delay and the
    /// status it reports when it answers in time.
    struct ScriptedProber {
        script: HashMap<String, (Duration, ProbeStatus)>,
        calls: AtomicUsize,
    }

    impl ScriptedProber {
        fn new(script: &[(&str, u64, ProbeStatus)]) -> Self {
            Self {
                script: script
                    .iter()
                    .map(|(name, ms, status)| {
                        (name.to_string(), (Duration::from_millis(*ms), *status))
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, target: &Target, timeout: Duration) -> ProbeStatus {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, status) = self
                .script
                .get(&target.name)
                .copied()
                .unwrap_or((Duration::ZERO, ProbeStatus::Offline));

            match tokio::time::timeout(timeout, tokio::time::sleep(delay)).await {
                Ok(()) => status,
                Err(_) => ProbeStatus::Timeout,
            }
        }
    }

    #[tokio::test]
    async fn test_register_starts_pending() {
        let tracker = StatusTracker::new(Arc::new(ScriptedProber::new(&[])));
        let index = tracker.register("GitHub API", "https://api.github.com").await;

        assert_eq!(index, 0);
        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, ProbeStatus::Pending);
        assert_eq!(snapshot[0].strategy, ProbeStrategy::Reachability);
        assert!(snapshot[0].checked_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_names_are_kept() {
        let tracker = StatusTracker::new(Arc::new(ScriptedProber::new(&[])));
        tracker.register("api", "http://a").await;
        let second = tracker.register("api", "http://b").await;

        assert_eq!(second, 1);
        assert_eq!(tracker.len().await, 2);
    }

    #[tokio::test]
    async fn test_refresh_resolves_every_target() {
        let prober = Arc::new(ScriptedProber::new(&[
            ("a", 10, ProbeStatus::Online),
            ("b", 10, ProbeStatus::Error),
            ("c", 10, ProbeStatus::Offline),
        ]));
        let tracker = StatusTracker::new(prober.clone());
        tracker.register("a", "http://a").await;
        tracker.register("b", "http://b").await;
        tracker.register("c", "http://c").await;

        let summary = tracker.refresh_all().await;

        assert_eq!(summary.probed, 3);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 3);
        let snapshot = tracker.snapshot().await;
        assert!(snapshot
            .iter()
            .all(|s| ProbeStatus::OUTCOMES.contains(&s.status)));
        assert_eq!(snapshot[0].status, ProbeStatus::Online);
        assert_eq!(snapshot[1].status, ProbeStatus::Error);
        assert_eq!(snapshot[2].status, ProbeStatus::Offline);
        assert!(snapshot.iter().all(|s| s.checked_at.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_time_is_bounded_by_slowest_probe() {
        let prober = Arc::new(ScriptedProber::new(&[
            ("fast-1", 50, ProbeStatus::Online),
            ("fast-2", 50, ProbeStatus::Online),
            ("fast-3", 50, ProbeStatus::Online),
            ("silent", 3_600_000, ProbeStatus::Online),
        ]));
        let tracker = StatusTracker::new(prober).with_timeout(Duration::from_millis(10_000));
        for name in ["fast-1", "fast-2", "fast-3", "silent"] {
            tracker.register(name, format!("http://{}", name)).await;
        }

        let started = tokio::time::Instant::now();
        let summary = tracker.refresh_all().await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(10_000));
        assert!(elapsed < Duration::from_millis(11_000));
        assert_eq!(summary.online, 3);
        assert_eq!(summary.timeout, 1);

        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot[3].status, ProbeStatus::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_prober_is_cut_off() {
        struct Hanging;

        #[async_trait]
        impl Prober for Hanging {
            async fn probe(&self, _target: &Target, _timeout: Duration) -> ProbeStatus {
                std::future::pending().await
            }
        }

        let tracker = StatusTracker::new(Arc::new(Hanging)).with_timeout(Duration::from_secs(2));
        tracker.register("stuck", "http://stuck").await;

        let summary = tracker.refresh_all().await;
        assert_eq!(summary.timeout, 1);
        assert_eq!(tracker.snapshot().await[0].status, ProbeStatus::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_check_is_cancelled() {
        use std::sync::atomic::AtomicBool;

        struct DropFlag(Arc<AtomicBool>);

        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        /// Answers after a minute unless its future is dropped first
        struct Lingering {
            dropped: Arc<AtomicBool>,
            finished: Arc<AtomicBool>,
        }

        #[async_trait]
        impl Prober for Lingering {
            async fn probe(&self, _target: &Target, _timeout: Duration) -> ProbeStatus {
                let _flag = DropFlag(Arc::clone(&self.dropped));
                tokio::time::sleep(Duration::from_secs(60)).await;
                self.finished.store(true, Ordering::SeqCst);
                ProbeStatus::Online
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let prober = Lingering {
            dropped: Arc::clone(&dropped),
            finished: Arc::clone(&finished),
        };
        let tracker = StatusTracker::new(Arc::new(prober)).with_timeout(Duration::from_secs(5));
        tracker.register("slow", "http://slow").await;

        let summary = tracker.refresh_all().await;
        assert_eq!(summary.timeout, 1);
        assert!(dropped.load(Ordering::SeqCst));

        let resolved = tracker.snapshot().await;
        tokio::time::advance(Duration::from_secs(120)).await;

        assert!(!finished.load(Ordering::SeqCst));
        assert_eq!(tracker.snapshot().await, resolved);
        assert_eq!(resolved[0].status, ProbeStatus::Timeout);
    }

    #[tokio::test]
    async fn test_snapshot_is_stable_between_refreshes() {
        let prober = Arc::new(ScriptedProber::new(&[("a", 0, ProbeStatus::Online)]));
        let tracker = StatusTracker::new(prober.clone());
        tracker.register("a", "http://a").await;
        tracker.refresh_all().await;

        let first = tracker.snapshot().await;
        let second = tracker.snapshot().await;

        assert_eq!(first, second);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_is_revised_on_next_refresh() {
        struct Flipping(AtomicUsize);

        #[async_trait]
        impl Prober for Flipping {
            async fn probe(&self, _target: &Target, _timeout: Duration) -> ProbeStatus {
                if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                    ProbeStatus::Online
                } else {
                    ProbeStatus::Offline
                }
            }
        }

        let tracker = StatusTracker::new(Arc::new(Flipping(AtomicUsize::new(0))));
        tracker.register("a", "http://a").await;

        tracker.refresh_all().await;
        assert_eq!(tracker.snapshot().await[0].status, ProbeStatus::Online);

        tracker.refresh_all().await;
        assert_eq!(tracker.snapshot().await[0].status, ProbeStatus::Offline);
    }

    #[tokio::test]
    async fn test_refresh_with_no_targets() {
        let tracker = StatusTracker::new(Arc::new(ScriptedProber::new(&[])));
        let summary = tracker.refresh_all().await;

        assert_eq!(summary.probed, 0);
        assert!(summary.all_online());
    }

    #[tokio::test]
    async fn test_subscribe_sees_completed_refresh() {
        let prober = Arc::new(ScriptedProber::new(&[("a", 0, ProbeStatus::Error)]));
        let tracker = Arc::new(StatusTracker::new(prober));
        tracker.register("a", "http://a").await;

        let mut rx = tracker.subscribe();
        assert!(rx.borrow().is_none());

        let refresher = Arc::clone(&tracker);
        let handle = tokio::spawn(async move { refresher.refresh_all().await });

        rx.changed().await.unwrap();
        let summary = rx.borrow().clone().unwrap();
        assert_eq!(summary.error, 1);
        assert_eq!(tracker.last_summary(), Some(summary));

        handle.await.unwrap();
    }
}
