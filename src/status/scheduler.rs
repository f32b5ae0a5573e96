//! Refresh Scheduler
//!
//! Periodically calls `refresh_all` on a shared tracker.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

use super::tracker::StatusTracker;

/// Drives a tracker on a fixed interval
pub struct RefreshScheduler {
    tracker: Arc<StatusTracker>,
    interval: Duration,
    running: Arc<RwLock<bool>>,
}

impl RefreshScheduler {
    pub fn new(tracker: Arc<StatusTracker>, interval: Duration) -> Self {
        Self {
            tracker,
            interval,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background task. The first refresh runs immediately.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = Arc::clone(&self);

        tokio::spawn(async move {
            *scheduler.running.write().await = true;

            let mut ticker = tokio::time::interval(scheduler.interval);
            // A slow round must not trigger a burst of catch-up refreshes
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = scheduler.interval.as_secs(),
                "Status refresh scheduler started"
            );

            loop {
                ticker.tick().await;

                if !*scheduler.running.read().await {
                    break;
                }

                scheduler.tracker.refresh_all().await;
            }

            tracing::info!("Status refresh scheduler stopped");
        })
    }

    /// Stop after the current round
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::prober::Prober;
    use crate::status::types::{ProbeStatus, Target};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProber(AtomicUsize);

    #[async_trait]
    impl Prober for CountingProber {
        async fn probe(&self, _target: &Target, _timeout: Duration) -> ProbeStatus {
            self.0.fetch_add(1, Ordering::SeqCst);
            ProbeStatus::Online
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_refreshes_until_stopped() {
        let prober = Arc::new(CountingProber(AtomicUsize::new(0)));
        let tracker = Arc::new(StatusTracker::new(prober.clone()));
        tracker.register("a", "http://a").await;

        let scheduler = Arc::new(RefreshScheduler::new(
            Arc::clone(&tracker),
            Duration::from_secs(60),
        ));
        let handle = Arc::clone(&scheduler).start();

        // first tick fires immediately, then every 60 s
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert!(scheduler.is_running().await);
        assert_eq!(prober.0.load(Ordering::SeqCst), 3);

        scheduler.stop().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        handle.await.unwrap();

        assert!(!scheduler.is_running().await);
        assert_eq!(prober.0.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.snapshot().await[0].status, ProbeStatus::Online);
    }
}
