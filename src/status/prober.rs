//! Status Prober
//!
//! Issues one bounded-time check against a target and classifies it.
//! Every failure mode is folded into a [`ProbeStatus`]; nothing is returned
//! as an error.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use super::error::StatusError;
use super::types::{ProbeStatus, ProbeStrategy, Target};
use super::window::WeekWindow;

/// Default probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// Classifies a single target
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `target`, giving up after `timeout`
    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeStatus;
}

/// HTTP prober backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Create a prober with its own connection pool
    pub fn new() -> Result<Self, StatusError> {
        let client = Client::builder()
            .user_agent(concat!("statusboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StatusError::Client)?;

        Ok(Self { client })
    }

    /// Reuse an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// HEAD the url; success status means online
    pub async fn check_reachability(&self, url: &str, timeout: Duration) -> ProbeStatus {
        let request = self.client.head(url).send();

        match tokio::time::timeout(timeout, request).await {
            Err(_) => ProbeStatus::Timeout,
            Ok(Err(e)) => classify_transport(&e),
            Ok(Ok(response)) => classify_response(&response),
        }
    }

    /// GET the url for the given week and require a JSON body
    pub async fn check_weekly_json(
        &self,
        url: &str,
        window: WeekWindow,
        timeout: Duration,
    ) -> ProbeStatus {
        let attempt = async {
            let response = self
                .client
                .get(url)
                .query(&window.query_pairs()[..])
                .send()
                .await
                .map_err(|e| classify_transport(&e))?;

            if !response.status().is_success() {
                return Err(ProbeStatus::Error);
            }

            let body = response.bytes().await.map_err(|e| classify_transport(&e))?;

            match serde_json::from_slice::<serde_json::Value>(&body) {
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Probe payload is not valid JSON");
                    Err(ProbeStatus::Error)
                }
            }
        };

        // Dropping `attempt` on timeout aborts the in-flight request
        match tokio::time::timeout(timeout, attempt).await {
            Err(_) => ProbeStatus::Timeout,
            Ok(Err(status)) => status,
            Ok(Ok(())) => ProbeStatus::Online,
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeStatus {
        let status = match target.strategy {
            ProbeStrategy::Reachability => self.check_reachability(&target.url, timeout).await,
            ProbeStrategy::WeeklyJson => {
                self.check_weekly_json(&target.url, WeekWindow::current(), timeout)
                    .await
            }
        };

        tracing::debug!(
            target_name = %target.name,
            url = %target.url,
            strategy = %target.strategy,
            status = %status,
            "Probe resolved"
        );

        status
    }
}

fn classify_response(response: &Response) -> ProbeStatus {
    if response.status().is_success() {
        ProbeStatus::Online
    } else {
        ProbeStatus::Error
    }
}

fn classify_transport(err: &reqwest::Error) -> ProbeStatus {
    if err.is_timeout() {
        ProbeStatus::Timeout
    } else {
        ProbeStatus::Offline
    }
}
