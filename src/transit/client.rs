//! Transport API client
//!
//! Thin wrapper over `GET /v1/connections` of transport.opendata.ch.

use reqwest::Client;
use std::time::Duration;

use super::models::{ConnectionQuery, ConnectionsResponse};
use super::TransitError;

/// Public endpoint used when no base url is configured
pub const DEFAULT_TRANSIT_URL: &str = "https://transport.opendata.ch/v1";

/// Format expected by the `datetime` parameter
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Client for the connections endpoint
#[derive(Debug, Clone)]
pub struct TransitClient {
    client: Client,
    base_url: String,
}

impl TransitClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransitError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("statusboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn connections_url(&self) -> String {
        format!("{}/connections", self.base_url.trim_end_matches('/'))
    }

    /// Search connections between two places
    pub async fn search_connections(
        &self,
        query: &ConnectionQuery,
    ) -> Result<ConnectionsResponse, TransitError> {
        if query.from.trim().is_empty() || query.to.trim().is_empty() {
            return Err(TransitError::InvalidQuery(
                "both 'from' and 'to' are required".to_string(),
            ));
        }

        let mut params: Vec<(&str, String)> = vec![
            ("from", query.from.clone()),
            ("to", query.to.clone()),
        ];
        if let Some(datetime) = query.datetime {
            params.push(("datetime", datetime.format(DATETIME_FORMAT).to_string()));
        }
        params.push(("limit", query.limit.to_string()));

        tracing::debug!(
            from = %query.from,
            to = %query.to,
            limit = query.limit,
            "Searching connections"
        );

        let response = self
            .client
            .get(self.connections_url())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let result: ConnectionsResponse =
            serde_json::from_slice(&body).map_err(|e| TransitError::Decode(e.to_string()))?;

        tracing::debug!(count = result.connections.len(), "Connections received");
        Ok(result)
    }
}
