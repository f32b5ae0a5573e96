//! Transport API wire types
//!
//! Mirrors the subset of the `/v1/connections` response that the dashboard
//! reads. Every field is optional because the upstream API omits or nulls
//! them freely.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for a connection search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionQuery {
    /// Station name, id or "lat,lon"
    pub from: String,
    pub to: String,
    /// Local departure time; upstream defaults to now
    #[serde(default)]
    pub datetime: Option<NaiveDateTime>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

impl ConnectionQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            datetime: None,
            limit: default_limit(),
        }
    }

    pub fn at(mut self, datetime: NaiveDateTime) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Top-level `/connections` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub from: Option<Station>,
    #[serde(default)]
    pub to: Option<Station>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub from: Option<Checkpoint>,
    #[serde(default)]
    pub to: Option<Checkpoint>,
    /// Upstream format `00d01:02:00`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
}

/// A stop along a connection with its scheduled times
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub station: Option<Station>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    /// Minutes
    #[serde(default)]
    pub delay: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// One leg of a connection; either a journey or a walk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub journey: Option<Journey>,
    #[serde(default)]
    pub walk: Option<Value>,
    #[serde(default)]
    pub departure: Checkpoint,
    #[serde(default)]
    pub arrival: Checkpoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journey {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Sent as a string or a number depending on the line
    #[serde(default)]
    pub number: Option<Value>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, rename = "capacity1st")]
    pub capacity_1st: Option<u32>,
    #[serde(default, rename = "capacity2nd")]
    pub capacity_2nd: Option<u32>,
}

impl Journey {
    /// Line number as text, empty when absent
    pub fn number_text(&self) -> String {
        match &self.number {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

impl Checkpoint {
    pub fn station_name(&self) -> Option<&str> {
        self.station.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// Parse upstream timestamps, which use `+0100` offsets rather than RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
