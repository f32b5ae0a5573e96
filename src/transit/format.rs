//! Connection formatting
//!
//! Turns raw connections into the compact rows shown on the dashboard:
//! station names, `HH:MM` times in the station's own offset, duration and
//! transfer count, plus a per-section breakdown.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::models::{parse_timestamp, Checkpoint, Connection, Section};
use super::TransitError;

const UNKNOWN: &str = "Unknown";
const NO_PLATFORM: &str = "?";

/// Summary row for one connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedConnection {
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    /// `"{h}h {m}m"`
    pub duration: String,
    pub transfers: usize,
    pub platform: String,
}

/// Detail row for one section of a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedSection {
    pub index: usize,
    pub is_walk: bool,
    /// `"IC 5"`, the journey name, or `"Walk"`
    pub name: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub departure_time: DateTime<FixedOffset>,
    pub depart_platform: String,
    pub depart_delay: i64,
    pub arrival: String,
    pub arrival_time: DateTime<FixedOffset>,
    pub arrival_platform: String,
    pub arrival_delay: i64,
    pub duration_minutes: i64,
    pub capacity_2nd: u32,
}

/// Format a connection for the summary list
pub fn format_connection(connection: &Connection) -> Result<FormattedConnection, TransitError> {
    let (from, to) = match (&connection.from, &connection.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return Err(TransitError::InvalidConnection(
                "connection is missing its from/to checkpoint".to_string(),
            ))
        }
    };

    let departure = checkpoint_time(from.departure.as_deref(), "departure")?;
    let arrival = checkpoint_time(to.arrival.as_deref(), "arrival")?;
    let minutes = (arrival - departure).num_minutes();

    Ok(FormattedConnection {
        from: from.station_name().unwrap_or(UNKNOWN).to_string(),
        to: to.station_name().unwrap_or(UNKNOWN).to_string(),
        departure: clock(&departure),
        arrival: clock(&arrival),
        duration: format!("{}h {}m", minutes.div_euclid(60), minutes.rem_euclid(60)),
        transfers: count_transfers(connection),
        platform: platform(from),
    })
}

/// Format every section of a connection. No sections gives an empty list.
pub fn format_section_details(
    connection: &Connection,
) -> Result<Vec<FormattedSection>, TransitError> {
    let sections = match &connection.sections {
        Some(sections) => sections,
        None => return Ok(Vec::new()),
    };

    sections
        .iter()
        .enumerate()
        .map(|(index, section)| format_section(index, section))
        .collect()
}

fn format_section(index: usize, section: &Section) -> Result<FormattedSection, TransitError> {
    let departure_time = checkpoint_time(section.departure.departure.as_deref(), "departure")?;
    let arrival_time = checkpoint_time(section.arrival.arrival.as_deref(), "arrival")?;
    let seconds = (arrival_time - departure_time).num_seconds();

    let (is_walk, name, capacity_2nd) = match &section.journey {
        None => (true, "Walk".to_string(), 0),
        Some(journey) => {
            let category = journey.category.clone().unwrap_or_default();
            let number = journey.number_text();
            let name = if !category.is_empty() && !number.is_empty() {
                format!("{} {}", category, number)
            } else {
                journey.name.clone().unwrap_or_else(|| UNKNOWN.to_string())
            };
            (false, name, journey.capacity_2nd.unwrap_or(0))
        }
    };

    Ok(FormattedSection {
        index,
        is_walk,
        name,
        from: section
            .departure
            .station_name()
            .unwrap_or(UNKNOWN)
            .to_string(),
        to: section.arrival.station_name().unwrap_or(UNKNOWN).to_string(),
        departure: clock(&departure_time),
        departure_time,
        depart_platform: platform(&section.departure),
        depart_delay: section.departure.delay.unwrap_or(0),
        arrival: clock(&arrival_time),
        arrival_time,
        arrival_platform: platform(&section.arrival),
        arrival_delay: section.arrival.delay.unwrap_or(0),
        duration_minutes: (seconds as f64 / 60.0).round() as i64,
        capacity_2nd,
    })
}

/// Journey sections minus one; walks do not count as a change
fn count_transfers(connection: &Connection) -> usize {
    connection
        .sections
        .as_ref()
        .map(|sections| sections.iter().filter(|s| s.journey.is_some()).count())
        .unwrap_or(0)
        .saturating_sub(1)
}

fn checkpoint_time(
    raw: Option<&str>,
    field: &str,
) -> Result<DateTime<FixedOffset>, TransitError> {
    let raw = raw.ok_or_else(|| TransitError::InvalidConnection(format!("missing {}", field)))?;
    parse_timestamp(raw)
        .ok_or_else(|| TransitError::InvalidConnection(format!("invalid {} time '{}'", field, raw)))
}

fn platform(checkpoint: &Checkpoint) -> String {
    checkpoint
        .platform
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| NO_PLATFORM.to_string())
}

fn clock(time: &DateTime<FixedOffset>) -> String {
    time.format("%H:%M").to_string()
}
