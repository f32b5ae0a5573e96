//! Public Transit
//!
//! Journey lookups against the transport.opendata.ch connections API:
//! - [`TransitClient`]: connection search
//! - [`format_connection`] / [`format_section_details`]: dashboard rows
//! - [`SearchHistory`]: recent and last searches in the local store

mod client;
mod format;
mod history;
mod models;

pub use client::{TransitClient, DEFAULT_TRANSIT_URL};
pub use format::{format_connection, format_section_details, FormattedConnection, FormattedSection};
pub use history::{SearchHistory, SearchRecord, DEFAULT_HISTORY_LIMIT};
pub use models::{
    parse_timestamp, Checkpoint, Connection, ConnectionQuery, ConnectionsResponse, Coordinate,
    Journey, Section, Station,
};

/// Errors from the transit API or from malformed connections
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Transit request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Transit API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode transit response: {0}")]
    Decode(String),

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
