//! Transit Routes
//!
//! - GET /api/v1/transit/connections?from&to&datetime&limit - Search connections
//! - GET /api/v1/transit/history - Recent searches, newest first
//! - GET /api/v1/transit/last-search - Most recent search

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::api::dto::{ConnectionEntry, ConnectionsListResponse, ConnectionsParams, HistoryResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::transit::{
    format_connection, format_section_details, Connection, ConnectionQuery, SearchRecord,
    TransitError,
};

const MAX_LIMIT: u32 = 16;

/// GET /api/v1/transit/connections
///
/// Connections that cannot be formatted are skipped. A successful search
/// is recorded in the history.
pub async fn search_connections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConnectionsParams>,
) -> ApiResult<Json<ConnectionsListResponse>> {
    let from = params.from.trim().to_string();
    let to = params.to.trim().to_string();

    let mut query = ConnectionQuery::new(from.clone(), to.clone())
        .limit(params.limit.unwrap_or(state.transit_limit).clamp(1, MAX_LIMIT));
    let datetime = params
        .datetime
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(raw) = datetime {
        query = query.at(parse_datetime(raw)?);
    }

    let response = state.transit.search_connections(&query).await?;

    let connections: Vec<ConnectionEntry> = response
        .connections
        .iter()
        .filter_map(|connection| match format_entry(connection) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed connection");
                None
            }
        })
        .collect();

    state
        .history
        .record(SearchRecord::new(&from, &to, datetime.map(str::to_string)))
        .await;

    Ok(Json(ConnectionsListResponse {
        from,
        to,
        total: connections.len(),
        connections,
    }))
}

/// GET /api/v1/transit/history
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    let searches = state.history.history().await;
    Json(HistoryResponse {
        total: searches.len(),
        searches,
    })
}

/// GET /api/v1/transit/last-search
pub async fn get_last_search(State(state): State<Arc<AppState>>) -> ApiResult<Json<SearchRecord>> {
    state
        .history
        .last_search()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No transit search recorded yet".to_string()))
}

fn format_entry(connection: &Connection) -> Result<ConnectionEntry, TransitError> {
    Ok(ConnectionEntry {
        summary: format_connection(connection)?,
        sections: format_section_details(connection)?,
    })
}

/// Accepts `YYYY-MM-DDTHH:MM` as sent by date-time inputs, with or without seconds
fn parse_datetime(raw: &str) -> ApiResult<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| ApiError::Validation(format!("Invalid datetime '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_datetime_formats() {
        let full = parse_datetime("2025-01-15T14:30:15").unwrap();
        assert_eq!(full.second(), 15);

        let short = parse_datetime("2025-01-15T14:30").unwrap();
        assert_eq!((short.hour(), short.minute()), (14, 30));

        assert!(parse_datetime("2025-01-15 14:30").is_ok());
        assert!(parse_datetime("tomorrow").is_err());
    }
}
