//! Status Routes
//!
//! - GET /api/v1/status - Current snapshot with indicators
//! - POST /api/v1/status/refresh - Probe every target, then return the snapshot
//! - POST /api/v1/status/targets - Register a target

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{
    RegisterTargetRequest, RegisterTargetResponse, StatusCounts, StatusEntry, StatusListResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::status::{render_dots, ProbeStrategy, StatusSnapshot, Target};

/// GET /api/v1/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusListResponse> {
    Json(status_response(&state).await)
}

/// POST /api/v1/status/refresh
///
/// Completes once every probe has resolved, so the response never
/// contains a pending entry registered before the call.
pub async fn refresh_status(State(state): State<Arc<AppState>>) -> Json<StatusListResponse> {
    let summary = state.tracker.refresh_all().await;
    tracing::info!(
        probed = summary.probed,
        online = summary.online,
        duration_ms = summary.duration_ms,
        "Status refresh requested via API"
    );
    Json(status_response(&state).await)
}

/// POST /api/v1/status/targets
pub async fn register_target(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterTargetRequest>,
) -> ApiResult<(StatusCode, Json<RegisterTargetResponse>)> {
    let target = validate_target(req)?;

    let snapshot = StatusSnapshot::pending(target.clone());
    let index = state.tracker.register_target(target).await;

    tracing::info!(name = %snapshot.name, url = %snapshot.url, index, "Status target registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterTargetResponse {
            index,
            entry: StatusEntry::from(&snapshot),
        }),
    ))
}

async fn status_response(state: &AppState) -> StatusListResponse {
    let snapshot = state.tracker.snapshot().await;

    StatusListResponse {
        entries: snapshot.iter().map(StatusEntry::from).collect(),
        counts: StatusCounts::from_snapshots(&snapshot),
        dots: render_dots(&snapshot),
        last_refresh: state.tracker.last_summary(),
    }
}

fn validate_target(req: RegisterTargetRequest) -> ApiResult<Target> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Target name cannot be empty".to_string()));
    }

    let url = req.url.trim();
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ApiError::Validation(format!("Invalid url '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::Validation(format!(
            "Unsupported url scheme '{}'",
            parsed.scheme()
        )));
    }

    let strategy = match req.strategy.as_deref() {
        Some(s) => s
            .parse::<ProbeStrategy>()
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        None => ProbeStrategy::default(),
    };

    Ok(Target::new(name, url).strategy(strategy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, url: &str, strategy: Option<&str>) -> RegisterTargetRequest {
        RegisterTargetRequest {
            name: name.to_string(),
            url: url.to_string(),
            strategy: strategy.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_target() {
        let target = validate_target(request(" Mensa ", "https://example.com/menu", Some("json"))).unwrap();
        assert_eq!(target.name, "Mensa");
        assert_eq!(target.strategy, ProbeStrategy::WeeklyJson);

        assert!(validate_target(request("", "https://example.com", None)).is_err());
        assert!(validate_target(request("x", "not a url", None)).is_err());
        assert!(validate_target(request("x", "ftp://example.com", None)).is_err());
        assert!(validate_target(request("x", "https://example.com", Some("ping"))).is_err());
    }
}
