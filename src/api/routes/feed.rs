//! Feed Routes
//!
//! - GET /api/v1/feed - List activity items
//! - POST /api/v1/feed - Append an item

use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use std::sync::Arc;

use crate::api::dto::{CreateFeedItemRequest, FeedResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::feed::{ActivityIcon, ActivityItem};

/// GET /api/v1/feed
pub async fn list_feed(State(state): State<Arc<AppState>>) -> Json<FeedResponse> {
    let items = state.feed.items().await;
    Json(FeedResponse {
        total: items.len(),
        items,
    })
}

/// POST /api/v1/feed
pub async fn create_feed_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFeedItemRequest>,
) -> ApiResult<(StatusCode, Json<ActivityItem>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("Item title cannot be empty".to_string()));
    }

    let icon = req
        .icon
        .as_deref()
        .map(ActivityIcon::from_name)
        .unwrap_or_default();
    let date = req.date.unwrap_or_else(|| Local::now().date_naive());

    let mut item = ActivityItem::new(icon, req.title.trim(), date, req.category, req.summary);
    item.action = req.action;

    let total = state.feed.push(item.clone()).await;
    tracing::debug!(title = %item.title, total, "Feed item added");

    Ok((StatusCode::CREATED, Json(item)))
}
