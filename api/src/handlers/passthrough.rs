//! Pass-through proxy handlers
//!
//! Thin 1:1 forwards to single upstream endpoints. The upstream JSON body
//! is returned unchanged; only the timeout/transport/decode error mapping
//! is applied.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::domain::entities::FeedId;
use crate::domain::ports::ReaderClient;
use crate::error::AppError;
use crate::AppState;

/// GET /subscriptions
///
/// Forwards to `subscription/list`, always requesting JSON output, and
/// passes any caller query parameters through.
pub async fn proxy_subscriptions(
    State(state): State<AppState>,
    Query(mut params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    if !params.iter().any(|(key, _)| key == "output") {
        params.push(("output".to_string(), "json".to_string()));
    }

    let body = state
        .reader
        .get_json("subscription/list", &params)
        .await
        .map_err(AppError::Proxy)?;
    Ok(Json(body))
}

/// GET /feed/:id
///
/// Forwards to `stream/contents/feed/{id}` with the caller's query
/// parameters (e.g. `n`). The id must be a valid numeric feed id.
pub async fn proxy_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    let feed_id = FeedId::parse(&id)
        .ok_or_else(|| AppError::BadRequest(format!("invalid feed id: {id}")))?;

    let body = state
        .reader
        .get_json(
            &format!("stream/contents/feed/{}", feed_id.numeric()),
            &params,
        )
        .await
        .map_err(AppError::Proxy)?;
    Ok(Json(body))
}
