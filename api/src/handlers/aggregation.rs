//! Aggregation handlers
//!
//! The two merged views over all subscribed feeds: the flat digest and the
//! per-feed grouped latest view. Both share query parameters and defaults;
//! they differ in merge shape and in where pagination is applied.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::app::{DigestResponse, LatestResponse};
use crate::error::AppError;
use crate::AppState;

/// Query parameters shared by both aggregation endpoints.
#[derive(Debug, Deserialize)]
pub struct AggregationQuery {
    /// Label to filter subscriptions by; empty means all feeds.
    #[serde(default)]
    pub label: String,
    /// Items requested per feed.
    #[serde(default = "default_n")]
    pub n: u32,
    /// 1-based page.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_n() -> u32 {
    1
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

/// GET /digest
///
/// Flat, freshness-sorted digest across all (optionally label-filtered)
/// feeds.
pub async fn get_digest(
    State(state): State<AppState>,
    Query(query): Query<AggregationQuery>,
) -> Result<Json<DigestResponse>, AppError> {
    let digest = state
        .aggregator
        .digest(&query.label, query.n, query.page, query.limit)
        .await?;
    Ok(Json(digest))
}

/// GET /all-latest
///
/// Latest items grouped per feed, paginated over the feed list.
pub async fn get_all_latest(
    State(state): State<AppState>,
    Query(query): Query<AggregationQuery>,
) -> Result<Json<LatestResponse>, AppError> {
    let latest = state
        .aggregator
        .latest(&query.label, query.n, query.page, query.limit)
        .await?;
    Ok(Json(latest))
}
