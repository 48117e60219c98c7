//! Reader client port trait
//!
//! Defines the interface for the upstream Google-Reader-compatible API.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{FeedId, Item, Subscription};
use crate::error::UpstreamError;

/// Client for the upstream feed-reading API.
///
/// Each method maps to one upstream call with a bounded timeout. Failures
/// are classified into [`UpstreamError`]; nothing here retries — retry
/// policy belongs to the caller.
#[async_trait]
pub trait ReaderClient: Send + Sync {
    /// Fetch the full subscription list (`subscription/list?output=json`).
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, UpstreamError>;

    /// Fetch up to `n` most recent items for one feed
    /// (`stream/contents/feed/{id}?n={n}`). An absent `items` field decodes
    /// as an empty list.
    async fn stream_contents(&self, id: &FeedId, n: u32) -> Result<Vec<Item>, UpstreamError>;

    /// Forward an arbitrary GET to the upstream API and return its JSON
    /// body unchanged. Used by the pass-through proxy endpoints.
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, UpstreamError>;
}
