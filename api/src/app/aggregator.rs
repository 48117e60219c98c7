//! Aggregator service
//!
//! Orchestrates the two aggregation modes over the upstream reader API:
//! directory fetch, label filter, bounded-concurrency fan-out, partial-
//! failure-tolerant merge, deterministic ordering, pagination, and TTL
//! memoization of the whole computation.

use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};
use serde::Serialize;

use crate::app::fetcher::{FeedFetcher, FetchError, DEFAULT_RETRY_ATTEMPTS};
use crate::cache::{TtlCache, CACHE_TTL};
use crate::domain::entities::{FeedId, Item, Subscription};
use crate::domain::ports::ReaderClient;
use crate::error::AppError;

/// Upper bound on in-flight feed fetches per aggregation request.
pub const FETCH_CONCURRENCY: usize = 10;

/// Flat digest: the globally time-ordered slice plus paging metadata.
///
/// `total_items` counts the full merged sequence, not the slice, so clients
/// can page without recomputation while the cache entry is warm.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestResponse {
    pub items: Vec<Item>,
    pub page: i64,
    pub limit: i64,
    pub total_items: usize,
}

/// Grouped latest view: one entry per feed on the requested feed page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResponse {
    pub feeds: Vec<FeedResult>,
    pub page: i64,
    pub limit: i64,
    pub total_feeds: usize,
}

/// One feed's bucket in the grouped view. Present even when the fetch
/// failed, with empty `items` and the failure in `error`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResult {
    pub id: String,
    pub title: String,
    pub html_url: String,
    pub icon_url: String,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedResult {
    fn from_fetch(sub: &Subscription, result: Result<Vec<Item>, FetchError>) -> Self {
        let (items, error) = match result {
            Ok(items) => (items, None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        Self {
            id: sub.id.clone(),
            title: sub.title.clone(),
            html_url: sub.html_url.clone(),
            icon_url: sub.icon_url.clone(),
            items,
            error,
        }
    }
}

/// One fan-out slot: the subscription it was dispatched for and what came
/// back.
struct FeedFetchOutcome<'a> {
    sub: &'a Subscription,
    result: Result<Vec<Item>, FetchError>,
}

/// Service orchestrating both aggregation modes.
///
/// Holds the only shared mutable state in the system: the two TTL caches.
/// Everything else is an immutable per-request snapshot.
pub struct AggregatorService<C: ReaderClient> {
    reader: Arc<C>,
    fetcher: FeedFetcher<C>,
    digest_cache: TtlCache<Vec<Item>>,
    latest_cache: TtlCache<LatestResponse>,
}

impl<C: ReaderClient> AggregatorService<C> {
    pub fn new(reader: Arc<C>) -> Self {
        Self::with_settings(reader, CACHE_TTL, DEFAULT_RETRY_ATTEMPTS)
    }

    /// Construct with explicit cache TTL and retry count. Tests use this
    /// to get short-lived caches and deterministic retry counts.
    pub fn with_settings(reader: Arc<C>, cache_ttl: Duration, retry_attempts: u32) -> Self {
        Self {
            fetcher: FeedFetcher::new(reader.clone(), retry_attempts),
            reader,
            digest_cache: TtlCache::new(cache_ttl),
            latest_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Flat digest across all labeled feeds, newest first.
    ///
    /// The merged sequence is cached per `(label, n)`; `page`/`limit` only
    /// select the slice served from it.
    pub async fn digest(
        &self,
        label: &str,
        n: u32,
        page: i64,
        limit: i64,
    ) -> Result<DigestResponse, AppError> {
        let key = format!("digest:n={n}:label={label}");

        let merged = match self.digest_cache.get(&key) {
            Some(items) => {
                tracing::debug!("Digest cache hit: {}", key);
                items
            }
            None => {
                let merged = self.build_digest(label, n).await?;
                self.digest_cache.set(&key, merged.clone());
                merged
            }
        };

        let items = paginate(&merged, page, limit).to_vec();
        Ok(DigestResponse {
            items,
            page,
            limit,
            total_items: merged.len(),
        })
    }

    async fn build_digest(&self, label: &str, n: u32) -> Result<Vec<Item>, AppError> {
        let subs = self
            .reader
            .list_subscriptions()
            .await
            .map_err(AppError::Directory)?;
        let subs = filter_by_label(subs, label);
        tracing::info!(
            "Building digest over {} feeds (label: {:?}, n: {})",
            subs.len(),
            label,
            n
        );

        let mut merged = Vec::new();
        for outcome in self.fan_out(&subs, n).await {
            match outcome.result {
                Ok(items) => {
                    for mut item in items {
                        item.attach_feed(outcome.sub);
                        merged.push(item);
                    }
                }
                Err(err) => {
                    // One bad feed must not fail the batch; flat mode just
                    // contributes zero items for it.
                    tracing::warn!(
                        "Dropping failed feed {} from digest: {}",
                        outcome.sub.id,
                        err
                    );
                }
            }
        }

        // Stable sort: ties keep their feed-list relative order.
        merged.sort_by(|a, b| b.published.cmp(&a.published));
        Ok(merged)
    }

    /// Per-feed grouped view of the requested feed page.
    ///
    /// Pagination selects which feeds get fetched, so the cache key spans
    /// the full `(label, page, limit, n)` tuple and hits are served
    /// verbatim.
    pub async fn latest(
        &self,
        label: &str,
        n: u32,
        page: i64,
        limit: i64,
    ) -> Result<LatestResponse, AppError> {
        let key = format!("latest:page={page}:limit={limit}:n={n}:label={label}");

        if let Some(cached) = self.latest_cache.get(&key) {
            tracing::debug!("Latest cache hit: {}", key);
            return Ok(cached);
        }

        let subs = self
            .reader
            .list_subscriptions()
            .await
            .map_err(AppError::Directory)?;
        let subs = filter_by_label(subs, label);
        let total_feeds = subs.len();
        let page_subs = paginate(&subs, page, limit);
        tracing::info!(
            "Fetching latest for {} of {} feeds (label: {:?}, page: {}, limit: {})",
            page_subs.len(),
            total_feeds,
            label,
            page,
            limit
        );

        let feeds = self
            .fan_out(page_subs, n)
            .await
            .into_iter()
            .map(|outcome| {
                if let Err(ref err) = outcome.result {
                    tracing::warn!("Feed {} failed: {}", outcome.sub.id, err);
                }
                FeedResult::from_fetch(outcome.sub, outcome.result)
            })
            .collect();

        let response = LatestResponse {
            feeds,
            page,
            limit,
            total_feeds,
        };
        self.latest_cache.set(&key, response.clone());
        Ok(response)
    }

    /// Dispatch fetches for every valid feed id in `subs`, at most
    /// `min(10, batch)` in flight, and join before returning. Outcomes come
    /// back in subscription order regardless of completion order. Invalid
    /// ids are excluded here and never fetched.
    async fn fan_out<'a>(
        &self,
        subs: &'a [Subscription],
        n: u32,
    ) -> Vec<FeedFetchOutcome<'a>> {
        let targets: Vec<(usize, FeedId)> = subs
            .iter()
            .enumerate()
            .filter_map(|(idx, sub)| match FeedId::parse(&sub.id) {
                Some(id) => Some((idx, id)),
                None => {
                    tracing::warn!(
                        "Skipping subscription with invalid feed id {:?} ({})",
                        sub.id,
                        sub.title
                    );
                    None
                }
            })
            .collect();

        if targets.is_empty() {
            return Vec::new();
        }

        let concurrency = FETCH_CONCURRENCY.min(targets.len());
        stream::iter(targets.into_iter().map(|(idx, id)| async move {
            FeedFetchOutcome {
                sub: &subs[idx],
                result: self.fetcher.fetch(&id, n).await,
            }
        }))
        .buffered(concurrency)
        .collect()
        .await
    }
}

fn filter_by_label(subs: Vec<Subscription>, label: &str) -> Vec<Subscription> {
    if label.is_empty() {
        return subs;
    }
    subs.into_iter().filter(|s| s.has_label(label)).collect()
}

/// Offset pagination: `[max(0,(page-1)*limit), +limit)`, empty past the
/// end.
fn paginate<T>(all: &[T], page: i64, limit: i64) -> &[T] {
    let limit = limit.max(0) as usize;
    let offset = (page.saturating_sub(1).max(0) as usize).saturating_mul(limit);
    if offset >= all.len() {
        return &[];
    }
    let end = offset.saturating_add(limit).min(all.len());
    &all[offset..end]
}
