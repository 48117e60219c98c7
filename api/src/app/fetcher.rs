//! Feed fetcher
//!
//! Fetches one feed's most recent items with bounded retry. Every failure
//! path degrades to a returned [`FetchError`] so a single bad feed can
//! never take down an aggregation batch.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::{FeedId, Item};
use crate::domain::ports::ReaderClient;
use crate::error::UpstreamError;

/// Extra attempts after the first failed fetch.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

/// Terminal failure for one feed after retries are exhausted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Timeout after retries")]
    TimedOut,

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Decode(String),
}

impl From<UpstreamError> for FetchError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout => FetchError::TimedOut,
            UpstreamError::Decode(msg) => FetchError::Decode(msg),
            other => FetchError::Request(other.to_string()),
        }
    }
}

/// Per-feed fetch with bounded, immediate retry.
pub struct FeedFetcher<C: ReaderClient> {
    reader: Arc<C>,
    retry_attempts: u32,
}

impl<C: ReaderClient> FeedFetcher<C> {
    pub fn new(reader: Arc<C>, retry_attempts: u32) -> Self {
        Self {
            reader,
            retry_attempts,
        }
    }

    /// Fetch up to `n` most recent items for `id`.
    ///
    /// Timeouts, transport/HTTP-level failures, and decode failures are all
    /// retried immediately, up to `retry_attempts` additional times; the
    /// last failure is classified into a [`FetchError`].
    pub async fn fetch(&self, id: &FeedId, n: u32) -> Result<Vec<Item>, FetchError> {
        let mut attempt = 0;
        loop {
            match self.reader.stream_contents(id, n).await {
                Ok(items) => return Ok(items),
                Err(err) => {
                    tracing::warn!(
                        "Fetch attempt {} for feed {} failed: {}",
                        attempt + 1,
                        id,
                        err
                    );
                    if attempt >= self.retry_attempts {
                        return Err(err.into());
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{item_published_at, MockReaderClient};

    fn feed_id(raw: &str) -> FeedId {
        FeedId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn first_attempt_success_fetches_once() {
        let reader = Arc::new(
            MockReaderClient::new().with_feed_items("1", vec![item_published_at(100)]),
        );
        let fetcher = FeedFetcher::new(reader.clone(), DEFAULT_RETRY_ATTEMPTS);

        let items = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(reader.stream_calls("1"), 1);
    }

    #[tokio::test]
    async fn transient_error_then_success_fetches_twice() {
        let reader = Arc::new(MockReaderClient::new().with_feed_sequence(
            "1",
            vec![
                Err(UpstreamError::Request("connection reset".into())),
                Ok(vec![item_published_at(100)]),
            ],
        ));
        let fetcher = FeedFetcher::new(reader.clone(), DEFAULT_RETRY_ATTEMPTS);

        let items = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(reader.stream_calls("1"), 2);
    }

    #[tokio::test]
    async fn exhausted_timeouts_classify_as_timed_out() {
        let reader =
            Arc::new(MockReaderClient::new().with_feed_error("1", UpstreamError::Timeout));
        let fetcher = FeedFetcher::new(reader.clone(), DEFAULT_RETRY_ATTEMPTS);

        let err = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap_err();

        assert_eq!(err, FetchError::TimedOut);
        assert_eq!(err.to_string(), "Timeout after retries");
        // one initial try plus two retries
        assert_eq!(reader.stream_calls("1"), 3);
    }

    #[tokio::test]
    async fn exhausted_decode_errors_keep_their_message() {
        let reader = Arc::new(
            MockReaderClient::new().with_feed_error("1", UpstreamError::Decode("bad JSON".into())),
        );
        let fetcher = FeedFetcher::new(reader.clone(), DEFAULT_RETRY_ATTEMPTS);

        let err = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap_err();

        assert_eq!(err, FetchError::Decode("bad JSON".into()));
    }

    #[tokio::test]
    async fn zero_retries_fails_after_one_attempt() {
        let reader = Arc::new(
            MockReaderClient::new()
                .with_feed_error("1", UpstreamError::Request("boom".into())),
        );
        let fetcher = FeedFetcher::new(reader.clone(), 0);

        let err = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
        assert_eq!(reader.stream_calls("1"), 1);
    }

    #[tokio::test]
    async fn non_2xx_after_retries_reports_transport_message() {
        let reader = Arc::new(MockReaderClient::new().with_feed_error(
            "1",
            UpstreamError::Api {
                status: 503,
                message: "unavailable".into(),
            },
        ));
        let fetcher = FeedFetcher::new(reader.clone(), 1);

        let err = fetcher.fetch(&feed_id("feed/1"), 5).await.unwrap_err();

        assert_eq!(
            err,
            FetchError::Request("upstream returned 503: unavailable".into())
        );
        assert_eq!(reader.stream_calls("1"), 2);
    }
}
