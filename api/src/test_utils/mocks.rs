//! Mock implementation of the reader port
//!
//! An in-memory, scriptable `ReaderClient`. Per-feed responses are queued:
//! a feed with several scripted responses yields them in order (so retry
//! behavior can be exercised), and the final one repeats for any further
//! calls. Unscripted feeds return an empty item list.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{FeedId, Item, Subscription};
use crate::domain::ports::ReaderClient;
use crate::error::UpstreamError;

type FeedScript = VecDeque<Result<Vec<Item>, UpstreamError>>;

pub struct MockReaderClient {
    subscriptions: RwLock<Result<Vec<Subscription>, UpstreamError>>,
    feeds: RwLock<HashMap<String, FeedScript>>,
    subscription_calls: RwLock<usize>,
    stream_call_counts: RwLock<HashMap<String, usize>>,
}

impl MockReaderClient {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Ok(Vec::new())),
            feeds: RwLock::new(HashMap::new()),
            subscription_calls: RwLock::new(0),
            stream_call_counts: RwLock::new(HashMap::new()),
        }
    }

    /// Script the subscription list.
    pub fn with_subscriptions(self, subs: Vec<Subscription>) -> Self {
        *self.subscriptions.write().unwrap() = Ok(subs);
        self
    }

    /// Script a directory-level failure.
    pub fn with_subscriptions_error(self, err: UpstreamError) -> Self {
        *self.subscriptions.write().unwrap() = Err(err);
        self
    }

    /// Script a feed (by numeric id) to return these items on every call.
    pub fn with_feed_items(self, numeric_id: &str, items: Vec<Item>) -> Self {
        self.push_response(numeric_id, Ok(items));
        self
    }

    /// Script a feed to fail with `err` on every call.
    pub fn with_feed_error(self, numeric_id: &str, err: UpstreamError) -> Self {
        self.push_response(numeric_id, Err(err));
        self
    }

    /// Script an explicit response sequence for a feed; the last response
    /// repeats once the sequence is exhausted.
    pub fn with_feed_sequence(
        self,
        numeric_id: &str,
        responses: Vec<Result<Vec<Item>, UpstreamError>>,
    ) -> Self {
        for response in responses {
            self.push_response(numeric_id, response);
        }
        self
    }

    fn push_response(&self, numeric_id: &str, response: Result<Vec<Item>, UpstreamError>) {
        self.feeds
            .write()
            .unwrap()
            .entry(numeric_id.to_string())
            .or_default()
            .push_back(response);
    }

    /// How many times the subscription list was fetched.
    pub fn subscription_calls(&self) -> usize {
        *self.subscription_calls.read().unwrap()
    }

    /// How many times one feed (by numeric id) was fetched.
    pub fn stream_calls(&self, numeric_id: &str) -> usize {
        self.stream_call_counts
            .read()
            .unwrap()
            .get(numeric_id)
            .copied()
            .unwrap_or(0)
    }

    /// Total fetch calls across all feeds.
    pub fn total_stream_calls(&self) -> usize {
        self.stream_call_counts.read().unwrap().values().sum()
    }
}

impl Default for MockReaderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReaderClient for MockReaderClient {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, UpstreamError> {
        *self.subscription_calls.write().unwrap() += 1;
        self.subscriptions.read().unwrap().clone()
    }

    async fn stream_contents(&self, id: &FeedId, _n: u32) -> Result<Vec<Item>, UpstreamError> {
        *self
            .stream_call_counts
            .write()
            .unwrap()
            .entry(id.numeric().to_string())
            .or_insert(0) += 1;

        let mut feeds = self.feeds.write().unwrap();
        match feeds.get_mut(id.numeric()) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap(),
            Some(script) => script.front().cloned().unwrap_or(Ok(Vec::new())),
            None => Ok(Vec::new()),
        }
    }

    async fn get_json(
        &self,
        _path: &str,
        _query: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        Ok(Value::Object(serde_json::Map::new()))
    }
}
