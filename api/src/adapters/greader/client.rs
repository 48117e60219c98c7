//! Google Reader API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::{FeedId, Item, Subscription};
use crate::domain::ports::ReaderClient;
use crate::error::UpstreamError;

/// Implementation of the upstream reader client against a FreshRSS
/// Google Reader API base URL.
pub struct GReaderClientImpl {
    http: Client,
    base_url: String,
    auth_token: String,
    timeout: Duration,
}

impl GReaderClientImpl {
    pub fn new(base_url: String, auth_token: String, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            timeout,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one GET with the auth header and the bounded timeout, and
    /// classify any failure. Non-2xx responses become `Api` errors carrying
    /// the body text.
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.api_url(path);
        tracing::debug!("Fetching upstream: {}", url);

        let response = self
            .http
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("GoogleLogin auth={}", self.auth_token),
            )
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Decode(e.to_string())
            }
        })
    }
}

/// Response envelopes from the upstream API
#[derive(Deserialize)]
struct SubscriptionListResponse {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

#[derive(Deserialize)]
struct StreamContentsResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[async_trait]
impl ReaderClient for GReaderClientImpl {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, UpstreamError> {
        let response = self
            .get(
                "subscription/list",
                &[("output".to_string(), "json".to_string())],
            )
            .await?;
        let body: SubscriptionListResponse = Self::decode(response).await?;
        Ok(body.subscriptions)
    }

    async fn stream_contents(&self, id: &FeedId, n: u32) -> Result<Vec<Item>, UpstreamError> {
        let response = self
            .get(
                &format!("stream/contents/feed/{}", id.numeric()),
                &[("n".to_string(), n.to_string())],
            )
            .await?;
        let body: StreamContentsResponse = Self::decode(response).await?;
        Ok(body.items)
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        let response = self.get(path, query).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_base_and_path() {
        let client = GReaderClientImpl::new(
            "https://rss.example.com/api/greader.php/reader/api/0/".to_string(),
            "token".to_string(),
            Duration::from_secs(10),
        );

        assert_eq!(
            client.api_url("subscription/list"),
            "https://rss.example.com/api/greader.php/reader/api/0/subscription/list"
        );
        assert_eq!(
            client.api_url("/stream/contents/feed/40"),
            "https://rss.example.com/api/greader.php/reader/api/0/stream/contents/feed/40"
        );
    }

    #[test]
    fn subscription_list_envelope_defaults_to_empty() {
        let body: SubscriptionListResponse = serde_json::from_str("{}").unwrap();
        assert!(body.subscriptions.is_empty());
    }

    #[test]
    fn stream_contents_envelope_defaults_to_empty() {
        let body: StreamContentsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.items.is_empty());
    }
}
