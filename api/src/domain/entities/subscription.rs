//! Subscription entities
//!
//! Upstream-reported feed descriptors as returned by the Google Reader
//! `subscription/list` endpoint. Snapshots are fetched fresh on every
//! aggregation cache miss and never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A feed the upstream account is subscribed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Opaque upstream identifier, e.g. `"feed/123"`.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub icon_url: String,
    /// Labels the user has attached to this feed.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Subscription {
    /// True if any category label matches `label` exactly.
    pub fn has_label(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c.label == label)
    }
}

/// A label attached to a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
}

/// A validated numeric feed identifier.
///
/// Upstream subscription ids come in the form `"feed/123"` or bare `"123"`.
/// Only ids whose remainder after stripping the optional `feed/` prefix is
/// all decimal digits are fetchable; everything else is excluded from
/// fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    /// Parse an upstream subscription id, returning `None` when it is not a
    /// valid numeric feed id.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("feed/").unwrap_or(raw);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(digits.to_string()))
        } else {
            None
        }
    }

    /// The numeric part, used as the upstream path segment.
    pub fn numeric(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
