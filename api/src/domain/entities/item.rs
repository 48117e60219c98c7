//! Item entity
//!
//! A single upstream article. Upstream defines an open-ended set of fields;
//! everything this system does not interpret is carried through verbatim in
//! `extra`. `published` is the sole sort key for the flat digest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Subscription;

/// One article as returned by the upstream `stream/contents` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unix timestamp of publication; upstream may omit it, in which case
    /// the item sorts last.
    #[serde(default)]
    pub published: i64,

    /// Owning-feed fields, denormalized onto the item in digest mode so the
    /// flat merged list stays globally sortable without feed context.
    #[serde(default, rename = "feedId", skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(default, rename = "feedTitle", skip_serializing_if = "Option::is_none")]
    pub feed_title: Option<String>,
    #[serde(default, rename = "feedHtmlUrl", skip_serializing_if = "Option::is_none")]
    pub feed_html_url: Option<String>,
    #[serde(default, rename = "feedIconUrl", skip_serializing_if = "Option::is_none")]
    pub feed_icon_url: Option<String>,

    /// All remaining upstream fields, forwarded untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Copy the owning subscription's descriptor fields onto this item.
    pub fn attach_feed(&mut self, sub: &Subscription) {
        self.feed_id = Some(sub.id.clone());
        self.feed_title = Some(sub.title.clone());
        self.feed_html_url = Some(sub.html_url.clone());
        self.feed_icon_url = Some(sub.icon_url.clone());
    }
}
