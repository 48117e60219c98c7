//! Test fixtures
//!
//! Builders for common test data.

use serde_json::Map;

use crate::domain::entities::{Category, Item, Subscription};

/// A subscription with derived title/urls and no labels.
pub fn subscription(id: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        title: format!("Feed {id}"),
        html_url: format!("https://example.com/{id}"),
        icon_url: format!("https://example.com/{id}/icon"),
        categories: Vec::new(),
    }
}

/// A subscription carrying a single label.
pub fn subscription_with_label(id: &str, label: &str) -> Subscription {
    let mut sub = subscription(id);
    sub.categories.push(Category {
        id: Some(format!("user/-/label/{label}")),
        label: label.to_string(),
    });
    sub
}

/// A bare item with only the sort key set.
pub fn item_published_at(published: i64) -> Item {
    Item {
        published,
        feed_id: None,
        feed_title: None,
        feed_html_url: None,
        feed_icon_url: None,
        extra: Map::new(),
    }
}
