//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod aggregation;
pub mod passthrough;

pub use aggregation::{get_all_latest, get_digest};
pub use passthrough::{proxy_feed, proxy_subscriptions};
