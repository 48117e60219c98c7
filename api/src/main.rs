//! freshdigest API Server
//!
//! An aggregation layer in front of a FreshRSS Google-Reader-compatible
//! API. Serves a unified, freshness-sorted digest across all subscribed
//! feeds and a per-feed grouped latest view, without clients issuing one
//! request per feed. Uses hexagonal (ports & adapters) architecture for
//! clean separation of concerns.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod cache;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::GReaderClientImpl;
use app::AggregatorService;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<AggregatorService<GReaderClientImpl>>,
    pub reader: Arc<GReaderClientImpl>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid allowed origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,freshdigest_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting freshdigest API...");

    // Load configuration
    let config = Config::from_env();

    // Create the upstream adapter and the aggregation service
    let reader = Arc::new(GReaderClientImpl::new(
        config.base_url.clone(),
        config.auth_token.clone(),
        config.upstream_timeout,
    ));
    let aggregator = Arc::new(AggregatorService::new(reader.clone()));

    let state = AppState { aggregator, reader };

    // Build router
    let router = Router::new()
        // Health check
        .route("/health", get(health))
        // Aggregation endpoints
        .route("/digest", get(handlers::get_digest))
        .route("/all-latest", get(handlers::get_all_latest))
        // Pass-through proxy endpoints
        .route("/subscriptions", get(handlers::proxy_subscriptions))
        .route("/feed/:id", get(handlers::proxy_feed))
        // Middleware
        .layer(build_cors(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let ip: IpAddr = config
        .host
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let addr = SocketAddr::from((ip, config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
