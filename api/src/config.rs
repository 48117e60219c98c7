use std::env;
use std::time::Duration;

/// Default upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    /// FreshRSS API token, sent as `GoogleLogin auth={token}`.
    pub auth_token: String,
    /// Base URL of the Google Reader API, without trailing slash.
    pub base_url: String,
    /// Origins allowed by CORS; empty means no cross-origin callers.
    pub allowed_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    /// Per-request timeout for upstream calls.
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let auth_token = env::var("FRESHRSS_API_TOKEN").unwrap_or_default();
        let base_url = env::var("FRESHRSS_BASE_URL")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        if auth_token.is_empty() || base_url.is_empty() {
            tracing::warn!(
                "Either FRESHRSS_API_TOKEN or FRESHRSS_BASE_URL is missing. \
                 Proxy may not function correctly."
            );
        }

        Self {
            auth_token,
            base_url,
            allowed_origins: parse_origins(
                &env::var("FRESHPROXY_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            host: env::var("FRESHPROXY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("FRESHPROXY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            upstream_timeout: Duration::from_secs(
                env::var("FRESHPROXY_UPSTREAM_TIMEOUT")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
        }
    }
}

/// Split a comma-separated origin list, dropping blank entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_drops_blank_entries() {
        let origins = parse_origins(
            "http://localhost:3000, , https://test.com, ,https://proxy.example.com",
        );
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000",
                "https://test.com",
                "https://proxy.example.com",
            ]
        );
    }

    #[test]
    fn parse_origins_empty_input_is_empty() {
        assert!(parse_origins("").is_empty());
    }
}
