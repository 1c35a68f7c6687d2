use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::proxy::ProxyConfig;

/// Configuration for the shared HTTP client.
///
/// Field-for-field this is a generalization of `mesio::config::DownloaderConfig`
/// to the scraping domain: no cache-related knobs, but the same
/// timeout/proxy/TLS/header shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub total_timeout: Duration,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub danger_accept_invalid_certs: bool,
    pub cookies_enabled: bool,
    pub proxy: Option<ProxyConfig>,
    pub requests_per_second_per_host: Option<u32>,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            total_timeout: Duration::from_secs(60),
            user_agent: DEFAULT_UA.to_string(),
            follow_redirects: true,
            danger_accept_invalid_certs: false,
            cookies_enabled: true,
            proxy: None,
            requests_per_second_per_host: Some(4),
            retry: RetryConfig::default(),
        }
    }
}

pub const DEFAULT_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Retry/backoff policy shared by the client's own request loop and by
/// callers (e.g. the crawl orchestrator) that wrap a whole multi-request
/// transaction in one retry budget. Implements spec.md §4.1's
/// `delay_n = min(max_delay, initial * factor^n) * (1 +/- jitter)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// The backoff growth base (`factor` in spec.md §6/§4.1). `2.0` doubles
    /// the delay each attempt; `1.0` disables growth entirely.
    pub factor: f64,
    /// Jitter magnitude as a fraction of the scaled delay: `0.5` samples
    /// uniformly from `(1 - 0.5) .. (1 + 0.5)` of the capped delay; `0.0`
    /// disables jitter.
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            factor: 2.0,
            jitter: 0.5,
        }
    }
}

pub fn default_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(HeaderName::from_static("user-agent"), value);
    }
    headers
}
