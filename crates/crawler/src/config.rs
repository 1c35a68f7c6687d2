use std::time::Duration;

use netclient::RetryConfig;
use serde::{Deserialize, Serialize};

/// Per-identifier crawl configuration: one timeout budget and one retry
/// policy shared by every enabled adapter. Spec.md §5: "the orchestrator
/// enforces a per-adapter timeout, the HTTP client enforces a per-request
/// timeout (must be <= per-adapter)" — callers are expected to configure
/// `netclient::ClientConfig::total_timeout` accordingly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub per_adapter_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            per_adapter_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}
