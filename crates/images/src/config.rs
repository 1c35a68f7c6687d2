use std::time::Duration;

use netclient::RetryConfig;
use serde::{Deserialize, Serialize};

/// Governs a single image transaction: which content types are accepted,
/// how large a response may be, whether an existing file short-circuits
/// the fetch, and the retry budget around the whole fetch-and-write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub allowed_content_types: Vec<String>,
    pub max_bytes: Option<u64>,
    pub skip_existing: bool,
    /// When true, a `.downloading` sibling left over from a prior attempt
    /// is resumed with a `Range` request instead of being discarded.
    pub resume_partial: bool,
    pub chunk_timeout: Duration,
    pub retry: RetryConfig,
    /// Upper bound on concurrent transfers across a `DownloadBatch`.
    pub max_concurrent: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            allowed_content_types: vec![
                "image/jpeg".into(),
                "image/png".into(),
                "image/webp".into(),
                "image/gif".into(),
            ],
            max_bytes: Some(25 * 1024 * 1024),
            skip_existing: true,
            resume_partial: true,
            chunk_timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            max_concurrent: 4,
        }
    }
}

impl DownloadConfig {
    pub fn content_type_allowed(&self, content_type: Option<&str>) -> bool {
        if self.allowed_content_types.is_empty() {
            return true;
        }
        match content_type {
            Some(ct) => {
                let base = ct.split(';').next().unwrap_or(ct).trim();
                self.allowed_content_types
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(base))
            }
            None => false,
        }
    }
}
