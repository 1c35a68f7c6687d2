use thiserror::Error;

/// Error taxonomy for the shared HTTP client.
///
/// Every layer above this one matches on these variants instead of
/// re-deriving retryability from a raw `reqwest::Error`.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http {status} for {url}")]
    Http {
        status: u16,
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("request to {url} timed out after {elapsed_ms}ms")]
    Timeout { url: String, elapsed_ms: u64 },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("rate limited, retry after {retry_after_secs:?}s")]
    RateLimit { retry_after_secs: Option<u64> },

    #[error("invalid proxy configuration: {0}")]
    Proxy(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("retry budget exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<NetError>,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl NetError {
    /// Whether retrying the same request again might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetError::Network(e) => is_retryable_reqwest_error(e),
            NetError::Http { status, .. } => {
                *status == 408 || *status == 429 || (*status >= 500 && *status < 600)
            }
            NetError::Timeout { .. } => true,
            NetError::RateLimit { .. } => true,
            NetError::NotFound(_) => false,
            NetError::Proxy(_) => false,
            NetError::InvalidUrl(_) => false,
            NetError::RetriesExhausted { .. } => false,
            NetError::Cancelled => false,
            NetError::Unknown(_) => false,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, url: &str) -> NetError {
        Self::from_status_with_retry_after(status, url, None)
    }

    /// Same classification as `from_status`, plus a parsed `Retry-After`
    /// header value (honored on 429/503 per spec.md §4.1/§7).
    pub fn from_status_with_retry_after(
        status: reqwest::StatusCode,
        url: &str,
        retry_after_secs: Option<u64>,
    ) -> NetError {
        if status == reqwest::StatusCode::NOT_FOUND {
            NetError::NotFound(url.to_string())
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            NetError::RateLimit { retry_after_secs }
        } else {
            NetError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                retry_after_secs,
            }
        }
    }

    /// The server-dictated delay before the next attempt, when this error
    /// carried one (429/503's `Retry-After`). `None` means the caller
    /// should fall back to its own backoff schedule.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            NetError::RateLimit {
                retry_after_secs: Some(secs),
            }
            | NetError::Http {
                retry_after_secs: Some(secs),
                ..
            } => Some(std::time::Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

pub(crate) fn is_retryable_reqwest_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() {
        return true;
    }
    if let Some(status) = err.status() {
        return status == reqwest::StatusCode::REQUEST_TIMEOUT
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error();
    }
    // Body/decode errors mid-stream are worth one more try; request building
    // or URL parsing problems are not.
    err.is_body() || err.is_request()
}
