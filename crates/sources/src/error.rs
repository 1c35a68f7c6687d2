use netclient::NetError;
use thiserror::Error;

/// Error taxonomy for a single adapter fetch. Generalizes
/// `platforms::extractor::error::ExtractorError` to the scraping domain:
/// network/http/timeout classes delegate to `NetError`, plus the
/// scraper-specific `NotFound`/`Parsing`/`Validation`/`Auth` classes a
/// single source adapter can hit.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Net(#[from] NetError),

    #[error("failed to parse response: {0}")]
    Parsing(String),

    #[error("response failed validation: {0}")]
    Validation(String),

    #[error("authentication required or rejected: {0}")]
    Auth(String),

    #[error("cancelled")]
    Cancelled,

    #[error("unknown adapter error: {0}")]
    Unknown(String),
}

impl AdapterError {
    pub fn is_retryable(&self) -> bool {
        match self {
            AdapterError::NotFound => false,
            AdapterError::Net(e) => e.is_retryable(),
            // A transient HTML variant is worth one more try; see
            // `retry_limit` for the cap that keeps it to exactly one.
            AdapterError::Parsing(_) => true,
            AdapterError::Validation(_) => false,
            AdapterError::Auth(_) => false,
            AdapterError::Cancelled => false,
            AdapterError::Unknown(_) => false,
        }
    }

    /// How many retries this error class is allowed, given the adapter's
    /// configured budget. Parsing failures get at most one retry (worth
    /// one more try in case of a transient HTML variant, then reported)
    /// even if the configured retry budget is larger; every other
    /// retryable class uses the full configured budget.
    pub fn retry_limit(&self, configured_max_retries: u32) -> u32 {
        match self {
            AdapterError::Parsing(_) => configured_max_retries.min(1),
            _ => configured_max_retries,
        }
    }

    /// Classifies a raw `NetError`, collapsing `NetError::NotFound` into
    /// `AdapterError::NotFound` rather than the generic `Net` wrapper so
    /// callers can match on one variant regardless of which layer noticed.
    pub fn from_net(err: NetError) -> Self {
        match err {
            NetError::NotFound(_) => AdapterError::NotFound,
            NetError::Cancelled => AdapterError::Cancelled,
            other => AdapterError::Net(other),
        }
    }
}
