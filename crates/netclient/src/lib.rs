//! Shared HTTP client used by every source adapter and the image downloader:
//! pooled connections, a persistent cookie jar, retry with backoff, and
//! per-host rate limiting.

pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod rate_limit;
pub mod retry;

pub use client::Client;
pub use config::{ClientConfig, RetryConfig};
pub use error::NetError;
pub use tokio_util::sync::CancellationToken;
