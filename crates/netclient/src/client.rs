use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client as ReqwestClient, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::config::{default_headers, ClientConfig};
use crate::error::NetError;
use crate::proxy::build_proxy;
use crate::rate_limit::HostRateLimiter;
use crate::retry::retry_with_backoff;

/// The shared, poolable HTTP client every source adapter and the image
/// downloader go through. One instance is built per run and cloned
/// (cheaply, like `reqwest::Client`) into every task that needs it.
#[derive(Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: Arc<ClientConfig>,
    limiter: Arc<HostRateLimiter>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, NetError> {
        let mut builder = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .default_headers(default_headers(&config.user_agent))
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .cookie_store(config.cookies_enabled);

        if let Some(proxy_cfg) = &config.proxy {
            builder = builder.proxy(build_proxy(proxy_cfg)?);
        }

        let inner = builder
            .build()
            .map_err(|e| NetError::Unknown(format!("failed to build http client: {e}")))?;

        let limiter = HostRateLimiter::new(config.requests_per_second_per_host);

        Ok(Self {
            inner,
            config: Arc::new(config),
            limiter: Arc::new(limiter),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Raw `reqwest::Client` for callers (e.g. adapters) that need to build
    /// a more elaborate request than `get_text`/`get_bytes` cover.
    pub fn raw(&self) -> &ReqwestClient {
        &self.inner
    }

    /// GET `url`, retrying per `self.config.retry`, returning the decoded
    /// body as text. Non-2xx responses are classified via
    /// `NetError::from_status` (404 -> NotFound, 429 -> RateLimit, etc.).
    pub async fn get_text(&self, url: &str, token: &CancellationToken) -> Result<String, NetError> {
        let response = self.get(url, token).await?;
        response.text().await.map_err(NetError::from)
    }

    pub async fn get_bytes(
        &self,
        url: &str,
        token: &CancellationToken,
    ) -> Result<bytes::Bytes, NetError> {
        let response = self.get(url, token).await?;
        response.bytes().await.map_err(NetError::from)
    }

    /// GET `url` with retry + per-host rate limiting, returning the raw
    /// `Response` once a successful status is observed. Non-retryable
    /// failures are not retried; retryable ones follow `config.retry`.
    pub async fn get(&self, url: &str, token: &CancellationToken) -> Result<Response, NetError> {
        let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
        let host = parsed.host_str().unwrap_or("").to_string();

        let policy = self.config.retry;
        let inner = self.inner.clone();
        let limiter = self.limiter.clone();
        let url_owned = url.to_string();

        retry_with_backoff(&policy, token, move || {
            let inner = inner.clone();
            let limiter = limiter.clone();
            let host = host.clone();
            let url_owned = url_owned.clone();
            async move {
                limiter.acquire(&host).await;
                let started = Instant::now();
                let result = inner.get(&url_owned).send().await;
                match result {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            Ok(response)
                        } else {
                            let retry_after = response
                                .headers()
                                .get(reqwest::header::RETRY_AFTER)
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok());
                            if retry_after.is_some() {
                                warn!(url = %url_owned, ?retry_after, status = %status, "server requested a retry delay");
                            }
                            Err(NetError::from_status_with_retry_after(
                                status,
                                &url_owned,
                                retry_after,
                            ))
                        }
                    }
                    Err(e) if e.is_timeout() => Err(NetError::Timeout {
                        url: url_owned.clone(),
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    }),
                    Err(e) => {
                        debug!(url = %url_owned, error = %e, "request failed");
                        Err(NetError::Network(e))
                    }
                }
            }
        })
        .await
    }
}
