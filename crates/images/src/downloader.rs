use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use netclient::{CancellationToken, Client};
use reqwest::header;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::config::DownloadConfig;
use crate::error::ImageError;
use crate::inflight::{InFlightRegistry, SingleFlightOutcome};
use crate::stats::DownloadStats;

/// Per-chunk progress callback: `(downloaded, total, dst)`. `total` is
/// `None` when the response carried no `Content-Length` (spec.md §4.5
/// point 7: "total may be downloaded + unknown if Content-Length absent").
pub type ChunkProgress = Arc<dyn Fn(u64, Option<u64>, &Path) + Send + Sync>;

/// Why a download was skipped rather than performed (spec.md §4.5 points
/// 1-2: single-flight collision vs. a pre-existing destination).
#[derive(Debug, Clone)]
pub enum SkipReason {
    AlreadyDownloading,
    AlreadyExists { size: u64 },
}

#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    Skipped { path: PathBuf, reason: SkipReason },
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Downloaded { path, .. } => path,
            DownloadOutcome::Skipped { path, .. } => path,
        }
    }
}

/// Fetches cover/fanart/preview images with single-flight deduplication by
/// URL, skip-existing, resumable partial downloads, and content-type/size
/// gating. One instance is shared across a whole run.
#[derive(Clone)]
pub struct ImageDownloader {
    client: Client,
    config: DownloadConfig,
    in_flight: InFlightRegistry,
    stats: Arc<DownloadStats>,
}

impl ImageDownloader {
    pub fn new(client: Client, config: DownloadConfig) -> Self {
        Self {
            client,
            config,
            in_flight: InFlightRegistry::new(),
            stats: Arc::new(DownloadStats::default()),
        }
    }

    pub fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    pub fn max_concurrent(&self) -> usize {
        self.config.max_concurrent
    }

    pub async fn download(
        &self,
        url: &Url,
        dest: &Path,
        token: &CancellationToken,
    ) -> Result<DownloadOutcome, ImageError> {
        self.download_with_progress(url, dest, token, None).await
    }

    pub async fn download_with_progress(
        &self,
        url: &Url,
        dest: &Path,
        token: &CancellationToken,
        progress: Option<ChunkProgress>,
    ) -> Result<DownloadOutcome, ImageError> {
        if self.config.skip_existing {
            if let Ok(meta) = fs::metadata(dest).await {
                self.stats.record_skipped();
                return Ok(DownloadOutcome::Skipped {
                    path: dest.to_path_buf(),
                    reason: SkipReason::AlreadyExists { size: meta.len() },
                });
            }
        }

        let client = self.client.clone();
        let config = self.config.clone();
        let dest_owned = dest.to_path_buf();
        let token = token.clone();

        let fetch_started = Instant::now();
        let outcome = self
            .in_flight
            .single_flight(url, move || {
                let url = url.clone();
                async move {
                    fetch_with_retry(&client, &url, &dest_owned, &config, &token, progress).await
                }
            })
            .await;

        let result = match outcome {
            SingleFlightOutcome::AlreadyInFlight => {
                self.stats.record_skipped();
                return Ok(DownloadOutcome::Skipped {
                    path: dest.to_path_buf(),
                    reason: SkipReason::AlreadyDownloading,
                });
            }
            SingleFlightOutcome::Ran(result) => result,
        };

        let elapsed = fetch_started.elapsed();
        match &result {
            Ok(DownloadOutcome::Downloaded { bytes, .. }) => {
                self.stats.record_downloaded(*bytes, elapsed)
            }
            Ok(DownloadOutcome::Skipped { .. }) => self.stats.record_skipped(),
            Err(_) => self.stats.record_failed(elapsed),
        }

        result
    }
}

async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    dest: &Path,
    config: &DownloadConfig,
    token: &CancellationToken,
    progress: Option<ChunkProgress>,
) -> Result<DownloadOutcome, ImageError> {
    let mut last_err: Option<ImageError> = None;

    for attempt in 0..=config.retry.max_retries {
        if token.is_cancelled() {
            return Err(ImageError::Cancelled);
        }

        match fetch_once(client, url, dest, config, token, progress.as_ref()).await {
            Ok(bytes) => {
                return Ok(DownloadOutcome::Downloaded {
                    path: dest.to_path_buf(),
                    bytes,
                });
            }
            Err(e) if e.is_retryable() && attempt < config.retry.max_retries => {
                warn!(url = %url, attempt, error = %e, "image download attempt failed, retrying");
                if !config.resume_partial {
                    let _ = fs::remove_file(sibling_with_suffix(dest, ".downloading")).await;
                }
                let delay = netclient::retry::delay_for_attempt(&config.retry, attempt);
                tokio::select! {
                    _ = token.cancelled() => return Err(ImageError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                last_err = Some(e);
            }
            Err(e) => {
                if !config.resume_partial {
                    let _ = fs::remove_file(sibling_with_suffix(dest, ".downloading")).await;
                }
                return Err(e);
            }
        }
    }

    if !config.resume_partial {
        let _ = fs::remove_file(sibling_with_suffix(dest, ".downloading")).await;
    }
    Err(last_err.unwrap_or(ImageError::Net("retry loop exited without an error".into())))
}

/// One fetch attempt: resumes from any partial `.downloading` sibling,
/// gates on content-type/size, streams into that sibling, then renames
/// into place atomically on success.
async fn fetch_once(
    client: &Client,
    url: &Url,
    dest: &Path,
    config: &DownloadConfig,
    token: &CancellationToken,
    progress: Option<&ChunkProgress>,
) -> Result<u64, ImageError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = sibling_with_suffix(dest, ".downloading");
    let mut resume_from = if config.resume_partial {
        fs::metadata(&tmp_path).await.map(|m| m.len()).unwrap_or(0)
    } else {
        let _ = fs::remove_file(&tmp_path).await;
        0
    };

    let mut request = client.raw().get(url.as_str());
    if resume_from > 0 {
        request = request.header(header::RANGE, format!("bytes={resume_from}-"));
    }

    let response = request
        .send()
        .await
        .map_err(netclient::NetError::Network)?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    if !config.content_type_allowed(content_type.as_deref()) {
        return Err(ImageError::DisallowedContentType {
            found: content_type,
            allowed: config.allowed_content_types.clone(),
        });
    }

    let status = response.status();
    if !status.is_success() && status != reqwest::StatusCode::PARTIAL_CONTENT {
        return Err(netclient::NetError::from_status(status, url.as_str()).into());
    }
    // Server ignored our Range header; restart from scratch rather than
    // appending a fresh full body onto a stale partial file.
    if resume_from > 0 && status != reqwest::StatusCode::PARTIAL_CONTENT {
        debug!(url = %url, "server did not honor range request, restarting download");
        resume_from = 0;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(resume_from == 0)
        .append(resume_from > 0)
        .open(&tmp_path)
        .await?;

    // Content-Length, when present, is the length of *this* response body;
    // add back what we already had on disk from a resumed partial fetch so
    // callbacks report progress against the full object size.
    let total_size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(|len| len + resume_from);

    let mut total = resume_from;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = tokio::time::timeout(config.chunk_timeout, stream.next())
        .await
        .map_err(|_| {
            ImageError::Net(format!("timed out reading body for {url} after a chunk gap"))
        })?
    {
        if token.is_cancelled() {
            return Err(ImageError::Cancelled);
        }
        let chunk = chunk.map_err(netclient::NetError::Network)?;
        total += chunk.len() as u64;
        if let Some(limit) = config.max_bytes {
            if total > limit {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(ImageError::TooLarge {
                    actual: total,
                    limit,
                });
            }
        }
        write_chunk(&mut file, &chunk).await?;
        if let Some(cb) = progress {
            cb(total, total_size, dest);
        }
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, dest).await?;
    Ok(total)
}

async fn write_chunk(file: &mut File, chunk: &[u8]) -> Result<(), ImageError> {
    file.write_all(chunk).await.map_err(ImageError::from)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
