use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use netclient::CancellationToken;
use tokio::sync::Semaphore;
use url::Url;

use crate::downloader::{ChunkProgress, DownloadOutcome, ImageDownloader};
use crate::error::ImageError;

/// One item to fetch as part of a batch: a URL and the path it should end
/// up at.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: Url,
    pub dest: PathBuf,
}

pub type ProgressCallback = Arc<dyn Fn(&DownloadRequest, &Result<DownloadOutcome, ImageError>) + Send + Sync>;

/// Runs a batch of downloads with concurrency capped by
/// `DownloadConfig::max_concurrent`, reporting each completion through an
/// optional callback as it lands (not necessarily in request order).
pub async fn download_batch(
    downloader: &ImageDownloader,
    requests: Vec<DownloadRequest>,
    token: &CancellationToken,
    on_progress: Option<ProgressCallback>,
) -> Vec<(DownloadRequest, Result<DownloadOutcome, ImageError>)> {
    download_batch_with_chunk_progress(downloader, requests, token, on_progress, None).await
}

/// Same as `download_batch`, additionally forwarding a per-chunk
/// `(downloaded, total, dst)` callback (spec.md §4.5 point 7) into every
/// job's fetch.
pub async fn download_batch_with_chunk_progress(
    downloader: &ImageDownloader,
    requests: Vec<DownloadRequest>,
    token: &CancellationToken,
    on_progress: Option<ProgressCallback>,
    on_chunk: Option<ChunkProgress>,
) -> Vec<(DownloadRequest, Result<DownloadOutcome, ImageError>)> {
    let max_concurrent = downloader.max_concurrent();
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let futures = requests.into_iter().map(|request| {
        let downloader = downloader.clone();
        let token = token.clone();
        let semaphore = semaphore.clone();
        let on_progress = on_progress.clone();
        let on_chunk = on_chunk.clone();
        async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let result = downloader
                .download_with_progress(&request.url, &request.dest, &token, on_chunk)
                .await;
            if let Some(cb) = &on_progress {
                cb(&request, &result);
            }
            (request, result)
        }
    });

    join_all(futures).await
}
