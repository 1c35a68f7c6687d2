//! Single-flight, resumable, content-gated image downloader used for
//! cover/fanart/preview assets.

pub mod batch;
pub mod config;
pub mod downloader;
mod inflight;
pub mod error;
pub mod stats;

pub use batch::{download_batch, download_batch_with_chunk_progress, DownloadRequest, ProgressCallback};
pub use config::DownloadConfig;
pub use downloader::{ChunkProgress, DownloadOutcome, ImageDownloader, SkipReason};
pub use error::ImageError;
pub use stats::DownloadStats;
