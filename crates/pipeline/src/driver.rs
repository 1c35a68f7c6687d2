use std::path::Path;
use std::sync::Arc;

use images::ImageDownloader;
use netclient::{CancellationToken, Client, NetError};
use sources::{AdapterRegistry, FetchContext, Identifier, SourceRecord};
use tracing::warn;

use crate::config::PipelineConfig;
use crate::counters::{CounterSnapshot, RunCounters};
use crate::jobs;
use crate::outcome::{FailureReason, IdentifierOutcome};

/// Sequences the five leaf components for each identified video, one
/// identifier at a time (spec.md §4.8: "single-threaded across identifiers
/// by default ... individual steps are internally concurrent"). One
/// instance is built per run and reused across every identifier so the
/// HTTP client's connection pool, cookie jar, and the downloader's
/// single-flight table are shared the whole way through.
pub struct PipelineDriver {
    client: Client,
    registry: Arc<AdapterRegistry>,
    downloader: ImageDownloader,
    config: PipelineConfig,
    counters: Arc<RunCounters>,
}

impl PipelineDriver {
    pub fn new(registry: AdapterRegistry, config: PipelineConfig) -> Result<Self, NetError> {
        let client = Client::new(config.net.clone())?;
        let downloader = ImageDownloader::new(client.clone(), config.download.clone());
        Ok(Self {
            client,
            registry: Arc::new(registry),
            downloader,
            config,
            counters: Arc::new(RunCounters::default()),
        })
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Runs the full per-identifier pipeline: crawl, merge, sidecar,
    /// images, (optionally) relocate. Never returns an error — every
    /// failure mode short-circuits into `IdentifierOutcome::Failed` so the
    /// caller can keep sweeping the rest of the directory (spec.md §7).
    pub async fn process_identifier(
        &self,
        identifier: &Identifier,
        source_video: &Path,
        cancellation: &CancellationToken,
    ) -> IdentifierOutcome {
        let crawl_result = self.crawl(identifier, cancellation).await;

        let records: Vec<SourceRecord> = crawl_result.successful_records().into_iter().cloned().collect();
        if records.is_empty() {
            self.counters.record_identifier(false);
            return IdentifierOutcome::Failed {
                identifier: identifier.clone(),
                reason: FailureReason::NoMetadata,
            };
        }

        let merged = merge::merge(&records);
        if !merged.is_valid() {
            self.counters.record_identifier(false);
            return IdentifierOutcome::Failed {
                identifier: identifier.clone(),
                reason: FailureReason::Validation(
                    "merged record has no title or identifier".to_string(),
                ),
            };
        }

        let base_dir = source_video.parent().unwrap_or_else(|| Path::new("."));
        let sidecar_dest = jobs::sidecar_path(source_video);
        let sidecar_written = match sidecar::write_sidecar(&merged, &self.config.sidecar, &sidecar_dest) {
            Ok(()) => {
                self.counters.record_sidecar();
                true
            }
            Err(e) => {
                warn!(%identifier, error = %e, "failed to write sidecar");
                false
            }
        };

        let requests = jobs::build_requests(&merged, base_dir, self.config.max_previews);
        let downloads = images::download_batch(&self.downloader, requests, cancellation, None).await;
        for (_, result) in &downloads {
            if let Ok(images::DownloadOutcome::Downloaded { bytes, .. }) = result {
                self.counters.record_image(*bytes);
            }
        }

        let organize = self.relocate(identifier, source_video, &merged).await;

        self.counters.record_identifier(true);
        IdentifierOutcome::Success {
            identifier: identifier.clone(),
            record: merged,
            sidecar_path: sidecar_written.then_some(sidecar_dest),
            downloads,
            organize,
        }
    }

    async fn crawl(
        &self,
        identifier: &Identifier,
        cancellation: &CancellationToken,
    ) -> crawler::CrawlResult {
        let adapters = self.registry.enabled(&self.config.enabled_adapters);
        let client = self.client.clone();
        let ctx_cancellation = cancellation.clone();
        crawler::orchestrate(
            identifier,
            &adapters,
            move || FetchContext::new(client.clone(), ctx_cancellation.clone()),
            self.config.crawl,
            crawler::noop_sink(),
            cancellation.clone(),
        )
        .await
    }

    async fn relocate(
        &self,
        identifier: &Identifier,
        source_video: &Path,
        merged: &merge::MergedRecord,
    ) -> Option<organizer::OrganizeOperation> {
        if !self.config.organize_enabled {
            return None;
        }
        match organizer::organize(&self.config.output_dir, source_video, merged, &self.config.organize).await {
            Ok(op) => {
                let completed = matches!(
                    op.status,
                    organizer::OrganizeStatus::Completed | organizer::OrganizeStatus::Planned
                );
                self.counters.record_organize(completed);
                Some(op)
            }
            Err(e) => {
                warn!(%identifier, error = %e, "organize failed before an operation could be started");
                None
            }
        }
    }
}
