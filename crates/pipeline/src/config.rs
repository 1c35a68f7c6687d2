use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Aggregates every component's own config into one run-level value,
/// mirroring `siphon_cli::config::ProgramConfig`'s
/// aggregate-of-sub-configs shape. The driver never invents config of its
/// own beyond the handful of run-level knobs spec.md §6 assigns to it
/// directly (`sources.enabled`, `organize.enabled`, `organize.output_dir`,
/// the preview-image cap).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub net: netclient::ClientConfig,
    /// `sources.enabled`: adapter names to run, in registration order.
    /// Empty means "every registered adapter".
    pub enabled_adapters: Vec<String>,
    pub crawl: crawler::CrawlConfig,
    pub download: images::DownloadConfig,
    /// Upper bound on preview images fetched per identifier. Spec.md §6:
    /// "up to 10 preview images named `fanart1.<ext>` ... `fanart10.<ext>`".
    pub max_previews: usize,
    pub sidecar: sidecar::SidecarConfig,
    pub organize: organizer::OrganizeConfig,
    /// `organize.enabled`: whether step 6 (relocation) runs at all.
    pub organize_enabled: bool,
    /// `organize.output_dir`: root the organizer renders destinations under.
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            net: netclient::ClientConfig::default(),
            enabled_adapters: Vec::new(),
            crawl: crawler::CrawlConfig::default(),
            download: images::DownloadConfig::default(),
            max_previews: 10,
            sidecar: sidecar::SidecarConfig::default(),
            organize: organizer::OrganizeConfig::default(),
            organize_enabled: false,
            output_dir: PathBuf::from("organized"),
        }
    }
}
