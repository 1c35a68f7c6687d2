use std::path::PathBuf;

use images::{DownloadOutcome, DownloadRequest, ImageError};
use merge::MergedRecord;
use organizer::OrganizeOperation;
use sources::Identifier;

/// Why an identifier produced no usable record. Spec.md §7 distinguishes
/// "no adapter returned anything" (every adapter `NotFound`, or the crawl
/// was cancelled before any succeeded) from "adapters disagreed but the
/// merged result still fails the minimum-field invariant" (error class 7,
/// Validation).
#[derive(Debug, Clone)]
pub enum FailureReason {
    NoMetadata,
    Validation(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NoMetadata => write!(f, "no metadata found"),
            FailureReason::Validation(reason) => write!(f, "validation failed: {reason}"),
        }
    }
}

/// The per-identifier result of running the full seven-step pipeline
/// (spec.md §4.8). The driver never propagates a per-identifier error to
/// the process level (spec.md §7); every outcome, success or failure, is
/// data the caller renders as one summary line.
#[derive(Debug)]
pub enum IdentifierOutcome {
    Success {
        identifier: Identifier,
        record: MergedRecord,
        sidecar_path: Option<PathBuf>,
        downloads: Vec<(DownloadRequest, Result<DownloadOutcome, ImageError>)>,
        organize: Option<OrganizeOperation>,
    },
    Failed {
        identifier: Identifier,
        reason: FailureReason,
    },
}

impl IdentifierOutcome {
    pub fn identifier(&self) -> &Identifier {
        match self {
            IdentifierOutcome::Success { identifier, .. } => identifier,
            IdentifierOutcome::Failed { identifier, .. } => identifier,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IdentifierOutcome::Success { .. })
    }

    /// One line, matching spec.md §7's "each identifier produces one line
    /// in the summary indicating success/failure".
    pub fn summary_line(&self) -> String {
        match self {
            IdentifierOutcome::Success {
                identifier,
                record,
                downloads,
                organize,
                ..
            } => {
                let downloaded = downloads
                    .iter()
                    .filter(|(_, r)| matches!(r, Ok(DownloadOutcome::Downloaded { .. })))
                    .count();
                let relocated = organize
                    .as_ref()
                    .map(|op| format!(", relocated to {}", op.destination.display()))
                    .unwrap_or_default();
                format!(
                    "{identifier}: OK (quality {:.2}, {downloaded}/{} images{relocated})",
                    record.quality,
                    downloads.len(),
                )
            }
            IdentifierOutcome::Failed { identifier, reason } => {
                format!("{identifier}: FAILED ({reason})")
            }
        }
    }
}
