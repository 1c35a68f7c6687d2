use std::path::{Path, PathBuf};

use merge::MergedRecord;
use tokio::fs;
use tracing::{info, warn};

use crate::config::{ExistingFilePolicy, OrganizeConfig, RelocateAction};
use crate::error::OrganizerError;
use crate::operation::{OrganizeOperation, OrganizeStatus};
use crate::path::render_destination;

/// NFS/SMB cross-device rename failures surface as `EXDEV` (errno 18 on
/// Linux and macOS); fall back to copy-then-delete in that case.
const EXDEV: i32 = 18;

/// Relocates `source` to a pattern-rendered destination under
/// `output_root`, per spec.md §4.7. Every step after directory creation is
/// undone on failure: a made backup is restored, a partial destination is
/// removed, and any directory this call created is removed if it ended up
/// empty.
pub async fn organize(
    output_root: &Path,
    source: &Path,
    record: &MergedRecord,
    config: &OrganizeConfig,
) -> Result<OrganizeOperation, OrganizerError> {
    let destination = render_destination(output_root, source, record, config)?;
    let dest_dir = destination.parent().unwrap_or(output_root).to_path_buf();

    if config.dry_run {
        return Ok(OrganizeOperation {
            status: OrganizeStatus::Planned,
            source: source.to_path_buf(),
            destination,
            backup_path: None,
            created_dirs: missing_ancestors(&dest_dir).await,
            error: None,
        });
    }

    let created_dirs = missing_ancestors(&dest_dir).await;
    fs::create_dir_all(&dest_dir)
        .await
        .map_err(|e| OrganizerError::io("creating destination directory", e))?;

    match try_relocate(source, &destination, config).await {
        Ok(backup_path) => {
            info!(source = %source.display(), destination = %destination.display(), "organized");
            Ok(OrganizeOperation {
                status: OrganizeStatus::Completed,
                source: source.to_path_buf(),
                destination,
                backup_path,
                created_dirs,
                error: None,
            })
        }
        Err((err, backup_path)) => {
            warn!(error = %err, "organize failed, rolling back");
            // `AlreadyExists` (Skip policy) never made a backup or a partial
            // destination, so there is nothing to undo beyond reporting it.
            let status = if matches!(err, OrganizerError::AlreadyExists(_)) {
                OrganizeStatus::Failed
            } else {
                roll_back(&destination, backup_path.as_deref(), &created_dirs).await;
                OrganizeStatus::RolledBack
            };
            Ok(OrganizeOperation {
                status,
                source: source.to_path_buf(),
                destination,
                backup_path: None,
                created_dirs,
                error: Some(err.to_string()),
            })
        }
    }
}

/// Handles the existing-target policy then relocates. Returns the backup
/// path (if one was made) so the caller can restore it on a later failure.
async fn try_relocate(
    source: &Path,
    destination: &Path,
    config: &OrganizeConfig,
) -> Result<Option<PathBuf>, (OrganizerError, Option<PathBuf>)> {
    let mut backup_path = None;

    if fs::metadata(destination).await.is_ok() {
        match config.existing {
            ExistingFilePolicy::Skip => {
                return Err((
                    OrganizerError::AlreadyExists(destination.to_path_buf()),
                    None,
                ));
            }
            ExistingFilePolicy::Overwrite => {}
            ExistingFilePolicy::Backup => {
                let backup = sibling_with_suffix(destination, ".backup");
                fs::rename(destination, &backup)
                    .await
                    .map_err(|e| (OrganizerError::io("backing up existing destination", e), None))?;
                backup_path = Some(backup);
            }
        }
    }

    match relocate_file(source, destination, config.action).await {
        Ok(()) => Ok(backup_path),
        Err(e) => Err((e, backup_path)),
    }
}

async fn relocate_file(
    source: &Path,
    destination: &Path,
    action: RelocateAction,
) -> Result<(), OrganizerError> {
    match action {
        RelocateAction::Copy => {
            fs::copy(source, destination)
                .await
                .map_err(|e| OrganizerError::io("copying source to destination", e))?;
            Ok(())
        }
        RelocateAction::Rename => match fs::rename(source, destination).await {
            Ok(()) => Ok(()),
            Err(e) if e.raw_os_error() == Some(EXDEV) => {
                fs::copy(source, destination)
                    .await
                    .map_err(|e| OrganizerError::io("copying across devices", e))?;
                let file = fs::File::open(destination)
                    .await
                    .map_err(|e| OrganizerError::io("reopening destination to fsync", e))?;
                file.sync_all()
                    .await
                    .map_err(|e| OrganizerError::io("fsyncing relocated destination", e))?;
                fs::remove_file(source)
                    .await
                    .map_err(|e| OrganizerError::io("removing source after cross-device copy", e))?;
                Ok(())
            }
            Err(e) => Err(OrganizerError::io("renaming source to destination", e)),
        },
    }
}

async fn roll_back(destination: &Path, backup_path: Option<&Path>, created_dirs: &[PathBuf]) {
    let _ = fs::remove_file(destination).await;

    if let Some(backup) = backup_path {
        let _ = fs::rename(backup, destination).await;
    }

    for dir in created_dirs.iter().rev() {
        if let Ok(mut entries) = fs::read_dir(dir).await {
            if entries.next_entry().await.ok().flatten().is_none() {
                let _ = fs::remove_dir(dir).await;
            }
        }
    }
}

/// Every ancestor of `dir` (shallowest first) that does not currently
/// exist, so rollback knows exactly which directories this call created.
async fn missing_ancestors(dir: &Path) -> Vec<PathBuf> {
    let mut missing = Vec::new();
    let mut current = PathBuf::new();
    for component in dir.components() {
        current.push(component);
        if fs::metadata(&current).await.is_err() {
            missing.push(current.clone());
        }
    }
    missing
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
