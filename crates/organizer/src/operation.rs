use std::path::PathBuf;

/// Final disposition of one organize attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeStatus {
    /// Dry-run only rendered and staged directory creation in memory;
    /// nothing touched disk.
    Planned,
    Completed,
    RolledBack,
    Failed,
}

/// The result of one `organize()` call: where things ended up, whether
/// anything was backed up, and which directories were created along the
/// way (useful for callers that want to report what changed).
#[derive(Debug, Clone)]
pub struct OrganizeOperation {
    pub status: OrganizeStatus,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub created_dirs: Vec<PathBuf>,
    /// Set when `status` is `Failed` or `RolledBack`; `None` otherwise.
    pub error: Option<String>,
}
