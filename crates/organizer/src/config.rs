use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelocateAction {
    Rename,
    Copy,
}

/// What to do when the rendered destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExistingFilePolicy {
    Skip,
    Overwrite,
    Backup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    pub folder_pattern: String,
    pub basename_pattern: String,
    pub action: RelocateAction,
    pub existing: ExistingFilePolicy,
    pub dry_run: bool,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            folder_pattern: "{performers}".into(),
            basename_pattern: "{identifier} - {title}".into(),
            action: RelocateAction::Rename,
            existing: ExistingFilePolicy::Backup,
            dry_run: false,
        }
    }
}
