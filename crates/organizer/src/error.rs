use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("invalid destination template: {0}")]
    InvalidTemplate(#[from] templating::TemplateError),

    #[error("destination already exists and overwrite is disabled: {0}")]
    AlreadyExists(PathBuf),

    #[error("io error during {step}: {source}")]
    Io {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl OrganizerError {
    pub(crate) fn io(step: &'static str, source: std::io::Error) -> Self {
        OrganizerError::Io { step, source }
    }
}
