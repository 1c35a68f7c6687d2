pub mod config;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod writer;

use std::path::Path;

pub use config::SidecarConfig;
pub use dialect::{Dialect, RatingScale};
pub use error::SidecarError;
use merge::MergedRecord;

/// Generates and atomically writes a sidecar for `record` at `path`.
pub fn write_sidecar(
    record: &MergedRecord,
    config: &SidecarConfig,
    path: &Path,
) -> Result<(), SidecarError> {
    let xml = generator::generate(record, config)?;
    writer::write_atomic(path, &xml)
}
