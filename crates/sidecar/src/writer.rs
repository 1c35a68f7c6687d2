use std::path::Path;

use crate::error::SidecarError;

/// Writes `contents` to `path` atomically: stage to a sibling temp file,
/// preserve any existing sidecar as `<path>.backup`, then rename into
/// place. A crash or interrupted write leaves either the old sidecar or
/// the backup intact, never a truncated one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), SidecarError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let tmp_path = sibling_with_suffix(path, ".tmp");
    std::fs::write(&tmp_path, contents)?;

    if path.exists() {
        let backup_path = sibling_with_suffix(path, ".backup");
        std::fs::copy(path, &backup_path)?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.nfo");

        write_atomic(&path, b"<movie/>").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<movie/>");
        assert!(!sibling_with_suffix(&path, ".backup").exists());
    }

    #[test]
    fn backs_up_existing_file_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.nfo");
        fs::write(&path, b"<movie>old</movie>").unwrap();

        write_atomic(&path, b"<movie>new</movie>").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<movie>new</movie>");
        let backup = sibling_with_suffix(&path, ".backup");
        assert_eq!(fs::read(&backup).unwrap(), b"<movie>old</movie>");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("movie.nfo");

        write_atomic(&path, b"<movie/>").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<movie/>");
    }

    #[test]
    fn leaves_no_tmp_file_behind_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.nfo");

        write_atomic(&path, b"<movie/>").unwrap();

        assert!(!sibling_with_suffix(&path, ".tmp").exists());
    }
}
