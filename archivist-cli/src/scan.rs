use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sources::Identifier;
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "wmv", "mov", "ts", "m2ts"];

/// A video found under the input directory paired with the identifier
/// recognized from its filename. Recognition is intentionally thin
/// (spec.md §1 treats it as an out-of-scope collaborator): a studio-code
/// prefix followed by a dash and a number, case-normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedVideo {
    pub path: PathBuf,
    pub identifier: Identifier,
}

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([A-Za-z]{2,6})[-_ ]?(\d{2,5})").unwrap());

/// Recognizes a catalog identifier from a video's file stem, e.g.
/// `ABC-123-1080p.mp4` -> `ABC-123`. Returns `None` when no plausible
/// studio-code/number pair is present.
pub fn recognize(stem: &str) -> Option<Identifier> {
    let caps = IDENTIFIER_RE.captures(stem)?;
    let studio = caps.get(1)?.as_str().to_ascii_uppercase();
    let number = caps.get(2)?.as_str();
    Identifier::new(format!("{studio}-{number}")).ok()
}

/// Walks `input_dir` for video files and recognizes an identifier from
/// each one found. Files whose identifier can't be recognized are skipped
/// (and logged by the caller), not treated as a hard error: a directory
/// sweep should not abort because one filename is unrecognizable.
pub fn scan(input_dir: &Path) -> Vec<ScannedVideo> {
    let mut videos = Vec::new();
    for entry in WalkDir::new(input_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.into_path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(identifier) = recognize(stem) {
            videos.push(ScannedVideo { path, identifier });
        }
    }
    videos.sort_by(|a, b| a.path.cmp(&b.path));
    videos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_studio_code_and_number() {
        assert_eq!(recognize("ABC-123-1080p").unwrap().as_str(), "ABC-123");
        assert_eq!(recognize("abc_0456_x264").unwrap().as_str(), "ABC-0456");
        assert_eq!(recognize("Some Movie Title").is_none(), true);
    }

    #[test]
    fn scan_finds_only_video_files_and_sorts_by_path() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ABC-123.mp4"), b"v").unwrap();
        std::fs::write(tmp.path().join("ABC-123.nfo"), b"x").unwrap();
        std::fs::write(tmp.path().join("ZZZ-001.mkv"), b"v").unwrap();
        std::fs::write(tmp.path().join("no-identifier-here.txt"), b"x").unwrap();

        let videos = scan(tmp.path());
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].identifier.as_str(), "ABC-123");
        assert_eq!(videos[1].identifier.as_str(), "ZZZ-001");
    }
}
