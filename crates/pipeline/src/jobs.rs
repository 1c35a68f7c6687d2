use std::path::{Path, PathBuf};

use images::DownloadRequest;
use merge::MergedRecord;
use url::Url;

/// Builds the cover/fanart/preview `DownloadRequest`s for one identifier,
/// per spec.md §6: files land adjacent to `base_dir` as `cover.<ext>` and
/// `fanart.<ext>`, with up to `max_previews` (capped at 10, per the
/// `fanart1.<ext>` ... `fanart10.<ext>` naming spec.md fixes) under an
/// `extrafanart/` subdirectory. Extensions come from the URL path; `.jpg`
/// is the fallback when the path carries none.
pub fn build_requests(record: &MergedRecord, base_dir: &Path, max_previews: usize) -> Vec<DownloadRequest> {
    let mut requests = Vec::new();

    if let Some(url) = parse(record.cover_url.as_deref()) {
        let dest = base_dir.join(format!("cover.{}", extension_of(&url)));
        requests.push(DownloadRequest { url, dest });
    }

    if let Some(url) = parse(record.fanart_url.as_deref()) {
        let dest = base_dir.join(format!("fanart.{}", extension_of(&url)));
        requests.push(DownloadRequest { url, dest });
    }

    let cap = max_previews.min(10);
    let extrafanart = base_dir.join("extrafanart");
    for (i, raw) in record.preview_urls.iter().take(cap).enumerate() {
        if let Some(url) = parse(Some(raw)) {
            let dest = extrafanart.join(format!("fanart{}.{}", i + 1, extension_of(&url)));
            requests.push(DownloadRequest { url, dest });
        }
    }

    requests
}

fn parse(raw: Option<&str>) -> Option<Url> {
    raw.and_then(|s| Url::parse(s).ok())
}

/// Extension from the URL path, falling back to `.jpg` when the path
/// carries none or the extension doesn't plausibly name an image type
/// (`mime_guess` checked against its own `image/*` guess).
fn extension_of(url: &Url) -> String {
    let candidate = Path::new(url.path())
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase);

    match candidate {
        Some(ext) if mime_guess::from_ext(&ext).first_raw().is_some_and(|m| m.starts_with("image/")) => ext,
        _ => "jpg".to_string(),
    }
}

/// Path the sidecar is written to, adjacent to `source_video` (spec.md
/// §4.8 step 4), sharing its stem but with the sidecar's own extension.
pub fn sidecar_path(source_video: &Path) -> PathBuf {
    source_video.with_extension("nfo")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MergedRecord {
        MergedRecord {
            identifier: "ABC-123".into(),
            cover_url: Some("https://img.example/a/cover.png".into()),
            fanart_url: Some("https://img.example/b/fanart".into()),
            preview_urls: (1..=12)
                .map(|i| format!("https://img.example/p{i}.jpg"))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_cover_fanart_and_capped_previews() {
        let requests = build_requests(&record(), Path::new("/videos/ABC-123"), 10);
        assert_eq!(requests[0].dest, PathBuf::from("/videos/ABC-123/cover.png"));
        assert_eq!(requests[1].dest, PathBuf::from("/videos/ABC-123/fanart.jpg"));
        assert_eq!(requests.len(), 2 + 10);
        assert_eq!(
            requests[2].dest,
            PathBuf::from("/videos/ABC-123/extrafanart/fanart1.jpg")
        );
        assert_eq!(
            requests.last().unwrap().dest,
            PathBuf::from("/videos/ABC-123/extrafanart/fanart10.jpg")
        );
    }

    #[test]
    fn sidecar_path_swaps_extension() {
        assert_eq!(
            sidecar_path(Path::new("/videos/ABC-123/ABC-123.mp4")),
            PathBuf::from("/videos/ABC-123/ABC-123.nfo")
        );
    }
}
