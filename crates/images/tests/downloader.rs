use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use images::{DownloadConfig, DownloadOutcome, ImageDownloader};
use netclient::{Client, ClientConfig};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader(server: &MockServer, config: DownloadConfig) -> ImageDownloader {
    let client = Client::new(ClientConfig::default()).unwrap();
    let _ = server;
    ImageDownloader::new(client, config)
}

#[tokio::test]
async fn downloads_image_and_records_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFFu8; 1024])
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.jpg");
    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();

    let dl = downloader(&server, DownloadConfig::default());
    let outcome = dl
        .download(&url, &dest, &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        DownloadOutcome::Downloaded { bytes, path } => {
            assert_eq!(bytes, 1024);
            assert_eq!(path, dest);
        }
        DownloadOutcome::Skipped { .. } => panic!("expected a real download"),
    }
    assert_eq!(std::fs::read(&dest).unwrap().len(), 1024);
    assert_eq!(dl.stats().downloaded(), 1);
}

#[tokio::test]
async fn skips_existing_destination_by_default() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.jpg");
    std::fs::write(&dest, b"already here").unwrap();

    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();
    let dl = downloader(&server, DownloadConfig::default());
    let outcome = dl
        .download(&url, &dest, &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, DownloadOutcome::Skipped { .. }));
    assert_eq!(dl.stats().skipped(), 1);
}

#[tokio::test]
async fn rejects_disallowed_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.html");
    let url = Url::parse(&format!("{}/cover.html", server.uri())).unwrap();

    let dl = downloader(&server, DownloadConfig::default());
    let err = dl
        .download(&url, &dest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, images::ImageError::DisallowedContentType { .. }));
    assert!(!dest.exists());
}

#[tokio::test]
async fn rejects_response_over_size_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 4096])
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.jpg");
    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();

    let mut config = DownloadConfig::default();
    config.max_bytes = Some(1024);
    config.retry.max_retries = 0;

    let dl = downloader(&server, config);
    let err = dl
        .download(&url, &dest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, images::ImageError::TooLarge { .. }));
}

#[tokio::test]
async fn resumes_a_partial_download_with_a_range_request() {
    let server = MockServer::start().await;
    let prefix = vec![1u8; 512];
    let rest = vec![2u8; 1536];

    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .and(header("Range", "bytes=512-"))
        .respond_with(
            ResponseTemplate::new(206)
                .set_body_bytes(rest.clone())
                .insert_header("content-type", "image/jpeg")
                .insert_header("content-range", "bytes 512-2047/2048"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.jpg");
    let tmp_file = tmp.path().join("cover.jpg.downloading");
    std::fs::write(&tmp_file, &prefix).unwrap();

    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();
    let dl = downloader(&server, DownloadConfig::default());
    let outcome = dl
        .download(&url, &dest, &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        DownloadOutcome::Downloaded { bytes, .. } => assert_eq!(bytes, 2048),
        DownloadOutcome::Skipped { .. } => panic!("expected a real download"),
    }
    assert!(!tmp_file.exists());
    let full = std::fs::read(&dest).unwrap();
    assert_eq!(full.len(), 2048);
    assert_eq!(&full[..512], prefix.as_slice());
    assert_eq!(&full[512..], rest.as_slice());
}

#[tokio::test]
async fn concurrent_requests_for_the_same_url_deduplicate() {
    let server = MockServer::start().await;
    // A slow responder widens the window in which the second caller must
    // observe the first as already in flight.
    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![7u8; 256])
                .insert_header("content-type", "image/jpeg")
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest: PathBuf = tmp.path().join("cover.jpg");
    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();
    let dl = downloader(&server, DownloadConfig::default());

    let token = CancellationToken::new();
    let download_a = dl.download(&url, &dest, &token);
    tokio::pin!(download_a);
    // Give the leader a chance to register itself in the single-flight
    // table before the follower fires.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let (a, b) = tokio::join!(download_a, dl.download(&url, &dest, &token));

    let a = a.unwrap();
    let b = b.unwrap();
    assert!(matches!(a, DownloadOutcome::Downloaded { bytes: 256, .. }));
    assert!(matches!(
        b,
        DownloadOutcome::Skipped {
            reason: images::SkipReason::AlreadyDownloading,
            ..
        }
    ));
    assert_eq!(std::fs::read(&dest).unwrap().len(), 256);
    // `server`'s `Drop` impl checks the `.expect(1)` above: exactly one GET
    // reached the fake server for the shared URL.
}

#[tokio::test]
async fn chunk_progress_callback_reports_final_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![9u8; 2048])
                .insert_header("content-type", "image/jpeg")
                .insert_header("content-length", "2048"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("cover.jpg");
    let url = Url::parse(&format!("{}/cover.jpg", server.uri())).unwrap();
    let dl = downloader(&server, DownloadConfig::default());

    let seen: Arc<Mutex<Vec<(u64, Option<u64>)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = seen.clone();
    let callback: images::ChunkProgress = Arc::new(move |downloaded, total, _dst| {
        seen_cb.lock().unwrap().push((downloaded, total));
    });

    let outcome = dl
        .download_with_progress(&url, &dest, &CancellationToken::new(), Some(callback))
        .await
        .unwrap();

    assert!(matches!(outcome, DownloadOutcome::Downloaded { bytes: 2048, .. }));
    let events = seen.lock().unwrap();
    assert!(!events.is_empty());
    let (last_downloaded, last_total) = *events.last().unwrap();
    assert_eq!(last_downloaded, 2048);
    assert_eq!(last_total, Some(2048));
}
