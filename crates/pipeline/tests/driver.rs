use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use netclient::ClientConfig;
use pipeline::{IdentifierOutcome, PipelineConfig, PipelineDriver};
use sources::{AdapterError, AdapterRegistry, FetchContext, Identifier, Provenance, SourceAdapter, SourceRecord};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FakeAdapter {
    name: &'static str,
    record: SourceRecord,
}

#[async_trait]
impl SourceAdapter for FakeAdapter {
    fn id(&self) -> &str {
        self.name
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        Ok(self.record.clone())
    }
}

struct NotFoundAdapter(&'static str);

#[async_trait]
impl SourceAdapter for NotFoundAdapter {
    fn id(&self) -> &str {
        self.0
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        Err(AdapterError::NotFound)
    }
}

fn provenance(adapter: &str) -> Provenance {
    Provenance {
        adapter: adapter.to_string(),
        source_url: "https://example.test".into(),
        fetched_at: Utc::now(),
    }
}

/// Spec.md §8 scenario 1 ("Happy path"): two adapters return partial
/// records for the same identifier; the merged record picks the longer
/// title and the union of performers, and both images land on disk.
#[tokio::test]
async fn happy_path_merges_crawls_and_downloads_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 64]).insert_header("content-type", "image/jpeg"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![2u8; 64]).insert_header("content-type", "image/jpeg"))
        .mount(&server)
        .await;

    let record_a = SourceRecord::builder("ABC-123", provenance("a"))
        .title("T1")
        .performers(vec!["P1".into()])
        .cover_url(format!("{}/a.jpg", server.uri()))
        .build();
    let record_b = SourceRecord::builder("ABC-123", provenance("b"))
        .title("T1 detailed")
        .performers(vec!["P2".into()])
        .fanart_url(format!("{}/b.jpg", server.uri()))
        .build();

    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { name: "a", record: record_a }));
    registry.register(Arc::new(FakeAdapter { name: "b", record: record_b }));

    let tmp = tempfile::tempdir().unwrap();
    let video_dir = tmp.path().join("ABC-123");
    std::fs::create_dir_all(&video_dir).unwrap();
    let video_path = video_dir.join("ABC-123.mp4");
    std::fs::write(&video_path, b"not really a video").unwrap();

    let config = PipelineConfig {
        net: ClientConfig::default(),
        ..Default::default()
    };
    let driver = PipelineDriver::new(registry, config).unwrap();

    let identifier = Identifier::new("ABC-123").unwrap();
    let outcome = driver
        .process_identifier(&identifier, &video_path, &CancellationToken::new())
        .await;

    match outcome {
        IdentifierOutcome::Success {
            record,
            sidecar_path,
            downloads,
            organize,
            ..
        } => {
            assert_eq!(record.title.as_deref(), Some("T1 detailed"));
            assert_eq!(record.performers, vec!["P1".to_string(), "P2".to_string()]);
            assert_eq!(record.cover_url.as_deref(), Some(format!("{}/a.jpg", server.uri())).as_deref());
            assert_eq!(record.fanart_url.as_deref(), Some(format!("{}/b.jpg", server.uri())).as_deref());
            assert!(organize.is_none(), "organize is disabled by default");

            let sidecar_path = sidecar_path.expect("sidecar should have been written");
            assert!(sidecar_path.exists());
            assert_eq!(sidecar_path, video_path.with_extension("nfo"));

            assert_eq!(downloads.len(), 2);
            assert!(downloads
                .iter()
                .all(|(_, r)| matches!(r, Ok(images::DownloadOutcome::Downloaded { .. }))));
            assert!(video_dir.join("cover.jpg").exists());
            assert!(video_dir.join("fanart.jpg").exists());
        }
        IdentifierOutcome::Failed { reason, .. } => panic!("expected success, got {reason}"),
    }

    let snapshot = driver.counters();
    assert_eq!(snapshot.identifiers_succeeded, 1);
    assert_eq!(snapshot.identifiers_failed, 0);
    assert_eq!(snapshot.images_downloaded, 2);
    assert_eq!(snapshot.sidecars_written, 1);
}

/// Spec.md §8 scenario 2 ("All NotFound"): no sidecar, no downloads, no
/// move; the identifier is recorded as failed.
#[tokio::test]
async fn all_not_found_produces_no_artifacts() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(NotFoundAdapter("a")));
    registry.register(Arc::new(NotFoundAdapter("b")));

    let tmp = tempfile::tempdir().unwrap();
    let video_path = tmp.path().join("XYZ-999.mp4");
    std::fs::write(&video_path, b"not really a video").unwrap();

    let driver = PipelineDriver::new(registry, PipelineConfig::default()).unwrap();
    let identifier = Identifier::new("XYZ-999").unwrap();
    let outcome = driver
        .process_identifier(&identifier, &video_path, &CancellationToken::new())
        .await;

    assert!(!outcome.is_success());
    assert!(!video_path.with_extension("nfo").exists());

    let snapshot = driver.counters();
    assert_eq!(snapshot.identifiers_failed, 1);
    assert_eq!(snapshot.identifiers_succeeded, 0);
    assert_eq!(snapshot.sidecars_written, 0);
}

/// Relocation, when enabled, moves the source video under the rendered
/// destination and the driver's counters reflect a completed organize.
#[tokio::test]
async fn relocation_moves_source_when_enabled() {
    let record = SourceRecord::builder("ABC-123", provenance("a"))
        .title("A Title")
        .build();
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(FakeAdapter { name: "a", record }));

    let tmp = tempfile::tempdir().unwrap();
    let video_path = tmp.path().join("incoming").join("ABC-123.mp4");
    std::fs::create_dir_all(video_path.parent().unwrap()).unwrap();
    std::fs::write(&video_path, b"not really a video").unwrap();

    let mut config = PipelineConfig::default();
    config.organize_enabled = true;
    config.organize.folder_pattern = String::new();
    config.organize.basename_pattern = "{identifier}".into();
    config.output_dir = PathBuf::from(tmp.path()).join("library");

    let driver = PipelineDriver::new(registry, config).unwrap();
    let identifier = Identifier::new("ABC-123").unwrap();
    let outcome = driver
        .process_identifier(&identifier, &video_path, &CancellationToken::new())
        .await;

    match outcome {
        IdentifierOutcome::Success { organize, .. } => {
            let op = organize.expect("organize should have run");
            assert_eq!(op.status, organizer::OrganizeStatus::Completed);
            assert!(op.destination.exists());
            assert!(!video_path.exists());
        }
        IdentifierOutcome::Failed { reason, .. } => panic!("expected success, got {reason}"),
    }

    assert_eq!(driver.counters().organize_completed, 1);
}
