use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use crawler::{noop_sink, orchestrate, CrawlConfig};
use netclient::{CancellationToken, Client, ClientConfig, NetError, RetryConfig};
use sources::{AdapterError, FetchContext, Identifier, Provenance, SourceAdapter, SourceRecord};

struct AlwaysOk(&'static str);

#[async_trait]
impl SourceAdapter for AlwaysOk {
    fn id(&self) -> &str {
        self.0
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        Ok(SourceRecord::builder(
            identifier.as_str(),
            Provenance {
                adapter: self.0.to_string(),
                source_url: "https://example.test".into(),
                fetched_at: Utc::now(),
            },
        )
        .title(format!("title from {}", self.0))
        .build())
    }
}

struct AlwaysNotFound(&'static str);

#[async_trait]
impl SourceAdapter for AlwaysNotFound {
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

/// Fails with a retryable error the first `fail_times` calls, then succeeds.
struct FlakyThenOk {
    name: &'static str,
    fail_times: u32,
    calls: AtomicU32,
}

#[async_trait]
impl SourceAdapter for FlakyThenOk {
    fn id(&self) -> &str {
        self.name
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_times {
            return Err(AdapterError::Net(NetError::Http {
                status: 503,
                url: "https://example.test".into(),
                retry_after_secs: None,
            }));
        }
        Ok(SourceRecord::builder(
            identifier.as_str(),
            Provenance {
                adapter: self.name.to_string(),
                source_url: "https://example.test".into(),
                fetched_at: Utc::now(),
            },
        )
        .build())
    }
}

/// Always fails with a parsing error, counting its calls.
struct AlwaysParseFailure {
    name: &'static str,
    calls: AtomicU32,
}

#[async_trait]
impl SourceAdapter for AlwaysParseFailure {
    fn id(&self) -> &str {
        self.name
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdapterError::Parsing("missing title".into()))
    }
}

fn fast_crawl_config() -> CrawlConfig {
    CrawlConfig {
        per_adapter_timeout: Duration::from_secs(5),
        retry: RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            factor: 2.0,
            max_delay: Duration::from_millis(10),
            jitter: 0.0,
        },
    }
}

fn ctx_factory() -> impl Fn() -> FetchContext {
    let client = Client::new(ClientConfig::default()).unwrap();
    move || FetchContext::new(client.clone(), CancellationToken::new())
}

#[tokio::test]
async fn preserves_registration_order_regardless_of_completion_order() {
    let id = Identifier::new("ABC-123").unwrap();
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(AlwaysOk("b")),
        Arc::new(AlwaysOk("a")),
        Arc::new(AlwaysOk("c")),
    ];

    let result = orchestrate(
        &id,
        &adapters,
        ctx_factory(),
        fast_crawl_config(),
        noop_sink(),
        CancellationToken::new(),
    )
    .await;

    let names: Vec<&str> = result.outcomes.iter().map(|o| o.adapter.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
    assert!(result.outcomes.iter().all(|o| o.is_success()));
}

#[tokio::test]
async fn all_not_found_yields_empty_success_set() {
    let id = Identifier::new("XYZ-999").unwrap();
    let adapters: Vec<Arc<dyn SourceAdapter>> =
        vec![Arc::new(AlwaysNotFound("a")), Arc::new(AlwaysNotFound("b"))];

    let result = orchestrate(
        &id,
        &adapters,
        ctx_factory(),
        fast_crawl_config(),
        noop_sink(),
        CancellationToken::new(),
    )
    .await;

    assert!(result.all_not_found());
    assert!(result.successful_records().is_empty());
}

#[tokio::test]
async fn retries_up_to_budget_then_succeeds() {
    let id = Identifier::new("RTY-001").unwrap();
    let flaky = Arc::new(FlakyThenOk {
        name: "flaky",
        fail_times: 2,
        calls: AtomicU32::new(0),
    });
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![flaky.clone()];

    let result = orchestrate(
        &id,
        &adapters,
        ctx_factory(),
        fast_crawl_config(),
        noop_sink(),
        CancellationToken::new(),
    )
    .await;

    assert_eq!(result.outcomes.len(), 1);
    assert!(result.outcomes[0].is_success());
    assert_eq!(result.outcomes[0].attempts, 3);
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn cancellation_marks_outcomes_cancelled() {
    let id = Identifier::new("CNC-001").unwrap();
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(FlakyThenOk {
        name: "never",
        fail_times: u32::MAX,
        calls: AtomicU32::new(0),
    })];

    let token = CancellationToken::new();
    token.cancel();

    let result = orchestrate(
        &id,
        &adapters,
        ctx_factory(),
        fast_crawl_config(),
        noop_sink(),
        token,
    )
    .await;

    assert!(result.outcomes[0].cancelled);
    assert!(matches!(
        result.outcomes[0].result,
        Err(AdapterError::Cancelled)
    ));
}

#[tokio::test]
async fn parsing_failures_retry_exactly_once_regardless_of_budget() {
    let id = Identifier::new("PRS-001").unwrap();
    let flaky = Arc::new(AlwaysParseFailure {
        name: "flaky-parser",
        calls: AtomicU32::new(0),
    });
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![flaky.clone()];

    // max_retries=3 in the config, but a Parsing error should only ever
    // be retried once (spec.md §7), so exactly 2 calls should happen.
    let result = orchestrate(
        &id,
        &adapters,
        ctx_factory(),
        fast_crawl_config(),
        noop_sink(),
        CancellationToken::new(),
    )
    .await;

    assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    assert!(result.outcomes[0].result.is_err());
    assert!(matches!(
        result.outcomes[0].result,
        Err(AdapterError::Parsing(_))
    ));
}
