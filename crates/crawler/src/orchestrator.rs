use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use netclient::retry::delay_for_attempt;
use netclient::CancellationToken;
use sources::{AdapterError, FetchContext, Identifier, SourceAdapter, SourceRecord};
use tracing::debug;

use crate::config::CrawlConfig;
use crate::outcome::{AdapterOutcome, CrawlResult};
use crate::progress::{NoopProgressSink, ProgressEvent, ProgressSink, ProgressState};

/// Fans out across every enabled adapter for one identifier, each bounded
/// by `config.per_adapter_timeout` and retried per `config.retry`. Mirrors
/// `pipeline_common::run_completion::settle_run`'s JoinHandle bookkeeping:
/// spawn one task per unit, index results by registration order rather
/// than completion order, then await everything.
///
/// Never returns an orchestration-level error: per spec.md §4.3 step 6,
/// per-adapter failures are data carried in the returned `CrawlResult`,
/// not propagated. The only way a caller learns about cancellation is via
/// `AdapterOutcome::result == Err(AdapterError::Cancelled)`.
pub async fn orchestrate(
    identifier: &Identifier,
    adapters: &[Arc<dyn SourceAdapter>],
    fetch_ctx_template: impl Fn() -> FetchContext,
    config: CrawlConfig,
    progress: Arc<dyn ProgressSink>,
    cancellation: CancellationToken,
) -> CrawlResult {
    let mut handles = Vec::with_capacity(adapters.len());

    for adapter in adapters {
        let adapter = adapter.clone();
        let identifier = identifier.clone();
        let ctx = fetch_ctx_template();
        let config = config;
        let progress = progress.clone();
        let cancellation = cancellation.clone();
        let name = adapter.id().to_string();

        handles.push(tokio::spawn(async move {
            run_one(adapter, name, ctx, identifier, config, progress, cancellation).await
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (idx, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                debug!(?join_err, idx, "adapter task panicked or was aborted");
                AdapterOutcome {
                    adapter: format!("adapter_{idx}"),
                    result: Err(AdapterError::Unknown(format!(
                        "adapter task did not complete: {join_err}"
                    ))),
                    duration: Duration::ZERO,
                    attempts: 0,
                    cancelled: join_err.is_cancelled(),
                }
            }
        };
        outcomes.push(outcome);
    }

    CrawlResult { outcomes }
}

/// Convenience wrapper for the common case of one enabled adapter set and
/// a default `NoopProgressSink`.
pub fn noop_sink() -> Arc<dyn ProgressSink> {
    Arc::new(NoopProgressSink)
}

async fn run_one(
    adapter: Arc<dyn SourceAdapter>,
    name: String,
    ctx: FetchContext,
    identifier: Identifier,
    config: CrawlConfig,
    progress: Arc<dyn ProgressSink>,
    cancellation: CancellationToken,
) -> AdapterOutcome {
    let start = Instant::now();
    let attempts = Arc::new(AtomicU32::new(0));

    progress.on_event(
        &name,
        ProgressEvent {
            state: ProgressState::Connecting,
            elapsed: Duration::ZERO,
            remaining_of_timeout: config.per_adapter_timeout,
        },
    );

    let budget = config.per_adapter_timeout;
    let result = tokio::time::timeout(
        budget,
        retry_loop(
            &*adapter,
            &name,
            &ctx,
            &identifier,
            config,
            &progress,
            &attempts,
            &cancellation,
            start,
        ),
    )
    .await;

    let (result, cancelled) = match result {
        Ok(result) => {
            let cancelled = matches!(result, Err(AdapterError::Cancelled));
            (result, cancelled)
        }
        Err(_) => (
            Err(AdapterError::Net(netclient::NetError::Timeout {
                url: identifier.as_str().to_string(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            })),
            false,
        ),
    };

    progress.on_event(
        &name,
        ProgressEvent {
            state: if result.is_ok() {
                ProgressState::Success
            } else {
                ProgressState::Failed
            },
            elapsed: start.elapsed(),
            remaining_of_timeout: budget.saturating_sub(start.elapsed()),
        },
    );

    AdapterOutcome {
        adapter: name,
        result,
        duration: start.elapsed(),
        attempts: attempts.load(Ordering::SeqCst),
        cancelled,
    }
}

#[allow(clippy::too_many_arguments)]
async fn retry_loop(
    adapter: &dyn SourceAdapter,
    name: &str,
    ctx: &FetchContext,
    identifier: &Identifier,
    config: CrawlConfig,
    progress: &Arc<dyn ProgressSink>,
    attempts: &AtomicU32,
    cancellation: &CancellationToken,
    started_at: Instant,
) -> Result<SourceRecord, AdapterError> {
    let mut last_err: Option<AdapterError> = None;

    for attempt in 0..=config.retry.max_retries {
        if cancellation.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }
        attempts.fetch_add(1, Ordering::SeqCst);

        match adapter.fetch(ctx, identifier).await {
            Ok(record) => return Ok(record),
            Err(e) if e.is_retryable() && attempt < e.retry_limit(config.retry.max_retries) => {
                progress.on_event(
                    name,
                    ProgressEvent {
                        state: ProgressState::Retrying {
                            attempt: attempt + 1,
                        },
                        elapsed: started_at.elapsed(),
                        remaining_of_timeout: config
                            .per_adapter_timeout
                            .saturating_sub(started_at.elapsed()),
                    },
                );
                let delay = delay_for_attempt(&config.retry, attempt);
                tokio::select! {
                    _ = cancellation.cancelled() => return Err(AdapterError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or(AdapterError::Unknown(
        "retry loop exited without an error".into(),
    )))
}
