use std::time::Duration;

/// A state transition the orchestrator reports for one adapter's unit of
/// work. Spec.md §4.3 step 4 names exactly these four states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressState {
    Connecting,
    Retrying { attempt: u32 },
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub state: ProgressState,
    pub elapsed: Duration,
    pub remaining_of_timeout: Duration,
}

/// Callback sink for orchestrator (and, reused by the downloader,
/// per-chunk) progress events. A callback rather than a UI coupling keeps
/// this crate headless and testable; the sink must be safe to call from
/// any worker task concurrently.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, adapter: &str, event: ProgressEvent);
}

/// A sink that drops every event; the default when no caller wants progress.
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn on_event(&self, _adapter: &str, _event: ProgressEvent) {}
}
