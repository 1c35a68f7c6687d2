//! Per-identifier crawl orchestrator: fans out across every enabled source
//! adapter with per-adapter timeout, retry, cancellation, and progress
//! reporting, then waits for all of them — never short-circuiting on first
//! success, since merge quality improves with multiple agreeing sources.

pub mod config;
pub mod orchestrator;
pub mod outcome;
pub mod progress;

pub use config::CrawlConfig;
pub use orchestrator::{noop_sink, orchestrate};
pub use outcome::{AdapterOutcome, CrawlResult};
pub use progress::{NoopProgressSink, ProgressEvent, ProgressSink, ProgressState};
