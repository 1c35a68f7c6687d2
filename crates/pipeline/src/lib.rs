//! Pipeline driver: sequences the crawl, merge, sidecar, image-download
//! and organize steps for each identified video, plus the run-level
//! config aggregate and counters spec.md §4.8 assigns to it.

pub mod config;
pub mod counters;
pub mod driver;
pub mod jobs;
pub mod outcome;

pub use config::PipelineConfig;
pub use counters::{CounterSnapshot, RunCounters};
pub use driver::PipelineDriver;
pub use outcome::{FailureReason, IdentifierOutcome};
