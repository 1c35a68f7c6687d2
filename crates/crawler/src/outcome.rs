use std::time::Duration;

use sources::{AdapterError, SourceRecord};

/// One adapter's result from a single crawl, plus its timing. Spec.md §4.3:
/// "an ordered list of per-adapter results `{adapter, record?, error?,
/// duration}`".
#[derive(Debug)]
pub struct AdapterOutcome {
    pub adapter: String,
    pub result: Result<SourceRecord, AdapterError>,
    pub duration: Duration,
    pub attempts: u32,
    pub cancelled: bool,
}

impl AdapterOutcome {
    pub fn record(&self) -> Option<&SourceRecord> {
        self.result.as_ref().ok()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// The full result of crawling one identifier across the enabled adapter
/// set, preserving adapter-registration order regardless of completion
/// order (spec.md §5).
#[derive(Debug, Default)]
pub struct CrawlResult {
    pub outcomes: Vec<AdapterOutcome>,
}

impl CrawlResult {
    pub fn successful_records(&self) -> Vec<&SourceRecord> {
        self.outcomes.iter().filter_map(|o| o.record()).collect()
    }

    pub fn all_not_found(&self) -> bool {
        !self.outcomes.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o.result, Err(AdapterError::NotFound)))
    }
}
