use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe run-level counters for a batch of image downloads
/// (spec.md §4.5: "total, successful, failed, skipped, bytes downloaded,
/// cumulative duration, derived average speed").
#[derive(Debug, Default)]
pub struct DownloadStats {
    total: AtomicU64,
    downloaded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes_total: AtomicU64,
    duration_micros: AtomicU64,
}

impl DownloadStats {
    /// Records a completed download: `elapsed` is the time spent actually
    /// fetching (including retries), not any single-flight wait.
    pub fn record_downloaded(&self, bytes: u64, elapsed: Duration) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_total.fetch_add(bytes, Ordering::Relaxed);
        self.duration_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Records a skip, whether from skip-existing or single-flight
    /// collision; no work was done, so no duration is accumulated.
    pub fn record_skipped(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an exhausted-retry failure and the time spent attempting it.
    pub fn record_failed(&self, elapsed: Duration) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.duration_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn bytes_total(&self) -> u64 {
        self.bytes_total.load(Ordering::Relaxed)
    }

    pub fn cumulative_duration(&self) -> Duration {
        Duration::from_micros(self.duration_micros.load(Ordering::Relaxed))
    }

    /// Average throughput in bytes/sec across every attempt that spent any
    /// time fetching (downloaded or failed). `0.0` once no time has been
    /// spent yet, rather than dividing by zero.
    pub fn average_speed_bytes_per_sec(&self) -> f64 {
        let secs = self.cumulative_duration().as_secs_f64();
        if secs <= 0.0 {
            0.0
        } else {
            self.bytes_total() as f64 / secs
        }
    }
}
