use std::sync::atomic::{AtomicU64, Ordering};

/// Run-level counters the driver updates once per identifier (spec.md §7:
/// "a final block reports aggregate counters (requests, successes,
/// failures, bytes downloaded, operations completed)"). Thread-safe by
/// construction even though the driver itself is single-threaded across
/// identifiers, so a caller can snapshot counters from another task (e.g.
/// a progress-rendering loop) without synchronizing with the driver.
#[derive(Debug, Default)]
pub struct RunCounters {
    identifiers_total: AtomicU64,
    identifiers_succeeded: AtomicU64,
    identifiers_failed: AtomicU64,
    sidecars_written: AtomicU64,
    images_downloaded: AtomicU64,
    bytes_downloaded: AtomicU64,
    organize_completed: AtomicU64,
    organize_rolled_back: AtomicU64,
}

impl RunCounters {
    pub fn record_identifier(&self, succeeded: bool) {
        self.identifiers_total.fetch_add(1, Ordering::Relaxed);
        if succeeded {
            self.identifiers_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.identifiers_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_sidecar(&self) {
        self.sidecars_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_image(&self, bytes: u64) {
        self.images_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_organize(&self, completed: bool) {
        if completed {
            self.organize_completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.organize_rolled_back.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            identifiers_total: self.identifiers_total.load(Ordering::Relaxed),
            identifiers_succeeded: self.identifiers_succeeded.load(Ordering::Relaxed),
            identifiers_failed: self.identifiers_failed.load(Ordering::Relaxed),
            sidecars_written: self.sidecars_written.load(Ordering::Relaxed),
            images_downloaded: self.images_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
            organize_completed: self.organize_completed.load(Ordering::Relaxed),
            organize_rolled_back: self.organize_rolled_back.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of `RunCounters`, returned to callers so they never
/// hold a reference across an `.await` or read torn state across fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub identifiers_total: u64,
    pub identifiers_succeeded: u64,
    pub identifiers_failed: u64,
    pub sidecars_written: u64,
    pub images_downloaded: u64,
    pub bytes_downloaded: u64,
    pub organize_completed: u64,
    pub organize_rolled_back: u64,
}
