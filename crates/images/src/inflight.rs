use std::sync::Arc;

use dashmap::DashMap;
use url::Url;

use crate::downloader::DownloadOutcome;
use crate::error::ImageError;

type FlightResult = Result<DownloadOutcome, ImageError>;

/// Outcome of asking the registry to run a fetch: either this caller became
/// the leader and ran `fetch` to completion, or another caller already owns
/// the URL and this caller should back off immediately (spec.md §4.5 point
/// 1: "a second concurrent call for the same URL returns immediately with
/// `Skipped{reason: "already downloading"}`").
pub(crate) enum SingleFlightOutcome {
    Ran(FlightResult),
    AlreadyInFlight,
}

/// Process-wide table of URLs currently being fetched. A mutex-guarded map
/// in spirit (spec.md §5: "URL single-flight table in the downloader:
/// mutex-guarded map"); `DashMap`'s sharded locking gives the same
/// guarantee without a single global lock.
#[derive(Clone, Default)]
pub(crate) struct InFlightRegistry {
    flights: Arc<DashMap<Url, ()>>,
}

impl InFlightRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs `fetch` for `url` if no other caller currently holds it;
    /// otherwise returns `AlreadyInFlight` without waiting. The lock is
    /// held (the entry stays in the map) for the entire fetch and released
    /// on completion, success or failure.
    pub(crate) async fn single_flight<F, Fut>(&self, url: &Url, fetch: F) -> SingleFlightOutcome
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = FlightResult>,
    {
        match self.flights.entry(url.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => SingleFlightOutcome::AlreadyInFlight,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(());
                let result = fetch().await;
                self.flights.remove(url);
                SingleFlightOutcome::Ran(result)
            }
        }
    }
}
