use async_trait::async_trait;
use netclient::{CancellationToken, Client};

use crate::error::AdapterError;
use crate::identifier::Identifier;
use crate::record::SourceRecord;

/// Shared state handed to every adapter call: the pooled HTTP client and a
/// token the orchestrator cancels on timeout or shutdown. Generalizes the
/// `client`/`cookies` fields `platforms::extractor::Extractor` bundles per
/// extractor instance into something adapters borrow per-call instead of
/// owning, since one adapter instance here serves every identifier in a run.
pub struct FetchContext {
    pub client: Client,
    pub cancellation: CancellationToken,
}

impl FetchContext {
    pub fn new(client: Client, cancellation: CancellationToken) -> Self {
        Self {
            client,
            cancellation,
        }
    }
}

/// A pluggable source of metadata for one identifier. Implementations must
/// be `Send + Sync`: the orchestrator calls `fetch` for many identifiers
/// concurrently, potentially from several tasks against the same adapter
/// instance.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable, unique name used in config (`enabled_adapters`) and in
    /// `Provenance::adapter`.
    fn id(&self) -> &str;

    async fn fetch(
        &self,
        ctx: &FetchContext,
        identifier: &Identifier,
    ) -> Result<SourceRecord, AdapterError>;
}
