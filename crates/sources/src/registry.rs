use std::sync::Arc;

use crate::adapter::SourceAdapter;

/// Holds adapters in registration order and hands back the enabled subset
/// without reordering, so the crawl orchestrator's registration-order
/// guarantee holds regardless of which adapters a run enables.
/// Generalizes `platforms::extractor::factory::ExtractorFactory`, which
/// instead dispatches by URL regex; adapters here are selected by name.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) -> &mut Self {
        self.adapters.push(adapter);
        self
    }

    pub fn all(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Adapters whose `id()` is in `enabled`, in registration order. An
    /// empty `enabled` set means "all registered adapters".
    pub fn enabled(&self, enabled: &[String]) -> Vec<Arc<dyn SourceAdapter>> {
        if enabled.is_empty() {
            return self.adapters.clone();
        }
        self.adapters
            .iter()
            .filter(|a| enabled.iter().any(|name| name == a.id()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::FetchContext;
    use crate::error::AdapterError;
    use crate::identifier::Identifier;
    use crate::record::{Provenance, SourceRecord};
    use async_trait::async_trait;
    use chrono::Utc;

    struct Stub(&'static str);

    #[async_trait]
    impl SourceAdapter for Stub {
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
            .build())
        }
    }

    #[test]
    fn enabled_preserves_registration_order() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(Stub("b")));
        registry.register(Arc::new(Stub("a")));
        registry.register(Arc::new(Stub("c")));

        let selected = registry.enabled(&["a".to_string(), "b".to_string()]);
        let ids: Vec<&str> = selected.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn empty_enabled_list_means_all() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(Stub("x")));
        registry.register(Arc::new(Stub("y")));
        assert_eq!(registry.enabled(&[]).len(), 2);
    }
}
