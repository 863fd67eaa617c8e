use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    Adapter, AdapterSelector, ChannelAdapter, HandlerAdapter, ManagedAdapter, RouterAdapter,
    ServiceAdapter,
};

/// Immutable table of named adapters.
///
/// Built once and handed to the plugin, so tests can substitute their own
/// table.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    /// The built-in adapters: `axum`, `channel`, `handler`, `managed`, `tower`.
    pub fn builtin() -> Self {
        Self::from_adapters([
            Arc::new(RouterAdapter) as Arc<dyn Adapter>,
            Arc::new(ServiceAdapter),
            Arc::new(HandlerAdapter),
            Arc::new(ManagedAdapter),
            Arc::new(ChannelAdapter),
        ])
    }

    /// Build a table keyed by each adapter's name. Later adapters replace
    /// earlier ones with the same name.
    pub fn from_adapters(adapters: impl IntoIterator<Item = Arc<dyn Adapter>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.name().to_string(), adapter))
            .collect();
        Self { adapters }
    }

    /// Resolve a selector to an adapter.
    ///
    /// A custom adapter is returned unchanged. `None` means the name is
    /// unknown, which callers must treat as a configuration error.
    pub fn resolve(&self, selector: &AdapterSelector) -> Option<Arc<dyn Adapter>> {
        match selector {
            AdapterSelector::Custom(adapter) => {
                tracing::debug!(adapter = %adapter.name(), "Using custom request adapter");
                Some(adapter.clone())
            }
            AdapterSelector::Named(name) => {
                tracing::debug!(adapter = %name, "Using built-in request adapter");
                self.adapters.get(name).cloned()
            }
        }
    }

    /// Known adapter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.adapters.keys()).finish()
    }
}
