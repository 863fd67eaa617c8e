//! In-process module host.
//!
//! Entry modules are registered as factories keyed by their path. The first
//! load of an entry evaluates its factory and caches the namespace; later
//! loads reuse it until the graph is invalidated.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;

use crate::app::ModuleNamespace;
use crate::error::ModuleError;
use crate::host::ModuleHost;

/// Produces the namespace of one entry module.
#[async_trait]
pub trait ModuleFactory: Send + Sync {
    async fn evaluate(&self) -> Result<ModuleNamespace, ModuleError>;
}

#[async_trait]
impl<F, Fut> ModuleFactory for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ModuleNamespace, ModuleError>> + Send + 'static,
{
    async fn evaluate(&self) -> Result<ModuleNamespace, ModuleError> {
        (self)().await
    }
}

/// Registry of entry module factories with a namespace cache.
#[derive(Default)]
pub struct ModuleGraph {
    factories: RwLock<HashMap<PathBuf, Arc<dyn ModuleFactory>>>,
    cache: RwLock<HashMap<PathBuf, ModuleNamespace>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async closure as the factory of `entry`.
    pub fn register<F, Fut>(&self, entry: impl AsRef<Path>, factory: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleNamespace, ModuleError>> + Send + 'static,
    {
        self.register_factory(entry, Arc::new(factory));
    }

    /// Register the factory of `entry`, replacing any previous one.
    pub fn register_factory(&self, entry: impl AsRef<Path>, factory: Arc<dyn ModuleFactory>) {
        let key = normalize(entry.as_ref());
        self.cache.write().remove(&key);
        self.factories.write().insert(key, factory);
    }

    pub fn contains(&self, entry: impl AsRef<Path>) -> bool {
        self.factories.read().contains_key(&normalize(entry.as_ref()))
    }

    /// Number of registered entry modules.
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Whether `entry` currently has a cached namespace.
    pub fn is_cached(&self, entry: impl AsRef<Path>) -> bool {
        self.cache.read().contains_key(&normalize(entry.as_ref()))
    }

    /// Drop the cached namespace of one entry.
    pub fn invalidate(&self, entry: impl AsRef<Path>) {
        self.cache.write().remove(&normalize(entry.as_ref()));
    }
}

#[async_trait]
impl ModuleHost for ModuleGraph {
    async fn load_module(&self, entry: &str) -> Result<ModuleNamespace, ModuleError> {
        let key = normalize(Path::new(entry));

        let cached = self.cache.read().get(&key).cloned();
        if let Some(namespace) = cached {
            return Ok(namespace);
        }

        let factory = self
            .factories
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| ModuleError::NotFound(entry.to_string()))?;

        tracing::debug!("Evaluating module {}", key.display());
        let namespace = factory.evaluate().await?;
        self.cache.write().insert(key, namespace.clone());
        Ok(namespace)
    }

    fn invalidate_all(&self) {
        let mut cache = self.cache.write();
        tracing::debug!("Invalidating {} cached module(s)", cache.len());
        cache.clear();
    }
}

/// Normalize an entry path so `./src/app.rs` and `src/app.rs` share a key.
fn normalize(path: &Path) -> PathBuf {
    path.clean()
}
