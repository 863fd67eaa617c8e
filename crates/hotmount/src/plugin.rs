//! Resolves mount configuration into the request bridge and boot hook.

use std::sync::Arc;

use hotmount_config::{Compiler, OutputFormat};
use serde::Serialize;

use crate::adapter::AdapterRegistry;
use crate::boot::BootInitializer;
use crate::bridge::RequestBridge;
use crate::config::AdapterConfig;
use crate::error::SetupError;
use crate::host::{DevHost, ModuleHost};
use crate::loader::ApplicationLoader;

/// Build settings derived from the mount configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSettings {
    /// Entry of the server bundle
    pub ssr_entry: String,
    pub output_format: OutputFormat,
    pub app_name: String,
    /// The default transform is turned off when another compiler takes over
    pub disable_default_transform: bool,
}

/// Pieces produced by a successful setup.
pub struct Mounted {
    pub bridge: Arc<RequestBridge>,
    /// Present only when `init_on_boot` is set
    pub boot: Option<BootInitializer>,
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("bridge", &self.bridge)
            .field("boot", &self.boot)
            .finish()
    }
}

/// Mounts one application into a dev server.
#[derive(Debug, Clone)]
pub struct MountPlugin {
    config: AdapterConfig,
    registry: AdapterRegistry,
}

impl MountPlugin {
    /// Create a plugin using the built-in adapters.
    pub fn new(config: AdapterConfig) -> Self {
        Self::with_registry(config, AdapterRegistry::builtin())
    }

    pub fn with_registry(config: AdapterConfig, registry: AdapterRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Resolve the adapter and build the request bridge.
    ///
    /// Fails before any request is served if the adapter is unknown.
    pub fn setup(
        &self,
        modules: Arc<dyn ModuleHost>,
        server: Arc<dyn DevHost>,
    ) -> Result<Mounted, SetupError> {
        let Some(adapter) = self.registry.resolve(&self.config.adapter) else {
            let error = SetupError::UnknownAdapter {
                adapter: self.config.adapter.to_string(),
                known: self.registry.names().join(", "),
            };
            tracing::error!(%error, "Failed to set up request adapter");
            return Err(error);
        };

        let loader = ApplicationLoader::from_config(modules, &self.config);
        let boot = self
            .config
            .init_on_boot
            .then(|| BootInitializer::new(loader.clone(), adapter.clone()));
        let bridge = Arc::new(RequestBridge::new(loader, adapter, server));

        Ok(Mounted { bridge, boot })
    }

    pub fn build_settings(&self) -> BuildSettings {
        BuildSettings {
            ssr_entry: self.config.entry.clone(),
            output_format: self.config.output_format,
            app_name: self.config.app_name.clone(),
            disable_default_transform: self.config.compiler == Compiler::Swc,
        }
    }
}
