//! Resolved mount configuration.

use hotmount_config::{
    Compiler, DEFAULT_APP_NAME, DEFAULT_EXPORT_NAME, MountConfig, OutputFormat,
};

use crate::adapter::AdapterSelector;

/// Mount configuration for one server instance.
///
/// Unlike [`MountConfig`], the adapter may be a custom implementation
/// supplied in code rather than a registry name.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub entry: String,
    pub adapter: AdapterSelector,
    pub export_name: String,
    pub init_on_boot: bool,
    pub app_name: String,
    pub output_format: OutputFormat,
    pub compiler: Compiler,
    /// Compiler transform options, never interpreted here
    pub transform: serde_json::Value,
}

impl AdapterConfig {
    pub fn new(entry: impl Into<String>, adapter: impl Into<AdapterSelector>) -> Self {
        Self {
            entry: entry.into(),
            adapter: adapter.into(),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            init_on_boot: false,
            app_name: DEFAULT_APP_NAME.to_string(),
            output_format: OutputFormat::default(),
            compiler: Compiler::default(),
            transform: serde_json::Value::Null,
        }
    }

    pub fn with_export_name(mut self, export_name: impl Into<String>) -> Self {
        self.export_name = export_name.into();
        self
    }

    pub fn with_init_on_boot(mut self, init_on_boot: bool) -> Self {
        self.init_on_boot = init_on_boot;
        self
    }
}

impl From<MountConfig> for AdapterConfig {
    fn from(config: MountConfig) -> Self {
        Self {
            entry: config.entry,
            adapter: AdapterSelector::Named(config.adapter),
            export_name: config.export_name,
            init_on_boot: config.init_on_boot,
            app_name: config.app_name,
            output_format: config.output_format,
            compiler: config.compiler,
            transform: config.transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_file_config() {
        let config = AdapterConfig::new("src/app.rs", "axum");
        assert_eq!(config.export_name, "viteNodeApp");
        assert!(!config.init_on_boot);
        assert_eq!(config.app_name, "app");
        assert_eq!(config.output_format, OutputFormat::Cjs);
        assert_eq!(config.compiler, Compiler::Esbuild);
    }

    #[test]
    fn from_mount_config_keeps_every_field() {
        let mut mount = MountConfig::new("src/main.rs", "managed");
        mount.export_name = "app".to_string();
        mount.init_on_boot = true;
        mount.compiler = Compiler::Swc;

        let config = AdapterConfig::from(mount);
        assert_eq!(config.entry, "src/main.rs");
        assert!(matches!(&config.adapter, AdapterSelector::Named(name) if name == "managed"));
        assert_eq!(config.export_name, "app");
        assert!(config.init_on_boot);
        assert_eq!(config.compiler, Compiler::Swc);
    }
}
