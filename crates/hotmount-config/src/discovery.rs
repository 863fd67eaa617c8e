//! File-based config discovery for CLI use
//!
//! Finds the hotmount configuration of a project and layers environment
//! overrides on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::config::HotmountConfig;
use crate::error::{ConfigError, Result};

/// Prefix of environment variables that override file settings.
///
/// Nested keys use a double underscore: `HOTMOUNT_DEV__PORT=4000`.
pub const ENV_PREFIX: &str = "HOTMOUNT_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use hotmount_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory searched for configuration.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. hotmount.toml
    /// 2. Cargo.toml with a `[package.metadata.hotmount]` table
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("hotmount.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let manifest = self.root.join("Cargo.toml");
        if manifest.exists() && cargo_metadata_table(&manifest).ok().flatten().is_some() {
            return Some(manifest);
        }

        None
    }

    /// Build the layered provider: discovered file, then environment.
    ///
    /// Callers may merge further providers (e.g. CLI flags) before extracting.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn figment(&self) -> Result<Figment> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.figment_from(&path)
    }

    /// Build the layered provider from a specific file.
    pub fn figment_from(&self, path: &Path) -> Result<Figment> {
        let file = if path.file_name() == Some(std::ffi::OsStr::new("Cargo.toml")) {
            let table = cargo_metadata_table(path)?.ok_or_else(|| ConfigError::InvalidValue {
                field: "package.metadata.hotmount".to_string(),
                hint: Some(format!(
                    "Add a [package.metadata.hotmount] table to {}",
                    path.display()
                )),
            })?;
            Figment::from(Serialized::defaults(table))
        } else {
            if !path.exists() {
                return Err(ConfigError::NotFound);
            }
            Figment::from(Toml::file(path))
        };

        tracing::debug!("Loading hotmount config from {}", path.display());
        Ok(file.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load config from the discovered file.
    pub fn load(&self) -> Result<HotmountConfig> {
        extract(&self.figment()?)
    }

    /// Load config from a specific file path.
    pub fn load_from(&self, path: &Path) -> Result<HotmountConfig> {
        extract(&self.figment_from(path)?)
    }
}

/// Extract a [`HotmountConfig`] from a prepared provider.
pub fn extract(figment: &Figment) -> Result<HotmountConfig> {
    Ok(figment.extract::<HotmountConfig>()?)
}

/// Discover and load config from current directory (convenience function)
pub fn discover() -> Result<HotmountConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

fn cargo_metadata_table(manifest: &Path) -> Result<Option<toml::Table>> {
    let content = fs::read_to_string(manifest)?;
    let parsed: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "Cargo.toml".to_string(),
        hint: Some(format!("Invalid TOML syntax: {}", e)),
    })?;

    Ok(parsed
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("hotmount"))
        .and_then(|h| h.as_table())
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn find_ignores_manifest_without_metadata() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"app\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn find_prefers_hotmount_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("hotmount.toml");
        fs::write(&config_path, "entry = \"src/app.rs\"\nadapter = \"axum\"\n").unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package.metadata.hotmount]\nentry = \"src/other.rs\"\nadapter = \"tower\"\n",
        )
        .unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), config_path);
    }

    #[test]
    fn load_returns_not_found_when_no_config() {
        Jail::expect_with(|jail| {
            let discovery = ConfigDiscovery::new(jail.directory());
            assert!(matches!(discovery.load(), Err(ConfigError::NotFound)));
            Ok(())
        });
    }

    #[test]
    fn load_parses_hotmount_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "hotmount.toml",
                r#"
entry = "src/app.rs"
adapter = "managed"
init_on_boot = true

[dev]
port = 4000
"#,
            )?;

            let config = ConfigDiscovery::new(jail.directory()).load().unwrap();
            assert_eq!(config.mount.entry, "src/app.rs");
            assert_eq!(config.mount.adapter, "managed");
            assert!(config.mount.init_on_boot);
            assert_eq!(config.mount.export_name, "viteNodeApp");
            assert_eq!(config.dev.port, 4000);
            Ok(())
        });
    }

    #[test]
    fn load_from_cargo_metadata() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Cargo.toml",
                r#"
[package]
name = "app"
version = "0.1.0"

[package.metadata.hotmount]
entry = "src/app.rs"
adapter = "channel"
export_name = "server"
"#,
            )?;

            let config = ConfigDiscovery::new(jail.directory()).load().unwrap();
            assert_eq!(config.mount.adapter, "channel");
            assert_eq!(config.mount.export_name, "server");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "hotmount.toml",
                "entry = \"src/app.rs\"\nadapter = \"axum\"\n",
            )?;
            jail.set_env("HOTMOUNT_ADAPTER", "tower");
            jail.set_env("HOTMOUNT_DEV__PORT", "4100");

            let config = ConfigDiscovery::new(jail.directory()).load().unwrap();
            assert_eq!(config.mount.adapter, "tower");
            assert_eq!(config.dev.port, 4100);
            Ok(())
        });
    }

    #[test]
    fn load_reports_missing_required_fields() {
        Jail::expect_with(|jail| {
            jail.create_file("hotmount.toml", "entry = \"src/app.rs\"\n")?;

            let result = ConfigDiscovery::new(jail.directory()).load();
            assert!(matches!(result, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }
}
