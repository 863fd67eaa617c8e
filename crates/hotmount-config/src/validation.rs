//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::Path;

use crate::config::HotmountConfig;
use crate::error::{ConfigError, Result};

/// Longest restart delay accepted from configuration.
const MAX_RESTART_DEBOUNCE_MS: u64 = 10_000;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &HotmountConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use hotmount_config::{ConfigValidator, HotmountConfig, SchemaValidator};
///
/// let config = HotmountConfig::new("src/app.rs", "axum");
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &HotmountConfig) -> Result<()> {
        let mount = &config.mount;

        if mount.entry.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "entry cannot be empty".to_string(),
                hint: Some("Point 'entry' at the module that exports your application".to_string()),
            });
        }

        if mount.adapter.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "adapter cannot be empty".to_string(),
                hint: Some(
                    "Use one of the built-in adapters: axum, tower, handler, managed, channel"
                        .to_string(),
                ),
            });
        }

        if !is_export_name(&mount.export_name) {
            return Err(ConfigError::SchemaValidation {
                message: format!("'{}' is not a valid export name", mount.export_name),
                hint: Some(
                    "Export names start with a letter or '_' and contain only letters, digits and '_'"
                        .to_string(),
                ),
            });
        }

        if !config.dev.events_path.starts_with('/') {
            return Err(ConfigError::SchemaValidation {
                message: format!("events path '{}' must start with '/'", config.dev.events_path),
                hint: None,
            });
        }

        if config.dev.restart_debounce_ms > MAX_RESTART_DEBOUNCE_MS {
            return Err(ConfigError::SchemaValidation {
                message: format!(
                    "restart_debounce_ms {} is out of range (0 to {})",
                    config.dev.restart_debounce_ms, MAX_RESTART_DEBOUNCE_MS
                ),
                hint: Some("Restarts are meant to follow file changes closely".to_string()),
            });
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the entry module and watch paths
/// exist under the project root.
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &HotmountConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let entry = self.root.join(&config.mount.entry);
        if !entry.exists() {
            return Err(ConfigError::EntryNotFound { path: entry });
        }

        for watch in &config.dev.watch_paths {
            let path = self.root.join(watch);
            if !path.exists() {
                return Err(ConfigError::WatchPathNotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &HotmountConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &HotmountConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

fn is_export_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn accepts_defaults() {
        let config = HotmountConfig::new("src/app.rs", "axum");
        assert!(validate_schema(&config).is_ok());
    }

    #[test]
    fn rejects_empty_entry() {
        let config = HotmountConfig::new("  ", "axum");
        let err = validate_schema(&config).unwrap_err();
        assert!(err.to_string().contains("entry cannot be empty"));
    }

    #[test]
    fn rejects_invalid_export_name() {
        let mut config = HotmountConfig::new("src/app.rs", "axum");
        config.mount.export_name = "9lives".to_string();
        assert!(validate_schema(&config).is_err());

        config.mount.export_name = "my-app".to_string();
        assert!(validate_schema(&config).is_err());

        config.mount.export_name = "_app2".to_string();
        assert!(validate_schema(&config).is_ok());
    }

    #[test]
    fn rejects_relative_events_path() {
        let mut config = HotmountConfig::new("src/app.rs", "axum");
        config.dev.events_path = "events".to_string();
        assert!(validate_schema(&config).is_err());
    }

    #[test]
    fn rejects_long_restart_debounce() {
        let mut config = HotmountConfig::new("src/app.rs", "axum");
        config.dev.restart_debounce_ms = 60_000;
        assert!(validate_schema(&config).is_err());
    }

    #[test]
    fn fs_validator_requires_entry_on_disk() {
        let dir = TempDir::new().unwrap();
        let config = HotmountConfig::new("src/app.rs", "axum");

        let err = validate_fs(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::EntryNotFound { .. }));

        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.rs"), "").unwrap();
        assert!(validate_fs(&config, dir.path()).is_ok());
    }

    #[test]
    fn fs_validator_checks_watch_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.rs"), "").unwrap();

        let mut config = HotmountConfig::new("app.rs", "axum");
        config.dev.watch_paths = vec!["templates".into()];

        let err = validate_fs(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::WatchPathNotFound { .. }));
    }
}
