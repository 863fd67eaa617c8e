//! Top-level configuration document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dev::DevSettings;
use crate::mount::MountConfig;

/// Complete hotmount configuration.
///
/// Mount settings sit at the top level, dev server settings under `[dev]`:
///
/// ```toml
/// entry = "src/app.rs"
/// adapter = "axum"
/// init_on_boot = true
///
/// [dev]
/// port = 4000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HotmountConfig {
    #[serde(flatten)]
    pub mount: MountConfig,

    #[serde(default)]
    pub dev: DevSettings,
}

impl HotmountConfig {
    /// Create a config for `entry` served through `adapter`, everything else defaulted.
    pub fn new(entry: impl Into<String>, adapter: impl Into<String>) -> Self {
        Self {
            mount: MountConfig::new(entry, adapter),
            dev: DevSettings::default(),
        }
    }

    /// Parse a config from a JSON value (e.g. an already extracted table).
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Generate the JSON Schema of the configuration document.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(HotmountConfig);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Example `hotmount.toml` content.
    pub fn example_toml() -> String {
        r#"entry = "src/app.rs"
adapter = "axum"
export_name = "viteNodeApp"
init_on_boot = false

[dev]
port = 3000
ignore = ["target", "*.log"]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_parses() {
        let config: HotmountConfig = toml::from_str(&HotmountConfig::example_toml()).unwrap();
        assert_eq!(config.mount.adapter, "axum");
        assert_eq!(config.dev.port, 3000);
        assert_eq!(config.dev.ignore, vec!["target", "*.log"]);
        assert_eq!(config.dev.events_path, "/__hotmount/events");
    }

    #[test]
    fn dev_section_is_optional() {
        let config: HotmountConfig = toml::from_str(
            r#"
entry = "src/app.rs"
adapter = "tower"
"#,
        )
        .unwrap();
        assert_eq!(config.dev, DevSettings::default());
    }

    #[test]
    fn schema_lists_mount_fields() {
        let schema = HotmountConfig::json_schema();
        let text = schema.to_string();
        assert!(text.contains("export_name"));
        assert!(text.contains("init_on_boot"));
        assert!(text.contains("dev"));
    }

    #[test]
    fn from_value_reports_invalid_documents() {
        let result = HotmountConfig::from_value(serde_json::json!({ "entry": 42 }));
        assert!(matches!(
            result,
            Err(crate::ConfigError::InvalidValue { .. })
        ));
    }
}
