//! Application mount settings: what to load and how to serve it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Export read from the entry module when none is configured.
pub const DEFAULT_EXPORT_NAME: &str = "viteNodeApp";

/// Application name used in production bundles when none is configured.
pub const DEFAULT_APP_NAME: &str = "app";

/// Output format of the production server bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Cjs,
    Esm,
}

/// Compiler used to transform application sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    #[default]
    Esbuild,
    Swc,
}

/// Settings that decide which application is mounted and through which adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct MountConfig {
    /// Entry module that exports the application (e.g. "src/app.rs")
    pub entry: String,

    /// Built-in adapter name (axum, tower, handler, managed, channel)
    pub adapter: String,

    /// Named export holding the application instance
    #[serde(default = "default_export_name")]
    pub export_name: String,

    /// Load and initialize the application as soon as the server listens
    #[serde(default)]
    pub init_on_boot: bool,

    /// Name of the application in production bundles
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Output format of the production bundle
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Source compiler
    #[serde(default)]
    pub compiler: Compiler,

    /// Compiler-specific transform options, passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub transform: serde_json::Value,
}

impl MountConfig {
    /// Create a mount config with every optional field at its default.
    pub fn new(entry: impl Into<String>, adapter: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            adapter: adapter.into(),
            export_name: default_export_name(),
            init_on_boot: false,
            app_name: default_app_name(),
            output_format: OutputFormat::default(),
            compiler: Compiler::default(),
            transform: serde_json::Value::Null,
        }
    }
}

pub fn default_export_name() -> String {
    DEFAULT_EXPORT_NAME.to_string()
}

pub fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}
