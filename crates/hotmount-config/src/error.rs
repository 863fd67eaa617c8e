//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("entry module not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    #[error("watch path not found: {}", .path.display())]
    WatchPathNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error(
        "hotmount is not configured\n\nHint: create hotmount.toml or add a [package.metadata.hotmount] table to Cargo.toml"
    )]
    NotFound,

    #[error("invalid config value for `{field}`{}", hint_suffix(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    // Schema validation errors (no filesystem checks)
    #[error("schema validation failed: {message}{}", hint_suffix(.hint))]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("failed to read configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!("\n\nHint: {h}"))
        .unwrap_or_default()
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}
