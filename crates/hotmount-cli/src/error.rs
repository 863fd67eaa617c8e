//! Error handling for the hotmount CLI.
//!
//! Commands return [`CliError`], which wraps the library errors via `#[from]`
//! conversions. `main` turns it into a `miette` report for display.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be found, loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] hotmount_config::ConfigError),

    /// The mount plugin rejected the configuration
    #[error("Setup error: {0}")]
    Setup(#[from] hotmount::SetupError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No entry module is registered with the module graph
    #[error(
        "No entry modules are registered\n\nHint: run `hotmount dev` through your application's dev binary, which registers its modules and calls `hotmount_cli::run`"
    )]
    NoModules,

    /// Directory or file that must exist does not
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a miette report.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Setup(e) => miette::miette!("{}", e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotmount_config::ConfigError;

    #[test]
    fn config_errors_convert() {
        let err: CliError = ConfigError::NotFound.into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("hotmount.toml"));
    }

    #[test]
    fn setup_error_keeps_adapter_hint() {
        let err: CliError = hotmount::SetupError::UnknownAdapter {
            adapter: "express".to_string(),
            known: "axum, tower".to_string(),
        }
        .into();

        let report = cli_error_to_miette(err);
        let msg = format!("{report}");
        assert!(msg.contains("`express`"));
        assert!(msg.contains("axum, tower"));
    }

    #[test]
    fn no_modules_has_hint() {
        assert!(CliError::NoModules.to_string().contains("Hint:"));
    }
}
