//! Error types for the mount pipeline.
//!
//! Each stage has its own error so the policy for it stays visible at the
//! call site: setup errors are fatal, per-request errors become a response or
//! are forwarded to `next`, boot and restart errors are only logged.

use thiserror::Error;

use crate::app::BoxError;

/// Plugin setup failed before any request was served.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The configured adapter name is not in the registry
    #[error(
        "failed to find a valid request adapter for `{adapter}`\n\nHint: use one of: {known}, or supply a custom adapter"
    )]
    UnknownAdapter { adapter: String, known: String },

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] hotmount_config::ConfigError),
}

/// The module host could not produce the entry module.
#[derive(Debug, Clone, Error)]
pub enum ModuleError {
    #[error("module not found: {0}")]
    NotFound(String),

    #[error("failed to evaluate module {entry}: {message}")]
    Evaluation { entry: String, message: String },
}

impl ModuleError {
    /// Wrap an evaluation failure of `entry`.
    pub fn evaluation(entry: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ModuleError::Evaluation {
            entry: entry.into(),
            message: err.to_string(),
        }
    }
}

/// Loading the application export failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to find a named export `{export}` from {entry}")]
    ExportNotFound { export: String, entry: String },

    #[error(transparent)]
    Module(#[from] ModuleError),
}

/// Writing to a response that is already committed.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response headers were already sent")]
    HeadersSent,
}

/// An adapter failed while serving a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("adapter `{adapter}` cannot serve a {found} application")]
    UnsupportedApplication { adapter: String, found: &'static str },

    #[error("application failed to handle the request: {0}")]
    Service(#[source] BoxError),

    #[error("application initialization failed: {0}")]
    Init(#[source] BoxError),

    #[error("application channel closed before replying")]
    ChannelClosed,

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl DispatchError {
    /// Wrap any error raised by application code.
    pub fn service(err: impl Into<BoxError>) -> Self {
        DispatchError::Service(err.into())
    }
}

/// What the request bridge forwards to `next` once a response is committed.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("application instance could not be resolved for the request (entry: {entry})")]
    Unresolved { entry: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Boot-time load or initialization failed.
#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("application initialization failed: {0}")]
    Init(#[source] BoxError),
}

/// The host could not restart the server.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("dev server is shutting down")]
    Closed,

    #[error("failed to restart dev server: {0}")]
    Failed(String),
}
