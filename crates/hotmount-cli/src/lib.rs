//! hotmount CLI - development server for Rust web applications.
//!
//! An application's dev binary registers its entry modules with a
//! [`ModuleGraph`] and hands it to [`run`] (or a [`Runner`] with custom
//! adapters). The CLI then parses the command line, loads `hotmount.toml`,
//! and serves the application with full-restart hot reload.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing with clap
//! - [`commands`] - `dev`, `check` and `schema`
//! - [`dev`] - Server, SSE reload events, file watching and restarts
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal status output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use hotmount::{Application, Export, ModuleGraph, ModuleNamespace};
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let modules = ModuleGraph::new();
//!     modules.register("src/app.rs", || async {
//!         let router = Router::new().route("/", get(|| async { "hello" }));
//!         Ok(ModuleNamespace::new()
//!             .with_export("viteNodeApp", Export::ready(Application::Router(router))))
//!     });
//!     hotmount_cli::run(Arc::new(modules)).await
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

use std::sync::Arc;

use clap::Parser;
use hotmount::{AdapterRegistry, ModuleGraph};

// Re-export commonly used types
pub use error::{CliError, Result};

/// Runs the CLI against a set of registered modules.
#[derive(Clone)]
pub struct Runner {
    modules: Arc<ModuleGraph>,
    registry: AdapterRegistry,
}

impl Runner {
    /// Runner with the built-in adapters.
    pub fn new(modules: Arc<ModuleGraph>) -> Self {
        Self {
            modules,
            registry: AdapterRegistry::builtin(),
        }
    }

    /// Replace the adapter table consulted for configured adapter names.
    pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Parse the process arguments and execute the command.
    pub async fn run(self) -> miette::Result<()> {
        self.run_with(cli::Cli::parse()).await
    }

    /// Execute already parsed arguments.
    pub async fn run_with(self, args: cli::Cli) -> miette::Result<()> {
        logger::init_logger(
            args.verbose,
            args.quiet,
            args.no_color || !logger::should_use_colors(),
        );

        let result = match args.command {
            cli::Command::Dev(dev_args) => {
                commands::dev_execute(dev_args, self.modules, self.registry).await
            }
            cli::Command::Check(check_args) => {
                commands::check_execute(check_args, self.registry).await
            }
            cli::Command::Schema => commands::schema_execute().await,
        };

        // Convert CLI errors to miette diagnostics for error reporting
        result.map_err(error::cli_error_to_miette)
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("modules", &self.modules.len())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Run the CLI with the built-in adapters.
pub async fn run(modules: Arc<ModuleGraph>) -> miette::Result<()> {
    Runner::new(modules).run().await
}
