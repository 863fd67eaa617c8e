//! Development server command implementation.
//!
//! Orchestrates the dev server lifecycle:
//! - Configuration and adapter resolution
//! - HTTP server with the request bridge and SSE reload events
//! - File watching with debouncing
//! - Full reload and server restart on file changes
//! - Graceful shutdown on Ctrl+C

use std::sync::Arc;

use hotmount::{
    AdapterConfig, AdapterRegistry, HotReloadCoordinator, HotUpdate, ModuleGraph, MountPlugin,
    RestartError,
};
use tokio::signal;

use crate::cli::DevArgs;
use crate::dev::{DevConfig, DevServerState, FileWatcher, Supervisor, SupervisorCommand};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the dev command.
///
/// # Process Flow
///
/// 1. Load and validate dev configuration
/// 2. Resolve the adapter and start the server
/// 3. Start the file watcher
/// 4. Main event loop:
///    - File changes go to the hot-reload coordinator, which broadcasts a
///      full reload and asks for a restart
///    - Restart requests restart the server with fresh modules
///    - Ctrl+C stops the server
///
/// # Errors
///
/// Returns errors for:
/// - Invalid configuration or an unknown adapter
/// - Server startup failures
/// - File watcher errors
pub async fn execute(
    args: DevArgs,
    modules: Arc<ModuleGraph>,
    registry: AdapterRegistry,
) -> Result<()> {
    if modules.is_empty() {
        return Err(CliError::NoModules);
    }

    let config = DevConfig::from_args(&args)?;
    if !modules.contains(&config.mount.entry) {
        ui::warning(&format!(
            "Entry module {} is not registered, requests will fail until it is",
            config.mount.entry
        ));
    }
    ui::info(&format!("Working directory: {}", config.cwd.display()));

    let plugin = MountPlugin::with_registry(AdapterConfig::from(config.mount.clone()), registry);
    let state = Arc::new(DevServerState::new(config.settings.events_path.clone()));
    let (mut supervisor, mut commands) = Supervisor::new(plugin, modules, state, config.addr);

    let addr = supervisor.start().await?;
    ui::print_ready(
        &format!("http://{addr}"),
        &config.mount.entry,
        &config.mount.adapter,
    );

    let (watcher, mut changes) = FileWatcher::new(
        config.watch_roots(),
        config.settings.ignore.clone(),
        config.watch_debounce(),
    )?;
    for root in watcher.roots() {
        tracing::debug!("Watching {}", root.display());
    }

    let coordinator = HotReloadCoordinator::with_debounce(
        Arc::new(supervisor.handle()),
        config.restart_debounce(),
    );

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                let path = change.into_path();
                ui::info(&format!("File changed: {}", display_path(&path, &config)));
                coordinator.handle_hot_update(HotUpdate::new(vec![path]));
            }

            Some(command) = commands.recv() => match command {
                SupervisorCommand::Restart(reply) => {
                    let outcome = match supervisor.restart().await {
                        Ok(addr) => {
                            ui::success(&format!("Server restarted at http://{addr}"));
                            Ok(())
                        }
                        Err(e) => {
                            ui::error(&format!("Restart failed: {e}"));
                            Err(RestartError::Failed(e.to_string()))
                        }
                    };
                    let _ = reply.send(outcome);
                }
            },

            _ = signal::ctrl_c() => {
                ui::info("Shutting down development server...");
                break;
            }
        }
    }

    drop(watcher);
    supervisor.stop().await?;
    ui::success("Development server stopped");
    Ok(())
}

/// Path relative to the project root when possible.
fn display_path(path: &std::path::Path, config: &DevConfig) -> String {
    path.strip_prefix(&config.cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}
