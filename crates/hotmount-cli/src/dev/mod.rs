//! Development server module.
//!
//! Provides the server that hosts the mounted application:
//! - Request bridging through the configured adapter
//! - Reload notifications via Server-Sent Events
//! - File watching with debouncing
//! - Full server restarts driven by the hot-reload coordinator

pub mod config;
pub mod server;
pub mod state;
pub mod supervisor;
pub mod watcher;

// Re-exports
pub use config::DevConfig;
pub use server::{RunningServer, build_router};
pub use state::{DevServerState, SharedState};
pub use supervisor::{ServerHandle, Supervisor, SupervisorCommand};
pub use watcher::{FileChange, FileWatcher};

use hotmount::ReloadMessage;
use serde::{Deserialize, Serialize};

/// Events pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DevEvent {
    /// Sent to a client right after it subscribes
    Connected { id: usize },

    /// Discard all state and reload `path` (`*` for everything)
    FullReload { path: String },
}

impl From<ReloadMessage> for DevEvent {
    fn from(message: ReloadMessage) -> Self {
        match message {
            ReloadMessage::FullReload { path } => DevEvent::FullReload { path },
        }
    }
}
