//! Interfaces to the hosting development server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::ModuleNamespace;
use crate::error::{ModuleError, RestartError};

/// Loads entry modules on behalf of the loader.
///
/// Caching is the host's business: a host may evaluate the module on every
/// call or hand back a cached namespace.
#[async_trait]
pub trait ModuleHost: Send + Sync {
    async fn load_module(&self, entry: &str) -> Result<ModuleNamespace, ModuleError>;

    /// Drop every cached module so the next load evaluates afresh.
    fn invalidate_all(&self) {}
}

/// Message pushed to connected development clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadMessage {
    /// Discard all client state and reload `path` (`*` for everything)
    FullReload { path: String },
}

impl ReloadMessage {
    /// Reload everything.
    pub fn full() -> Self {
        ReloadMessage::FullReload {
            path: "*".to_string(),
        }
    }
}

/// The development server hosting the mounted application.
#[async_trait]
pub trait DevHost: Send + Sync {
    /// Send a message to every connected client. Best-effort, never blocks.
    fn broadcast(&self, message: ReloadMessage);

    /// Tear down and start the server again.
    async fn restart(&self) -> Result<(), RestartError>;
}
