//! One-shot application load when the server starts listening.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::adapter::{Adapter, BootOutcome};
use crate::loader::ApplicationLoader;

/// What a boot attempt did. Failures are already logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootReport {
    /// Boot already ran for this plugin registration
    Disarmed,
    LoadFailed,
    EmptyApplication,
    Completed(BootOutcome),
    InitFailed,
}

/// Loads and initializes the application once, independent of requests.
///
/// Nothing here fails the server: every outcome is logged and later
/// requests load the application again anyway.
pub struct BootInitializer {
    loader: ApplicationLoader,
    adapter: Arc<dyn Adapter>,
    armed: AtomicBool,
}

impl BootInitializer {
    pub fn new(loader: ApplicationLoader, adapter: Arc<dyn Adapter>) -> Self {
        Self {
            loader,
            adapter,
            armed: AtomicBool::new(true),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Run on the server's "listening" event. Only the first call does work.
    pub async fn on_listening(&self) -> BootReport {
        if !self.armed.swap(false, Ordering::AcqRel) {
            return BootReport::Disarmed;
        }

        let entry = self.loader.entry();
        let app = match self.loader.load().await {
            Ok(Some(app)) => app,
            Ok(None) => {
                tracing::warn!(
                    %entry,
                    export = %self.loader.export_name(),
                    "Application module loaded on boot, but the exported app was empty"
                );
                return BootReport::EmptyApplication;
            }
            Err(error) => {
                tracing::error!(%entry, %error, "Failed to load application module on boot");
                return BootReport::LoadFailed;
            }
        };

        match self.adapter.boot(&app).await {
            Ok(outcome) => {
                match outcome {
                    BootOutcome::Initialized => {
                        tracing::info!(adapter = %self.adapter.name(), "Application initialized on boot");
                    }
                    BootOutcome::AlreadyInitialized => {
                        tracing::debug!(adapter = %self.adapter.name(), "Application was already initialized");
                    }
                    BootOutcome::NotRequired => {
                        tracing::debug!(adapter = %self.adapter.name(), "Application loaded on boot");
                    }
                }
                BootReport::Completed(outcome)
            }
            Err(error) => {
                tracing::error!(
                    adapter = %self.adapter.name(),
                    %entry,
                    %error,
                    "Failed to initialize application on boot"
                );
                BootReport::InitFailed
            }
        }
    }
}

impl std::fmt::Debug for BootInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootInitializer")
            .field("loader", &self.loader)
            .field("adapter", &self.adapter.name())
            .field("armed", &self.is_armed())
            .finish()
    }
}
