//! Full-reload handling of file changes.
//!
//! A change never patches modules in place. Connected clients are told to
//! reload everything and the dev server is restarted on a later tick.
//! Restarts go through a single slot so a burst of changes costs one
//! restart, and a change that lands while a restart runs queues exactly one
//! follow-up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::host::{DevHost, ReloadMessage};

/// A file change notification from the watcher.
#[derive(Debug, Clone)]
pub struct HotUpdate {
    pub modules: Vec<PathBuf>,
    pub timestamp: SystemTime,
}

impl HotUpdate {
    pub fn new(modules: Vec<PathBuf>) -> Self {
        Self {
            modules,
            timestamp: SystemTime::now(),
        }
    }
}

/// Tells the host how much of an update is left for its own handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotUpdateOutcome {
    /// Nothing left; the host must not apply its per-module update
    Handled,
}

/// State of the restart slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartSlot {
    Idle,
    /// A restart is scheduled but has not started
    Pending,
    /// A restart is running; `rerun` queues one more after it
    Running { rerun: bool },
}

struct Inner {
    host: Arc<dyn DevHost>,
    debounce: Duration,
    slot: Mutex<RestartSlot>,
    idle: Notify,
}

/// Reacts to file changes with a reload broadcast and a deferred restart.
#[derive(Clone)]
pub struct HotReloadCoordinator {
    inner: Arc<Inner>,
}

impl HotReloadCoordinator {
    pub fn new(host: Arc<dyn DevHost>) -> Self {
        Self::with_debounce(host, Duration::ZERO)
    }

    /// Wait `debounce` after scheduling before the restart starts.
    pub fn with_debounce(host: Arc<dyn DevHost>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                host,
                debounce,
                slot: Mutex::new(RestartSlot::Idle),
                idle: Notify::new(),
            }),
        }
    }

    pub fn slot(&self) -> RestartSlot {
        *self.inner.slot.lock()
    }

    /// Handle a change: broadcast a full reload, then schedule a restart.
    ///
    /// Must be called inside a tokio runtime. The restart never runs before
    /// this returns.
    pub fn handle_hot_update(&self, update: HotUpdate) -> HotUpdateOutcome {
        tracing::info!(
            changed = update.modules.len(),
            first = ?update.modules.first(),
            "File change detected, reloading"
        );
        self.inner.host.broadcast(ReloadMessage::full());
        self.schedule_restart();
        HotUpdateOutcome::Handled
    }

    fn schedule_restart(&self) {
        let mut slot = self.inner.slot.lock();
        match *slot {
            RestartSlot::Idle => {
                *slot = RestartSlot::Pending;
                drop(slot);
                tokio::spawn(run_restarts(self.inner.clone()));
            }
            RestartSlot::Pending => {
                tracing::debug!("Restart already pending, coalescing change");
            }
            RestartSlot::Running { rerun } => {
                *slot = RestartSlot::Running { rerun: true };
                if rerun {
                    tracing::debug!("Follow-up restart already queued, coalescing change");
                } else {
                    tracing::debug!("Restart in progress, queued a follow-up restart");
                }
            }
        }
    }

    /// Resolves once no restart is pending or running.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.slot() == RestartSlot::Idle {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for HotReloadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotReloadCoordinator")
            .field("debounce", &self.inner.debounce)
            .field("slot", &self.slot())
            .finish()
    }
}

async fn run_restarts(inner: Arc<Inner>) {
    tokio::task::yield_now().await;

    loop {
        if !inner.debounce.is_zero() {
            tokio::time::sleep(inner.debounce).await;
        }

        *inner.slot.lock() = RestartSlot::Running { rerun: false };
        match inner.host.restart().await {
            Ok(()) => tracing::info!("Dev server restarted"),
            Err(error) => tracing::error!(%error, "Failed to restart dev server"),
        }

        let rerun = {
            let mut slot = inner.slot.lock();
            let rerun = matches!(*slot, RestartSlot::Running { rerun: true });
            *slot = if rerun {
                RestartSlot::Pending
            } else {
                RestartSlot::Idle
            };
            rerun
        };

        if !rerun {
            inner.idle.notify_waiters();
            return;
        }
    }
}
