//! Owns the running server and restarts it on request.
//!
//! The hot-reload coordinator only sees a [`ServerHandle`]. Restart requests
//! travel over a channel to the dev loop, which owns the [`Supervisor`] and
//! performs the restart, so only one task ever touches the server.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hotmount::{DevHost, ModuleHost, MountPlugin, ReloadMessage, RestartError};
use tokio::sync::{mpsc, oneshot};

use crate::dev::{DevEvent, RunningServer, SharedState, build_router};
use crate::error::Result;

/// Requests sent from a [`ServerHandle`] to the dev loop.
#[derive(Debug)]
pub enum SupervisorCommand {
    /// Restart the server and report the outcome
    Restart(oneshot::Sender<Result<(), RestartError>>),
}

/// The dev server as seen by the mounted application and the reload
/// coordinator.
#[derive(Clone)]
pub struct ServerHandle {
    state: SharedState,
    commands: mpsc::Sender<SupervisorCommand>,
}

impl ServerHandle {
    pub fn state(&self) -> &SharedState {
        &self.state
    }
}

#[async_trait]
impl DevHost for ServerHandle {
    fn broadcast(&self, message: ReloadMessage) {
        self.state.broadcast(&DevEvent::from(message));
    }

    async fn restart(&self) -> Result<(), RestartError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(SupervisorCommand::Restart(reply))
            .await
            .map_err(|_| RestartError::Closed)?;
        outcome.await.map_err(|_| RestartError::Closed)?
    }
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("clients", &self.state.client_count())
            .finish_non_exhaustive()
    }
}

/// Starts, stops and restarts the dev server.
pub struct Supervisor {
    plugin: MountPlugin,
    modules: Arc<dyn ModuleHost>,
    handle: ServerHandle,
    addr: SocketAddr,
    running: Option<RunningServer>,
}

impl Supervisor {
    /// Create a supervisor that will listen on `addr`.
    ///
    /// Returns the receiver of restart requests, which the caller must poll
    /// and answer with [`Supervisor::restart`].
    pub fn new(
        plugin: MountPlugin,
        modules: Arc<dyn ModuleHost>,
        state: SharedState,
        addr: SocketAddr,
    ) -> (Self, mpsc::Receiver<SupervisorCommand>) {
        let (commands, rx) = mpsc::channel(8);
        let supervisor = Self {
            plugin,
            modules,
            handle: ServerHandle { state, commands },
            addr,
            running: None,
        };
        (supervisor, rx)
    }

    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Address of the running server, if any.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(RunningServer::local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Set up the plugin, bind and start serving.
    ///
    /// Setup errors such as an unknown adapter fail here, before anything
    /// listens. The boot hook, when armed, runs once the server listens.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.local_addr() {
            return Ok(addr);
        }

        let host: Arc<dyn DevHost> = Arc::new(self.handle.clone());
        let mounted = self.plugin.setup(self.modules.clone(), host)?;
        let router = build_router(self.handle.state.clone(), &mounted.bridge);
        let server = RunningServer::bind(self.addr, router).await?;

        // A restart reuses the port the OS picked the first time
        let addr = server.local_addr();
        self.addr = addr;
        self.running = Some(server);

        if let Some(boot) = mounted.boot {
            tokio::spawn(async move {
                boot.on_listening().await;
            });
        }

        Ok(addr)
    }

    /// Disconnect clients and shut the server down.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(server) = self.running.take() else {
            return Ok(());
        };

        let clients = self.handle.state.disconnect_clients();
        tracing::debug!(clients, "Disconnected reload clients");
        server.shutdown().await
    }

    /// Stop, drop every cached module, and start again.
    pub async fn restart(&mut self) -> Result<SocketAddr> {
        self.stop().await?;
        self.modules.invalidate_all();
        self.start().await
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("plugin", &self.plugin)
            .field("addr", &self.addr)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}
