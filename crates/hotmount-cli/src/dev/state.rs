//! Shared state for the development server.
//!
//! Tracks the Server-Sent Events clients that receive reload notifications.
//! The state outlives server restarts, so client ids keep increasing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::dev::DevEvent;

/// Events buffered per client before new ones are dropped.
const CLIENT_BUFFER: usize = 100;

/// Client connection tracker for Server-Sent Events.
pub type ClientRegistry = RwLock<HashMap<usize, mpsc::Sender<String>>>;

/// Shared development server state.
pub struct DevServerState {
    /// Connected SSE clients
    clients: ClientRegistry,

    /// Next client ID
    next_client_id: AtomicUsize,

    /// Route of the SSE endpoint
    events_path: String,
}

impl DevServerState {
    pub fn new(events_path: impl Into<String>) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_client_id: AtomicUsize::new(0),
            events_path: events_path.into(),
        }
    }

    pub fn events_path(&self) -> &str {
        &self.events_path
    }

    /// Register a new SSE client.
    ///
    /// # Returns
    ///
    /// Client ID and receiver for serialized events
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    /// Unregister an SSE client.
    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Get number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Send an event to every connected client without waiting.
    ///
    /// Disconnected clients are dropped. A client whose buffer is full misses
    /// this event but stays connected.
    pub fn broadcast(&self, event: &DevEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(error) => {
                tracing::error!(%error, "Failed to serialize dev event");
                return;
            }
        };

        let mut closed = Vec::new();
        for (id, tx) in self.clients.read().iter() {
            match tx.try_send(json.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(client = id, "Client is not keeping up, dropping event");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        if !closed.is_empty() {
            let mut clients = self.clients.write();
            for id in closed {
                clients.remove(&id);
            }
        }
    }

    /// Close every client stream. Used when the server goes down.
    pub fn disconnect_clients(&self) -> usize {
        let mut clients = self.clients.write();
        let count = clients.len();
        clients.clear();
        count
    }
}

/// Shared state handle for passing around the application.
pub type SharedState = Arc<DevServerState>;
