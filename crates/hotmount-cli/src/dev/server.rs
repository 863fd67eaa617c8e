//! HTTP server hosting the mounted application.
//!
//! The router serves the reload endpoints itself and hands every other
//! request to the request bridge.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use hotmount::RequestBridge;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};

use crate::dev::{DevEvent, SharedState};
use crate::error::{CliError, Result};

/// Route of the reload client script.
pub const CLIENT_SCRIPT_PATH: &str = "/__hotmount/client.js";

const CLIENT_SCRIPT: &str = include_str!("../../assets/client.js");

/// Placeholder in the client script replaced with the events route.
const EVENTS_PATH_PLACEHOLDER: &str = "__HOTMOUNT_EVENTS_PATH__";

/// How long open connections get to finish when the server stops.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the axum router for one server instance.
///
/// - `events_path` - SSE endpoint for reload events
/// - [`CLIENT_SCRIPT_PATH`] - reload client script
/// - everything else goes through the request bridge, then to a 404
pub fn build_router(state: SharedState, bridge: &Arc<RequestBridge>) -> Router {
    let events_path = state.events_path().to_string();
    let app = bridge.layer(Router::new().fallback(not_found));

    Router::new()
        .route(&events_path, get(handle_sse))
        .route(CLIENT_SCRIPT_PATH, get(handle_client_script))
        .with_state(state)
        .fallback_service(app)
        .layer(
            // CORS: Allow all origins for dev
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Handle SSE connections for reload events.
async fn handle_sse(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    tracing::debug!(client = id, "Client connected via SSE");

    let hello = serde_json::to_string(&DevEvent::Connected { id }).unwrap_or_default();
    let stream = tokio_stream::once(hello)
        .chain(ReceiverStream::new(rx))
        .map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Serve the reload client script.
async fn handle_client_script(State(state): State<SharedState>) -> impl IntoResponse {
    let script = CLIENT_SCRIPT.replace(EVENTS_PATH_PLACEHOLDER, state.events_path());
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        script,
    )
}

/// Reached when the application passes a request on.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("Cannot {}", uri.path()))
}

/// A listening server that can be shut down gracefully.
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Bind `addr` and start serving `router` in the background.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {addr}: {e}")))?;
        let addr = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        tracing::debug!(%addr, "Server listening");
        Ok(Self {
            addr,
            shutdown,
            task,
        })
    }

    /// Address the server actually listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for open ones to finish.
    ///
    /// Connections still open after the timeout are dropped.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            addr,
            shutdown,
            mut task,
        } = self;
        let _ = shutdown.send(());

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await {
            Ok(Ok(Ok(()))) => {
                tracing::debug!(%addr, "Server stopped");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(CliError::Server(format!("Server error: {e}"))),
            Ok(Err(e)) => Err(CliError::Server(format!("Server task failed: {e}"))),
            Err(_) => {
                tracing::warn!(%addr, "Server did not stop in time, dropping open connections");
                task.abort();
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningServer")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}
