//! Per-request bridge between the dev server and the mounted application.
//!
//! For each request the bridge loads the application, hands it to the
//! adapter, and turns any failure into a 500 response. Once the response is
//! committed, failures are forwarded to [`Next::fail`] instead so the client
//! never gets two responses.

mod middleware;
mod next;
mod response;

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::adapter::Adapter;
use crate::app::{Application, Request};
use crate::error::BridgeError;
use crate::host::DevHost;
use crate::loader::ApplicationLoader;

pub use middleware::bridge_middleware;
pub use next::{Continuation, Next};
pub use response::ResponseWriter;

/// Body of the 500 sent when the entry export holds no application.
pub const UNRESOLVED_BODY: &str = "Application instance could not be resolved for the request.";

/// Body of the 500 sent for load and dispatch failures.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Everything an adapter gets for one request.
pub struct RequestContext {
    pub app: Application,
    pub server: Arc<dyn DevHost>,
    pub req: Request,
    pub res: ResponseWriter,
    pub next: Next,
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("app", &self.app)
            .field("method", self.req.method())
            .field("uri", self.req.uri())
            .field("headers_sent", &self.res.headers_sent())
            .finish_non_exhaustive()
    }
}

/// Loads the application and dispatches each request through one adapter.
pub struct RequestBridge {
    loader: ApplicationLoader,
    adapter: Arc<dyn Adapter>,
    server: Arc<dyn DevHost>,
}

impl RequestBridge {
    pub fn new(loader: ApplicationLoader, adapter: Arc<dyn Adapter>, server: Arc<dyn DevHost>) -> Self {
        Self {
            loader,
            adapter,
            server,
        }
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    pub fn loader(&self) -> &ApplicationLoader {
        &self.loader
    }

    /// Serve one request. Every outcome is observable through `res` or `next`.
    pub async fn handle(&self, req: Request, res: ResponseWriter, next: Next) {
        let app = match self.loader.load().await {
            Ok(Some(app)) => app,
            Ok(None) => {
                tracing::error!(entry = %self.loader.entry(), "{UNRESOLVED_BODY}");
                let error = BridgeError::Unresolved {
                    entry: self.loader.entry().to_string(),
                };
                respond_or_forward(&res, &next, UNRESOLVED_BODY, error);
                return;
            }
            Err(err) => {
                self.fail(&res, &next, err.into());
                return;
            }
        };

        let cx = RequestContext {
            app,
            server: self.server.clone(),
            req,
            res: res.clone(),
            next: next.clone(),
        };

        if let Err(err) = self.adapter.dispatch(cx).await {
            self.fail(&res, &next, err.into());
        }
    }

    fn fail(&self, res: &ResponseWriter, next: &Next, error: BridgeError) {
        tracing::error!(
            adapter = %self.adapter.name(),
            entry = %self.loader.entry(),
            %error,
            "Error during request processing"
        );
        respond_or_forward(res, next, INTERNAL_ERROR_BODY, error);
    }

    /// Wrap `router` so every request goes through this bridge first.
    ///
    /// Requests the application passes on with [`Next::pass`] reach `router`.
    pub fn layer(self: &Arc<Self>, router: axum::Router) -> axum::Router {
        router.layer(axum::middleware::from_fn_with_state(
            self.clone(),
            bridge_middleware,
        ))
    }
}

impl fmt::Debug for RequestBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBridge")
            .field("loader", &self.loader)
            .field("adapter", &self.adapter.name())
            .finish_non_exhaustive()
    }
}

/// Write a 500 with `body`, or hand `error` to `next` if headers are out.
fn respond_or_forward(res: &ResponseWriter, next: &Next, body: &str, error: BridgeError) {
    if res.end(StatusCode::INTERNAL_SERVER_ERROR, body).is_err() {
        next.fail(error);
    }
}
