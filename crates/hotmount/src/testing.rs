//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::app::{Application, Request, Response};
use crate::bridge::{Continuation, Next, RequestContext, ResponseWriter};
use crate::error::RestartError;
use crate::host::{DevHost, ReloadMessage};

/// Host that records broadcasts and counts restarts.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub broadcasts: Mutex<Vec<ReloadMessage>>,
    pub restarts: Mutex<usize>,
}

#[async_trait]
impl DevHost for RecordingHost {
    fn broadcast(&self, message: ReloadMessage) {
        self.broadcasts.lock().push(message);
    }

    async fn restart(&self) -> Result<(), RestartError> {
        *self.restarts.lock() += 1;
        Ok(())
    }
}

pub(crate) fn get(uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.uri_mut() = uri.parse().expect("valid test uri");
    req
}

/// Build a context for `app` plus the receivers of its outcome.
pub(crate) fn context(
    app: Application,
    req: Request,
) -> (
    RequestContext,
    oneshot::Receiver<Response>,
    oneshot::Receiver<Continuation>,
) {
    let (res, head) = ResponseWriter::channel();
    let (next, continuation) = Next::channel();
    let cx = RequestContext {
        app,
        server: Arc::new(RecordingHost::default()),
        req,
        res,
        next,
    };
    (cx, head, continuation)
}

pub(crate) async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8_lossy(&bytes).into_owned()
}
