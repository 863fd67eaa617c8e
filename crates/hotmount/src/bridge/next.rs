use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::app::Request;
use crate::error::BridgeError;

/// What the bridge asks of the rest of the middleware stack.
pub enum Continuation {
    /// Hand the request to the next handler
    Pass(Request),
    /// Report an error the bridge could not answer itself
    Fail(BridgeError),
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Continuation::Pass(req) => f.debug_tuple("Pass").field(req.uri()).finish(),
            Continuation::Fail(err) => f.debug_tuple("Fail").field(err).finish(),
        }
    }
}

/// Continuation callback of one request. Only the first call takes effect.
#[derive(Clone)]
pub struct Next {
    slot: Arc<Mutex<Option<oneshot::Sender<Continuation>>>>,
}

impl Next {
    pub fn channel() -> (Self, oneshot::Receiver<Continuation>) {
        let (tx, rx) = oneshot::channel();
        let next = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (next, rx)
    }

    /// Whether `pass` or `fail` was already called.
    pub fn is_called(&self) -> bool {
        self.slot.lock().is_none()
    }

    pub fn pass(&self, req: Request) {
        let Some(sender) = self.slot.lock().take() else {
            tracing::warn!(uri = %req.uri(), "next called more than once; ignoring pass");
            return;
        };
        if sender.send(Continuation::Pass(req)).is_err() {
            tracing::warn!("Request passed on after the response was committed");
        }
    }

    pub fn fail(&self, error: BridgeError) {
        let Some(sender) = self.slot.lock().take() else {
            tracing::error!(%error, "next called more than once; dropping error");
            return;
        };
        if let Err(Continuation::Fail(error)) = sender.send(Continuation::Fail(error)) {
            tracing::error!(%error, "Request failed after the response was committed");
        }
    }
}
