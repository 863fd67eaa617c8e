use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use super::next::{Continuation, Next};
use super::response::{ResponseWriter, text_response};
use super::{INTERNAL_ERROR_BODY, RequestBridge};
use crate::app::{Request, Response};

/// axum middleware driving [`RequestBridge::handle`].
///
/// The bridge runs on its own task. The first observable outcome decides the
/// response: a committed response is returned as is, a pass continues to the
/// wrapped router, and a failure goes to the final error handler.
pub async fn bridge_middleware(
    State(bridge): State<Arc<RequestBridge>>,
    req: Request,
    inner: middleware::Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let (res, mut head) = ResponseWriter::channel();
    let (next, mut continuation) = Next::channel();

    let task = tokio::spawn(async move {
        bridge.handle(req, res, next).await;
    });

    tokio::select! {
        biased;

        Ok(response) = &mut head => {
            tokio::spawn(report_late_continuation(continuation));
            response
        }
        Ok(outcome) = &mut continuation => match outcome {
            Continuation::Pass(req) => inner.run(req).await,
            Continuation::Fail(error) => {
                tracing::error!(%method, %uri, %error, "Unhandled request error");
                text_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_string())
            }
        },
        else => {
            // Both channels closed, so the task is done or unwinding
            match task.await {
                Err(error) if error.is_panic() => {
                    let panic = panic_message(error);
                    tracing::error!(%method, %uri, %panic, "Adapter panicked while handling the request");
                }
                _ => {
                    tracing::warn!(%method, %uri, "Adapter finished without responding or calling next");
                }
            }
            text_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_string())
        }
    }
}

/// Text of a panic payload, when it carries one.
fn panic_message(error: JoinError) -> String {
    let payload = match error.try_into_panic() {
        Ok(payload) => payload,
        Err(error) => return error.to_string(),
    };
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Log whatever the request does with `next` after its response went out.
async fn report_late_continuation(continuation: oneshot::Receiver<Continuation>) {
    match continuation.await {
        Ok(Continuation::Fail(error)) => {
            tracing::error!(%error, "Request failed after the response was committed");
        }
        Ok(Continuation::Pass(req)) => {
            tracing::warn!(uri = %req.uri(), "Request passed on after the response was committed");
        }
        Err(_) => {}
    }
}
