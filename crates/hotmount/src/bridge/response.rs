use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::app::Response;
use crate::error::ResponseError;

/// Write side of one request's response.
///
/// A response is committed at most once. After the first successful
/// [`send`](Self::send) the headers count as sent and every further write
/// fails with [`ResponseError::HeadersSent`]. Clones share the same slot.
#[derive(Clone)]
pub struct ResponseWriter {
    slot: Arc<Mutex<Option<oneshot::Sender<Response>>>>,
}

impl ResponseWriter {
    /// Create a writer and the receiver its committed response arrives on.
    pub fn channel() -> (Self, oneshot::Receiver<Response>) {
        let (tx, rx) = oneshot::channel();
        let writer = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (writer, rx)
    }

    pub fn headers_sent(&self) -> bool {
        self.slot.lock().is_none()
    }

    /// Commit `response`.
    pub fn send(&self, response: Response) -> Result<(), ResponseError> {
        let sender = self.slot.lock().take().ok_or(ResponseError::HeadersSent)?;
        if sender.send(response).is_err() {
            tracing::debug!("Client went away before the response was delivered");
        }
        Ok(())
    }

    /// Commit a plain-text response with `status`.
    pub fn end(&self, status: StatusCode, body: impl Into<String>) -> Result<(), ResponseError> {
        self.send(text_response(status, body.into()))
    }
}

pub(crate) fn text_response(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commits_once() {
        let (res, rx) = ResponseWriter::channel();
        assert!(!res.headers_sent());

        res.end(StatusCode::CREATED, "made").unwrap();
        assert!(res.headers_sent());

        let err = res.clone().end(StatusCode::OK, "again").unwrap_err();
        assert!(matches!(err, ResponseError::HeadersSent));

        let response = rx.await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn send_after_receiver_dropped_still_commits() {
        let (res, rx) = ResponseWriter::channel();
        drop(rx);
        res.end(StatusCode::OK, "late").unwrap();
        assert!(res.headers_sent());
    }
}
