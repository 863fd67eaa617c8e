//! The mounted application.
//!
//! Every evaluation builds a fresh router with its own visit counter, so the
//! count starts over after each dev server restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router {
    let visits = Arc::new(AtomicUsize::new(0));

    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .with_state(visits)
}

async fn index(State(visits): State<Arc<AtomicUsize>>) -> String {
    let count = visits.fetch_add(1, Ordering::Relaxed) + 1;
    format!("Hello from hotmount! Visits since the last restart: {count}\n")
}
