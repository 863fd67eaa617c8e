//! hotmount CLI entry point.
//!
//! The standalone binary has no application modules registered, so `dev`
//! explains how to wire one up. `check` and `schema` work as usual.

use std::sync::Arc;

use hotmount::ModuleGraph;

#[tokio::main]
async fn main() -> miette::Result<()> {
    hotmount_cli::run(Arc::new(ModuleGraph::new())).await
}
