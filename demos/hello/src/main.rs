//! Dev binary for the hello demo.
//!
//! Run `cargo run -p hotmount-hello -- dev` from this directory.

mod app;

use std::sync::Arc;

use hotmount::{Application, Export, ModuleGraph, ModuleNamespace};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let modules = ModuleGraph::new();
    modules.register("src/app.rs", || async {
        Ok(ModuleNamespace::new()
            .with_export("viteNodeApp", Export::ready(Application::Router(app::router()))))
    });

    hotmount_cli::run(Arc::new(modules)).await
}
