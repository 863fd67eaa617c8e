//! hotmount - serve a Rust web application from a development server.
//!
//! The application lives in an *entry module* registered with a
//! [`ModuleHost`]. Every request reloads the entry's named export and hands
//! it to an [`Adapter`] that knows how to drive that kind of application.
//! File changes do not patch modules in place: they broadcast a full reload
//! to connected clients and schedule a restart of the whole server.
//!
//! # Architecture
//!
//! - [`adapter`] - the adapter contract, built-in adapters and the registry
//! - [`loader`] - resolves the entry module's export into an [`Application`]
//! - [`bridge`] - per-request middleware: load, dispatch, map failures
//! - [`boot`] - optional one-shot load and initialization on listen
//! - [`reload`] - file change handling and the single-slot restart task
//! - [`host`] / [`module_graph`] - interfaces to the hosting dev server
//! - [`plugin`] - resolves configuration into the pieces above
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use hotmount::{AdapterConfig, Application, Export, ModuleGraph, ModuleNamespace};
//!
//! let modules = ModuleGraph::new();
//! modules.register("src/app.rs", || async {
//!     let router = Router::new().route("/", get(|| async { "hello" }));
//!     Ok(ModuleNamespace::new().with_export("viteNodeApp", Export::ready(Application::Router(router))))
//! });
//!
//! let config = AdapterConfig::new("src/app.rs", "axum");
//! let plugin = hotmount::MountPlugin::new(config);
//! # let _ = (plugin, Arc::new(modules));
//! ```

pub mod adapter;
pub mod app;
pub mod boot;
pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod module_graph;
pub mod plugin;
pub mod reload;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use adapter::{Adapter, AdapterRegistry, AdapterSelector, BootOutcome, FnAdapter};
pub use app::{
    Application, BoxError, Exchange, Export, HandlerFn, HttpService, ManagedApp, ModuleNamespace,
    Request, Response,
};
pub use boot::{BootInitializer, BootReport};
pub use bridge::{Continuation, Next, RequestBridge, RequestContext, ResponseWriter};
pub use config::AdapterConfig;
pub use error::{
    BootError, BridgeError, DispatchError, LoadError, ModuleError, ResponseError, RestartError,
    SetupError,
};
pub use host::{DevHost, ModuleHost, ReloadMessage};
pub use loader::ApplicationLoader;
pub use module_graph::{ModuleFactory, ModuleGraph};
pub use plugin::{BuildSettings, MountPlugin, Mounted};
pub use reload::{HotReloadCoordinator, HotUpdate, HotUpdateOutcome, RestartSlot};
