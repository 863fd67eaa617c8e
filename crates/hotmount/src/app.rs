//! Application values exported by entry modules.
//!
//! An entry module evaluates to a [`ModuleNamespace`]: named [`Export`]s,
//! one of which holds the [`Application`] to serve. Each `Application`
//! variant is one kind of web stack a built-in adapter knows how to drive.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{mpsc, oneshot};
use tower::util::BoxCloneSyncService;

use crate::error::ModuleError;

pub type Request = axum::extract::Request;
pub type Response = axum::response::Response;
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type-erased tower service served by the `tower` adapter.
pub type HttpService = BoxCloneSyncService<Request, Response, BoxError>;

/// Plain async request handler served by the `handler` adapter.
pub type HandlerFn =
    Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Response, BoxError>> + Send + Sync>;

/// An application that must be initialized before it can serve requests.
///
/// The `managed` adapter initializes it lazily on the first request, or on
/// boot when `init_on_boot` is set.
#[async_trait]
pub trait ManagedApp: Send + Sync {
    fn is_initialized(&self) -> bool;

    async fn init(&self) -> Result<(), BoxError>;

    /// Router that serves requests once initialized.
    fn router(&self) -> Router;
}

/// One request handed to a channel-driven application.
pub struct Exchange {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// A loaded application instance.
#[derive(Clone)]
pub enum Application {
    Router(Router),
    Service(HttpService),
    Handler(HandlerFn),
    Managed(Arc<dyn ManagedApp>),
    Channel(mpsc::Sender<Exchange>),
    /// Opaque value only a custom adapter understands
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Application {
    /// Short name of the variant, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Application::Router(_) => "router",
            Application::Service(_) => "service",
            Application::Handler(_) => "handler",
            Application::Managed(_) => "managed",
            Application::Channel(_) => "channel",
            Application::Custom(_) => "custom",
        }
    }

    /// Wrap an async function as an application.
    pub fn handler<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
    {
        Application::Handler(Arc::new(move |req| f(req).boxed()))
    }

    /// Wrap any cloneable tower service as an application.
    pub fn service<S>(service: S) -> Self
    where
        S: tower::Service<Request, Response = Response, Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        Application::Service(BoxCloneSyncService::new(service))
    }

    /// Wrap an arbitrary value for a custom adapter.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Application::Custom(Arc::new(value))
    }

    /// Borrow the value of a [`Application::Custom`] as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Application::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Application").field(&self.kind()).finish()
    }
}

/// Future of an export that is still being produced.
///
/// Shared so every load of a cached module can await the same result.
pub type PendingApplication =
    Shared<BoxFuture<'static, Result<Option<Application>, ModuleError>>>;

/// A named export of an entry module.
#[derive(Clone)]
pub enum Export {
    Ready(Application),
    /// The export exists but holds no application
    Empty,
    Pending(PendingApplication),
}

impl Export {
    pub fn ready(app: Application) -> Self {
        Export::Ready(app)
    }

    /// An export produced by an async factory.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<Application>, ModuleError>> + Send + 'static,
    {
        Export::Pending(future.boxed().shared())
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Ready(app) => f.debug_tuple("Ready").field(app).finish(),
            Export::Empty => f.write_str("Empty"),
            Export::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Exports of an evaluated entry module.
#[derive(Clone, Debug, Default)]
pub struct ModuleNamespace {
    exports: HashMap<String, Export>,
}

impl ModuleNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an export, replacing any previous export of the same name.
    pub fn with_export(mut self, name: impl Into<String>, export: Export) -> Self {
        self.exports.insert(name.into(), export);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[test]
    fn kind_names_each_variant() {
        let router = Application::Router(Router::new().route("/", get(|| async { "ok" })));
        assert_eq!(router.kind(), "router");

        let handler = Application::handler(|_req| async { Ok(Response::default()) });
        assert_eq!(handler.kind(), "handler");

        let (tx, _rx) = mpsc::channel(1);
        assert_eq!(Application::Channel(tx).kind(), "channel");

        assert_eq!(Application::custom(7_u32).kind(), "custom");
    }

    #[test]
    fn downcast_only_applies_to_custom_values() {
        let app = Application::custom(String::from("state"));
        assert_eq!(app.downcast_ref::<String>().map(String::as_str), Some("state"));
        assert!(app.downcast_ref::<u32>().is_none());

        let router = Application::Router(Router::new());
        assert!(router.downcast_ref::<Router>().is_none());
    }

    #[test]
    fn namespace_lookup() {
        let ns = ModuleNamespace::new()
            .with_export("viteNodeApp", Export::Empty)
            .with_export("other", Export::ready(Application::custom(())));

        assert_eq!(ns.len(), 2);
        assert!(matches!(ns.get("viteNodeApp"), Some(Export::Empty)));
        assert!(ns.get("missing").is_none());
    }

    #[tokio::test]
    async fn pending_export_can_be_awaited_twice() {
        let export = Export::pending(async { Ok(Some(Application::custom(1_u8))) });
        let Export::Pending(pending) = export else {
            panic!("expected pending export");
        };

        let first = pending.clone().await.unwrap();
        let second = pending.await.unwrap();
        assert_eq!(first.unwrap().downcast_ref::<u8>(), Some(&1));
        assert_eq!(second.unwrap().downcast_ref::<u8>(), Some(&1));
    }
}
