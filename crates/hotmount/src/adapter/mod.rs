//! Request adapters.
//!
//! An [`Adapter`] bridges a [`RequestContext`] into one kind of application.
//! The built-in adapters are looked up by name through an
//! [`AdapterRegistry`]; anything implementing the trait can be supplied as a
//! custom adapter instead.
//!
//! # Custom adapters
//!
//! ```rust,no_run
//! use hotmount::{AdapterSelector, DispatchError, RequestContext};
//!
//! let selector = AdapterSelector::custom_fn("passthrough", |cx: RequestContext| async move {
//!     cx.next.pass(cx.req);
//!     Ok::<_, DispatchError>(())
//! });
//! ```

mod channel;
mod handler;
mod managed;
mod registry;
mod router;
mod service;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Application;
use crate::bridge::RequestContext;
use crate::error::{BootError, DispatchError};

pub use channel::ChannelAdapter;
pub use handler::HandlerAdapter;
pub use managed::ManagedAdapter;
pub use registry::AdapterRegistry;
pub use router::RouterAdapter;
pub use service::ServiceAdapter;

/// Result of an adapter's boot hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// The adapter has nothing to initialize
    NotRequired,
    AlreadyInitialized,
    Initialized,
}

/// Bridges a request into a specific kind of application.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;

    /// Serve one request. The adapter writes to `cx.res` or delegates to `cx.next`.
    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError>;

    /// One-time initialization run on boot. Adapters whose applications need
    /// no explicit initialization keep the default.
    async fn boot(&self, _app: &Application) -> Result<BootOutcome, BootError> {
        Ok(BootOutcome::NotRequired)
    }
}

/// Which adapter to use: a registry name or a supplied implementation.
#[derive(Clone)]
pub enum AdapterSelector {
    Named(String),
    Custom(Arc<dyn Adapter>),
}

impl AdapterSelector {
    pub fn named(name: impl Into<String>) -> Self {
        AdapterSelector::Named(name.into())
    }

    pub fn custom(adapter: impl Adapter + 'static) -> Self {
        AdapterSelector::Custom(Arc::new(adapter))
    }

    /// Use an async closure as a custom adapter.
    pub fn custom_fn<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), DispatchError>> + Send + 'static,
    {
        Self::custom(FnAdapter::new(name, f))
    }
}

impl From<&str> for AdapterSelector {
    fn from(name: &str) -> Self {
        AdapterSelector::named(name)
    }
}

impl From<String> for AdapterSelector {
    fn from(name: String) -> Self {
        AdapterSelector::Named(name)
    }
}

impl From<Arc<dyn Adapter>> for AdapterSelector {
    fn from(adapter: Arc<dyn Adapter>) -> Self {
        AdapterSelector::Custom(adapter)
    }
}

impl fmt::Display for AdapterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterSelector::Named(name) => f.write_str(name),
            AdapterSelector::Custom(adapter) => write!(f, "custom ({})", adapter.name()),
        }
    }
}

impl fmt::Debug for AdapterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterSelector::Named(name) => f.debug_tuple("Named").field(name).finish(),
            AdapterSelector::Custom(adapter) => {
                f.debug_tuple("Custom").field(&adapter.name()).finish()
            }
        }
    }
}

/// Custom adapter backed by an async closure.
pub struct FnAdapter<F> {
    name: String,
    f: F,
}

impl<F> FnAdapter<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> Adapter for FnAdapter<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DispatchError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        (self.f)(cx).await
    }
}

/// Error for an adapter handed an application it cannot drive.
pub(crate) fn unsupported(adapter: &dyn Adapter, app: &Application) -> DispatchError {
    DispatchError::UnsupportedApplication {
        adapter: adapter.name().to_string(),
        found: app.kind(),
    }
}
