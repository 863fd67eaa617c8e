use async_trait::async_trait;
use tower::ServiceExt;

use super::{Adapter, BootOutcome, unsupported};
use crate::app::{Application, ManagedApp};
use crate::bridge::RequestContext;
use crate::error::{BootError, DispatchError};

/// Serves applications that need an explicit `init`. Registered as `managed`.
///
/// An application that was not initialized on boot is initialized by the
/// first request that reaches it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManagedAdapter;

#[async_trait]
impl Adapter for ManagedAdapter {
    fn name(&self) -> &str {
        "managed"
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        let Application::Managed(app) = &cx.app else {
            return Err(unsupported(self, &cx.app));
        };

        if !app.is_initialized() {
            app.init().await.map_err(DispatchError::Init)?;
        }

        let response = app
            .router()
            .oneshot(cx.req)
            .await
            .unwrap_or_else(|never| match never {});
        cx.res.send(response)?;
        Ok(())
    }

    async fn boot(&self, app: &Application) -> Result<BootOutcome, BootError> {
        let Application::Managed(app) = app else {
            return Ok(BootOutcome::NotRequired);
        };
        init_managed(app.as_ref()).await
    }
}

async fn init_managed(app: &dyn ManagedApp) -> Result<BootOutcome, BootError> {
    if app.is_initialized() {
        return Ok(BootOutcome::AlreadyInitialized);
    }
    app.init().await.map_err(BootError::Init)?;
    Ok(BootOutcome::Initialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BoxError;
    use crate::testing::{body_string, context, get};
    use axum::Router;
    use axum::routing::get as get_route;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counted {
        initialized: AtomicBool,
        inits: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ManagedApp for Counted {
        fn is_initialized(&self) -> bool {
            self.initialized.load(Ordering::SeqCst)
        }

        async fn init(&self) -> Result<(), BoxError> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err("missing DATABASE_URL".into());
            }
            self.initialized.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn router(&self) -> Router {
            Router::new().route("/", get_route(|| async { "managed" }))
        }
    }

    #[tokio::test]
    async fn first_request_initializes() {
        let app = Arc::new(Counted::default());
        let (cx, head, _continuation) = context(Application::Managed(app.clone()), get("/"));

        ManagedAdapter.dispatch(cx).await.unwrap();

        assert_eq!(body_string(head.await.unwrap()).await, "managed");
        assert_eq!(app.inits.load(Ordering::SeqCst), 1);

        let (cx, _head, _continuation) = context(Application::Managed(app.clone()), get("/"));
        ManagedAdapter.dispatch(cx).await.unwrap();
        assert_eq!(app.inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn boot_initializes_once() {
        let app = Arc::new(Counted::default());
        let application = Application::Managed(app.clone());

        let first = ManagedAdapter.boot(&application).await.unwrap();
        let second = ManagedAdapter.boot(&application).await.unwrap();

        assert_eq!(first, BootOutcome::Initialized);
        assert_eq!(second, BootOutcome::AlreadyInitialized);
        assert_eq!(app.inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn boot_reports_init_failure() {
        let app = Arc::new(Counted {
            fail: true,
            ..Counted::default()
        });
        let err = ManagedAdapter
            .boot(&Application::Managed(app))
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::Init(_)));
    }

    #[tokio::test]
    async fn boot_skips_other_applications() {
        let outcome = ManagedAdapter.boot(&Application::custom(())).await.unwrap();
        assert_eq!(outcome, BootOutcome::NotRequired);
    }
}
