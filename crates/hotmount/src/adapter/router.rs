use async_trait::async_trait;
use tower::ServiceExt;

use super::{Adapter, unsupported};
use crate::app::Application;
use crate::bridge::RequestContext;
use crate::error::DispatchError;

/// Serves an [`axum::Router`]. Registered as `axum`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouterAdapter;

#[async_trait]
impl Adapter for RouterAdapter {
    fn name(&self) -> &str {
        "axum"
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        let Application::Router(router) = &cx.app else {
            return Err(unsupported(self, &cx.app));
        };

        let response = router
            .clone()
            .oneshot(cx.req)
            .await
            .unwrap_or_else(|never| match never {});
        cx.res.send(response)?;
        Ok(())
    }
}
