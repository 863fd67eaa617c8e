use async_trait::async_trait;

use super::{Adapter, unsupported};
use crate::app::Application;
use crate::bridge::RequestContext;
use crate::error::DispatchError;

/// Calls a plain async handler function. Registered as `handler`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HandlerAdapter;

#[async_trait]
impl Adapter for HandlerAdapter {
    fn name(&self) -> &str {
        "handler"
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        let Application::Handler(handler) = &cx.app else {
            return Err(unsupported(self, &cx.app));
        };

        let response = handler(cx.req).await.map_err(DispatchError::Service)?;
        cx.res.send(response)?;
        Ok(())
    }
}
