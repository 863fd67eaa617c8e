use async_trait::async_trait;
use tower::{Service, ServiceExt};

use super::{Adapter, unsupported};
use crate::app::Application;
use crate::bridge::RequestContext;
use crate::error::DispatchError;

/// Serves a boxed tower service. Registered as `tower`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceAdapter;

#[async_trait]
impl Adapter for ServiceAdapter {
    fn name(&self) -> &str {
        "tower"
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        let Application::Service(service) = &cx.app else {
            return Err(unsupported(self, &cx.app));
        };

        let mut service = service.clone();
        let response = service
            .ready()
            .await
            .map_err(DispatchError::Service)?
            .call(cx.req)
            .await
            .map_err(DispatchError::Service)?;
        cx.res.send(response)?;
        Ok(())
    }
}
