use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{Adapter, unsupported};
use crate::app::{Application, Exchange};
use crate::bridge::RequestContext;
use crate::error::DispatchError;

/// Sends each request to a channel-driven application and waits for its
/// reply. Registered as `channel`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChannelAdapter;

#[async_trait]
impl Adapter for ChannelAdapter {
    fn name(&self) -> &str {
        "channel"
    }

    async fn dispatch(&self, cx: RequestContext) -> Result<(), DispatchError> {
        let Application::Channel(sender) = &cx.app else {
            return Err(unsupported(self, &cx.app));
        };

        let (reply, response) = oneshot::channel();
        sender
            .send(Exchange {
                request: cx.req,
                reply,
            })
            .await
            .map_err(|_| DispatchError::ChannelClosed)?;

        let response = response.await.map_err(|_| DispatchError::ChannelClosed)?;
        cx.res.send(response)?;
        Ok(())
    }
}
