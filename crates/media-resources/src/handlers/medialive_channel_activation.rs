//! `Custom::MediaLiveChannelActivation`
//!
//! Models a channel's running state as its own resource: creating it starts
//! the channel, deleting it stops the channel again.

use super::{map_props, required, unexpected_request_type, wait_for_channel_state};
use crate::api::{ChannelState, MediaServices};
use crate::model::medialive::{StartChannelInput, StopChannelInput};
use async_trait::async_trait;
use resource_framework::{HandlerError, Request, RequestType, ResourceHandler, Success};
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::MediaLiveChannelActivation";

pub struct MediaLiveChannelActivation;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaLiveChannelActivation {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create | RequestType::Update => {
                let input: StartChannelInput = map_props(&request.resource_properties)?;
                let channel_id = required(&input.channel_id, "ChannelId")?;

                services.medialive.start_channel(&input).await?;
                info!(channel_id, "Starting channel");
                wait_for_channel_state(
                    services,
                    channel_id,
                    ChannelState::Running,
                    &[ChannelState::Starting],
                )
                .await?;
                Ok(Some(Success::new(format!("{channel_id}/activation"))))
            }
            RequestType::Delete => {
                let input: StopChannelInput = map_props(&request.resource_properties)?;
                let channel_id = required(&input.channel_id, "ChannelId")?;

                services.medialive.stop_channel(&input).await?;
                info!(channel_id, "Stopping channel");
                wait_for_channel_state(
                    services,
                    channel_id,
                    ChannelState::Idle,
                    &[ChannelState::Stopping],
                )
                .await?;
                Ok(None)
            }
            RequestType::Other(_) => Err(unexpected_request_type(request)),
        }
    }
}
