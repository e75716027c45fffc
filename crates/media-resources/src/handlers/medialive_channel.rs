//! `Custom::MediaLiveChannel`
//!
//! Create waits for the new channel to become `IDLE` so that dependent
//! resources (activations) find it usable. Delete waits for `DELETED` so that
//! inputs attached to it can be removed afterwards.

use super::{arn_and_id, map_props, unexpected_request_type, wait_for_channel_state};
use crate::api::{ChannelState, MediaServices};
use crate::model::medialive::{CreateChannelInput, UpdateChannelInput};
use async_trait::async_trait;
use resource_framework::{HandlerError, Request, RequestType, ResourceHandler, Success};
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::MediaLiveChannel";

pub struct MediaLiveChannel;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaLiveChannel {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create => {
                let input: CreateChannelInput = map_props(&request.resource_properties)?;
                let channel = services.medialive.create_channel(&input).await?;
                info!(channel_id = %channel.id, "Created channel");

                wait_for_channel_state(
                    services,
                    &channel.id,
                    ChannelState::Idle,
                    &[ChannelState::Creating],
                )
                .await?;
                Ok(Some(Success::new(channel.id.clone()).with_data(arn_and_id(&channel))))
            }
            RequestType::Update => {
                let mut input: UpdateChannelInput = map_props(&request.resource_properties)?;
                input.channel_id = Some(request.physical_resource_id.clone());
                let channel = services.medialive.update_channel(&input).await?;
                Ok(Some(Success::new(channel.id.clone()).with_data(arn_and_id(&channel))))
            }
            RequestType::Delete => {
                let channel_id = &request.physical_resource_id;
                services.medialive.delete_channel(channel_id).await?;
                wait_for_channel_state(
                    services,
                    channel_id,
                    ChannelState::Deleted,
                    &[ChannelState::Deleting],
                )
                .await?;
                Ok(None)
            }
            RequestType::Other(_) => Err(unexpected_request_type(request)),
        }
    }
}
