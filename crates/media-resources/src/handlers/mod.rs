//! # Resource Handlers
//!
//! One [`ResourceHandler`](resource_framework::ResourceHandler) per custom
//! resource type. Each module exposes its handler and the resource-type name
//! it is registered under.

pub mod mediaconnect_flow;
pub mod mediaconnect_flow_activation;
pub mod medialive_channel;
pub mod medialive_channel_activation;
pub mod medialive_input;
pub mod medialive_input_security_group;
pub mod mediastore_container_description;
pub mod random_string;

pub use mediaconnect_flow::MediaConnectFlow;
pub use mediaconnect_flow_activation::MediaConnectFlowActivation;
pub use medialive_channel::MediaLiveChannel;
pub use medialive_channel_activation::MediaLiveChannelActivation;
pub use medialive_input::MediaLiveInput;
pub use medialive_input_security_group::MediaLiveInputSecurityGroup;
pub use mediastore_container_description::MediaStoreContainerDescription;
pub use random_string::RandomString;

use crate::api::{ChannelState, FlowStatus, MediaServices, ResourceRef};
use resource_framework::mapper::{reshape_props, Shape};
use resource_framework::{HandlerError, PropertyBag, Request};
use serde_json::json;

/// Map a property bag into a fresh target shape.
pub(crate) fn map_props<S: Shape + Default>(props: &PropertyBag) -> Result<S, HandlerError> {
    let mut shape = S::default();
    reshape_props(props, &mut shape)?;
    Ok(shape)
}

pub(crate) fn unexpected_request_type(request: &Request) -> HandlerError {
    HandlerError::UnexpectedRequestType(request.request_type.to_string())
}

pub(crate) fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, HandlerError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HandlerError::Other(format!("Missing required property: {key}")))
}

/// `{Arn, Id}` output data of MediaLive resources.
pub(crate) fn arn_and_id(resource: &ResourceRef) -> PropertyBag {
    let mut data = PropertyBag::new();
    data.insert("Arn".into(), json!(resource.arn));
    data.insert("Id".into(), json!(resource.id));
    data
}

pub(crate) async fn wait_for_channel_state(
    services: &MediaServices,
    channel_id: &str,
    desired: ChannelState,
    allowed: &[ChannelState],
) -> Result<(), HandlerError> {
    let api = services.medialive.as_ref();
    services
        .poller
        .wait_for(
            "Channel",
            move || async move { api.describe_channel(channel_id).await.map_err(HandlerError::from) },
            desired,
            allowed,
        )
        .await
}

pub(crate) async fn wait_for_flow_status(
    services: &MediaServices,
    flow_arn: &str,
    desired: FlowStatus,
    allowed: &[FlowStatus],
) -> Result<(), HandlerError> {
    let api = services.mediaconnect.as_ref();
    services
        .poller
        .wait_for(
            "Flow",
            move || async move { api.describe_flow(flow_arn).await.map_err(HandlerError::from) },
            desired,
            allowed,
        )
        .await
}
