//! # Process Wiring
//!
//! Builds the frozen handler table the binary dispatches through. Every
//! resource type this crate supports is registered here under the name its
//! handler module exports.

use crate::api::MediaServices;
use crate::handlers::{
    mediaconnect_flow, mediaconnect_flow_activation, medialive_channel,
    medialive_channel_activation, medialive_input, medialive_input_security_group,
    mediastore_container_description, random_string, MediaConnectFlow, MediaConnectFlowActivation,
    MediaLiveChannel, MediaLiveChannelActivation, MediaLiveInput, MediaLiveInputSecurityGroup,
    MediaStoreContainerDescription, RandomString,
};
use resource_framework::HandlerRegistry;

pub fn build_registry() -> HandlerRegistry<MediaServices> {
    HandlerRegistry::builder()
        .register(medialive_channel::RESOURCE_TYPE, MediaLiveChannel)
        .register(
            medialive_channel_activation::RESOURCE_TYPE,
            MediaLiveChannelActivation,
        )
        .register(medialive_input::RESOURCE_TYPE, MediaLiveInput)
        .register(
            medialive_input_security_group::RESOURCE_TYPE,
            MediaLiveInputSecurityGroup,
        )
        .register(mediaconnect_flow::RESOURCE_TYPE, MediaConnectFlow)
        .register(
            mediaconnect_flow_activation::RESOURCE_TYPE,
            MediaConnectFlowActivation,
        )
        .register(
            mediastore_container_description::RESOURCE_TYPE,
            MediaStoreContainerDescription,
        )
        .register(random_string::RESOURCE_TYPE, RandomString)
        .build()
}
