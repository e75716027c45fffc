//! # Provisioning API
//!
//! The interfaces handlers use to reach the media services, one trait per
//! service, bundled into the [`MediaServices`] context each handler receives.
//!
//! The production implementation is [`GatewayClient`]; tests use the
//! in-memory fakes from [`crate::testing`].

mod gateway;

pub use gateway::{GatewayClient, GatewayConfig, GatewayLoader};

use crate::model::mediaconnect::{CreateFlowInput, StartFlowInput, StopFlowInput};
use crate::model::medialive::{
    CreateChannelInput, CreateInputInput, CreateInputSecurityGroupInput, StartChannelInput,
    StopChannelInput, UpdateChannelInput, UpdateInputInput, UpdateInputSecurityGroupInput,
};
use crate::model::mediastore::DescribeContainerInput;
use async_trait::async_trait;
use resource_framework::{ConfigError, HandlerError, Poller};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service rejected the call. The message is what ends up in `Reason`.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("provisioning request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid provisioning response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GatewayError> for HandlerError {
    fn from(err: GatewayError) -> Self {
        HandlerError::Api(err.to_string())
    }
}

/// Serialise a request shape as it goes on the wire, unset fields omitted.
pub fn to_wire<I: Serialize + ?Sized>(input: &I) -> Result<Value, GatewayError> {
    let mut value = serde_json::to_value(input)?;
    strip_nulls(&mut value);
    Ok(value)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

// --- Outputs ---

/// Identity of a MediaLive channel, input or input security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRef {
    pub arn: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Flow {
    pub flow_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    #[serde(rename = "ARN")]
    pub arn: String,
    pub endpoint: String,
}

macro_rules! state_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)*
            /// A state this crate does not know about, kept verbatim.
            Other(String),
        }

        impl From<String> for $name {
            fn from(state: String) -> Self {
                match state.as_str() {
                    $($wire => Self::$variant,)*
                    _ => Self::Other(state),
                }
            }
        }

        impl From<$name> for String {
            fn from(state: $name) -> Self {
                state.to_string()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($wire),)*
                    Self::Other(state) => f.write_str(state),
                }
            }
        }
    };
}

state_enum! {
    /// Lifecycle state of a MediaLive channel.
    ChannelState {
        Creating => "CREATING",
        CreateFailed => "CREATE_FAILED",
        Idle => "IDLE",
        Starting => "STARTING",
        Running => "RUNNING",
        Recovering => "RECOVERING",
        Stopping => "STOPPING",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Updating => "UPDATING",
        UpdateFailed => "UPDATE_FAILED",
    }
}

state_enum! {
    /// Status of a MediaConnect flow.
    FlowStatus {
        Standby => "STANDBY",
        Active => "ACTIVE",
        Updating => "UPDATING",
        Deleting => "DELETING",
        Starting => "STARTING",
        Stopping => "STOPPING",
        Error => "ERROR",
    }
}

// --- Service traits ---

#[async_trait]
pub trait MediaLiveApi: Send + Sync {
    async fn create_channel(&self, input: &CreateChannelInput) -> Result<ResourceRef, GatewayError>;
    async fn update_channel(&self, input: &UpdateChannelInput) -> Result<ResourceRef, GatewayError>;
    async fn delete_channel(&self, channel_id: &str) -> Result<(), GatewayError>;
    async fn describe_channel(&self, channel_id: &str) -> Result<ChannelState, GatewayError>;
    async fn start_channel(&self, input: &StartChannelInput) -> Result<(), GatewayError>;
    async fn stop_channel(&self, input: &StopChannelInput) -> Result<(), GatewayError>;

    async fn create_input(&self, input: &CreateInputInput) -> Result<ResourceRef, GatewayError>;
    async fn update_input(&self, input: &UpdateInputInput) -> Result<ResourceRef, GatewayError>;
    async fn delete_input(&self, input_id: &str) -> Result<(), GatewayError>;

    async fn create_input_security_group(
        &self,
        input: &CreateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError>;
    async fn update_input_security_group(
        &self,
        input: &UpdateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError>;
    async fn delete_input_security_group(&self, group_id: &str) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait MediaConnectApi: Send + Sync {
    async fn create_flow(&self, input: &CreateFlowInput) -> Result<Flow, GatewayError>;
    async fn delete_flow(&self, flow_arn: &str) -> Result<(), GatewayError>;
    async fn describe_flow(&self, flow_arn: &str) -> Result<FlowStatus, GatewayError>;
    async fn start_flow(&self, input: &StartFlowInput) -> Result<(), GatewayError>;
    async fn stop_flow(&self, input: &StopFlowInput) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait MediaStoreApi: Send + Sync {
    async fn describe_container(
        &self,
        input: &DescribeContainerInput,
    ) -> Result<Container, GatewayError>;
}

/// Ambient context handed to every media handler.
#[derive(Clone)]
pub struct MediaServices {
    pub medialive: Arc<dyn MediaLiveApi>,
    pub mediaconnect: Arc<dyn MediaConnectApi>,
    pub mediastore: Arc<dyn MediaStoreApi>,
    /// Used by handlers that wait for a backend state.
    pub poller: Poller,
}

impl MediaServices {
    /// All three services backed by one gateway client.
    pub fn from_gateway(client: Arc<GatewayClient>, poller: Poller) -> Self {
        Self {
            medialive: client.clone(),
            mediaconnect: client.clone(),
            mediastore: client,
            poller,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_states_round_trip_through_wire_names() {
        let state: ChannelState = serde_json::from_value(json!("CREATE_FAILED")).unwrap();
        assert_eq!(state, ChannelState::CreateFailed);
        assert_eq!(state.to_string(), "CREATE_FAILED");

        let status: FlowStatus = serde_json::from_value(json!("MIGRATING")).unwrap();
        assert_eq!(status, FlowStatus::Other("MIGRATING".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("MIGRATING"));
    }

    #[test]
    fn test_wire_body_omits_unset_fields() {
        let value = to_wire(&json!({ "A": null, "B": [{ "C": null, "D": 1 }], "E": { "F": null } }))
            .unwrap();
        assert_eq!(value, json!({ "B": [{ "D": 1 }], "E": {} }));
    }

    #[test]
    fn test_gateway_error_becomes_verbatim_reason() {
        let err: HandlerError = GatewayError::Api {
            status: 400,
            message: "BadRequestException: Channel name taken".into(),
        }
        .into();
        assert_eq!(err.to_string(), "BadRequestException: Channel name taken");
    }

    #[test]
    fn test_container_uses_upper_case_arn_key() {
        let container: Container = serde_json::from_value(json!({
            "ARN": "arn:aws:mediastore:us-east-1:000000000000:container/media",
            "Endpoint": "https://abc.data.mediastore.us-east-1.amazonaws.com"
        }))
        .unwrap();
        assert!(container.arn.ends_with("container/media"));
    }
}
