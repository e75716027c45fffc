//! # Test Fakes
//!
//! In-memory implementations of the provisioning API traits.
//!
//! Every fake records each call as `(operation, wire body)`, so tests can
//! assert on exactly what a handler would have sent. Failures are injected per
//! operation with `fail`. State queries (`DescribeChannel`, `DescribeFlow`)
//! walk a scripted sequence and keep returning its last element.
//!
//! ```rust
//! use media_resources::api::ChannelState;
//! use media_resources::testing::FakeServices;
//!
//! let fakes = FakeServices::new();
//! fakes
//!     .medialive
//!     .script_channel_states([ChannelState::Creating, ChannelState::Idle]);
//! fakes.medialive.fail("DeleteChannel", "ConflictException: channel is running");
//!
//! let services = fakes.services();
//! # let _ = services;
//! ```

use crate::api::{
    to_wire, ChannelState, Container, Flow, FlowStatus, GatewayError, MediaConnectApi,
    MediaLiveApi, MediaServices, MediaStoreApi, ResourceRef,
};
use crate::model::mediaconnect::{CreateFlowInput, StartFlowInput, StopFlowInput};
use crate::model::medialive::{
    CreateChannelInput, CreateInputInput, CreateInputSecurityGroupInput, StartChannelInput,
    StopChannelInput, UpdateChannelInput, UpdateInputInput, UpdateInputSecurityGroupInput,
};
use crate::model::mediastore::DescribeContainerInput;
use async_trait::async_trait;
use resource_framework::{Poller, Request};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const ACCOUNT: &str = "us-east-1:000000000000";
const FIRST_ID: usize = 1000;

/// A request as the controller would send it, for resource type `Custom::Test`.
pub fn request(kind: &str, physical_id: &str, props: Value) -> Request {
    request_for("Custom::Test", kind, physical_id, props)
}

pub fn request_for(resource_type: &str, kind: &str, physical_id: &str, props: Value) -> Request {
    Request {
        request_type: kind.to_string().into(),
        response_url: "https://callback.example.com/signed".into(),
        stack_id: "arn:aws:cloudformation:us-east-1:000000000000:stack/media/1".into(),
        request_id: "req-1".into(),
        resource_type: resource_type.into(),
        logical_resource_id: "Resource".into(),
        physical_resource_id: physical_id.into(),
        resource_properties: props.as_object().cloned().unwrap_or_default(),
        old_resource_properties: Default::default(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(String, Value)>>,
    failures: Mutex<HashMap<String, String>>,
    issued: AtomicUsize,
}

impl Recorder {
    fn record<I: Serialize + ?Sized>(&self, operation: &str, input: &I) -> Result<(), GatewayError> {
        lock(&self.calls).push((operation.to_string(), to_wire(input)?));
        match lock(&self.failures).get(operation) {
            Some(message) => Err(GatewayError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> usize {
        FIRST_ID + self.issued.fetch_add(1, Ordering::SeqCst)
    }
}

/// Pops scripted states, repeating the last one.
fn next_state<S: Clone>(script: &Mutex<VecDeque<S>>, subject: &str) -> Result<S, GatewayError> {
    let mut script = lock(script);
    let state = if script.len() > 1 {
        script.pop_front()
    } else {
        script.front().cloned()
    };
    state.ok_or_else(|| GatewayError::Api {
        status: 404,
        message: format!("NotFoundException: {subject} not found"),
    })
}

macro_rules! recorded {
    ($fake:ty) => {
        impl $fake {
            /// Every call so far, as `(operation, wire body)`.
            pub fn calls(&self) -> Vec<(String, Value)> {
                lock(&self.recorder.calls).clone()
            }

            /// Wire bodies of every call to `operation`.
            pub fn calls_to(&self, operation: &str) -> Vec<Value> {
                lock(&self.recorder.calls)
                    .iter()
                    .filter(|(op, _)| op == operation)
                    .map(|(_, body)| body.clone())
                    .collect()
            }

            /// Make every later call to `operation` fail with `message`.
            pub fn fail(&self, operation: &str, message: impl Into<String>) {
                lock(&self.recorder.failures).insert(operation.to_string(), message.into());
            }
        }
    };
}

// --- MediaLive ---

#[derive(Default)]
pub struct FakeMediaLive {
    recorder: Recorder,
    channel_states: Mutex<VecDeque<ChannelState>>,
}

recorded!(FakeMediaLive);

impl FakeMediaLive {
    pub fn script_channel_states(&self, states: impl IntoIterator<Item = ChannelState>) {
        *lock(&self.channel_states) = states.into_iter().collect();
    }

    fn issue(&self, kind: &str) -> ResourceRef {
        let id = self.recorder.next_id().to_string();
        ResourceRef {
            arn: format!("arn:aws:medialive:{ACCOUNT}:{kind}:{id}"),
            id,
        }
    }

    fn existing(kind: &str, id: Option<&String>) -> ResourceRef {
        let id = id.cloned().unwrap_or_default();
        ResourceRef {
            arn: format!("arn:aws:medialive:{ACCOUNT}:{kind}:{id}"),
            id,
        }
    }
}

#[async_trait]
impl MediaLiveApi for FakeMediaLive {
    async fn create_channel(&self, input: &CreateChannelInput) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("CreateChannel", input)?;
        Ok(self.issue("channel"))
    }

    async fn update_channel(&self, input: &UpdateChannelInput) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("UpdateChannel", input)?;
        Ok(Self::existing("channel", input.channel_id.as_ref()))
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<(), GatewayError> {
        self.recorder
            .record("DeleteChannel", &json!({ "ChannelId": channel_id }))
    }

    async fn describe_channel(&self, channel_id: &str) -> Result<ChannelState, GatewayError> {
        self.recorder
            .record("DescribeChannel", &json!({ "ChannelId": channel_id }))?;
        next_state(&self.channel_states, "Channel")
    }

    async fn start_channel(&self, input: &StartChannelInput) -> Result<(), GatewayError> {
        self.recorder.record("StartChannel", input)
    }

    async fn stop_channel(&self, input: &StopChannelInput) -> Result<(), GatewayError> {
        self.recorder.record("StopChannel", input)
    }

    async fn create_input(&self, input: &CreateInputInput) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("CreateInput", input)?;
        Ok(self.issue("input"))
    }

    async fn update_input(&self, input: &UpdateInputInput) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("UpdateInput", input)?;
        Ok(Self::existing("input", input.input_id.as_ref()))
    }

    async fn delete_input(&self, input_id: &str) -> Result<(), GatewayError> {
        self.recorder
            .record("DeleteInput", &json!({ "InputId": input_id }))
    }

    async fn create_input_security_group(
        &self,
        input: &CreateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("CreateInputSecurityGroup", input)?;
        Ok(self.issue("inputSecurityGroup"))
    }

    async fn update_input_security_group(
        &self,
        input: &UpdateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError> {
        self.recorder.record("UpdateInputSecurityGroup", input)?;
        Ok(Self::existing(
            "inputSecurityGroup",
            input.input_security_group_id.as_ref(),
        ))
    }

    async fn delete_input_security_group(&self, group_id: &str) -> Result<(), GatewayError> {
        self.recorder.record(
            "DeleteInputSecurityGroup",
            &json!({ "InputSecurityGroupId": group_id }),
        )
    }
}

// --- MediaConnect ---

#[derive(Default)]
pub struct FakeMediaConnect {
    recorder: Recorder,
    flow_statuses: Mutex<VecDeque<FlowStatus>>,
}

recorded!(FakeMediaConnect);

impl FakeMediaConnect {
    pub fn script_flow_statuses(&self, statuses: impl IntoIterator<Item = FlowStatus>) {
        *lock(&self.flow_statuses) = statuses.into_iter().collect();
    }
}

#[async_trait]
impl MediaConnectApi for FakeMediaConnect {
    async fn create_flow(&self, input: &CreateFlowInput) -> Result<Flow, GatewayError> {
        self.recorder.record("CreateFlow", input)?;
        let name = input.name.as_deref().unwrap_or("flow");
        Ok(Flow {
            flow_arn: format!(
                "arn:aws:mediaconnect:{ACCOUNT}:flow:{}:{name}",
                self.recorder.next_id()
            ),
        })
    }

    async fn delete_flow(&self, flow_arn: &str) -> Result<(), GatewayError> {
        self.recorder
            .record("DeleteFlow", &json!({ "FlowArn": flow_arn }))
    }

    async fn describe_flow(&self, flow_arn: &str) -> Result<FlowStatus, GatewayError> {
        self.recorder
            .record("DescribeFlow", &json!({ "FlowArn": flow_arn }))?;
        next_state(&self.flow_statuses, "Flow")
    }

    async fn start_flow(&self, input: &StartFlowInput) -> Result<(), GatewayError> {
        self.recorder.record("StartFlow", input)
    }

    async fn stop_flow(&self, input: &StopFlowInput) -> Result<(), GatewayError> {
        self.recorder.record("StopFlow", input)
    }
}

// --- MediaStore ---

#[derive(Default)]
pub struct FakeMediaStore {
    recorder: Recorder,
}

recorded!(FakeMediaStore);

#[async_trait]
impl MediaStoreApi for FakeMediaStore {
    async fn describe_container(
        &self,
        input: &DescribeContainerInput,
    ) -> Result<Container, GatewayError> {
        self.recorder.record("DescribeContainer", input)?;
        let name = input.container_name.as_deref().unwrap_or_default();
        Ok(Container {
            arn: format!("arn:aws:mediastore:{ACCOUNT}:container/{name}"),
            endpoint: format!("https://{name}.data.mediastore.us-east-1.amazonaws.com"),
        })
    }
}

/// One fake per service, plus the context that wires them together.
#[derive(Default)]
pub struct FakeServices {
    pub medialive: Arc<FakeMediaLive>,
    pub mediaconnect: Arc<FakeMediaConnect>,
    pub mediastore: Arc<FakeMediaStore>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context backed by these fakes, with the default unbounded poller.
    pub fn services(&self) -> MediaServices {
        MediaServices {
            medialive: self.medialive.clone(),
            mediaconnect: self.mediaconnect.clone(),
            mediastore: self.mediastore.clone(),
            poller: Poller::default(),
        }
    }
}
