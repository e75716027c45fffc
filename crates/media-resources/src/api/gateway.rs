//! HTTP gateway to the provisioning API.
//!
//! Every operation is a JSON `POST {endpoint}/{service}/{operation}`. The
//! request body is the target shape in the provider's PascalCase with unset
//! fields left out; responses mirror the provider's output documents
//! (`{"Channel": {...}}`, `{"Flow": {...}}`, ...).

use super::{
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
use resource_framework::{ConfigError, ConfigLoader, Poller};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_REGION: &str = "us-east-1";
const REGION_HEADER: &str = "x-provisioning-region";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the provisioning API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub region: String,
    /// Opt-in deadline for state polling. Unset means wait indefinitely.
    pub poll_timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get("PROVISIONING_ENDPOINT")
            .ok_or(ConfigError::Missing("PROVISIONING_ENDPOINT"))?
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "PROVISIONING_ENDPOINT",
                "an http:// or https:// URL",
            ));
        }

        let region = get("PROVISIONING_REGION")
            .or_else(|| get("AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let poll_timeout = match get("PROVISIONING_POLL_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::Invalid(
                        "PROVISIONING_POLL_TIMEOUT_SECS",
                        "a positive number of seconds",
                    ))?,
            ),
            None => None,
        };

        Ok(Self {
            endpoint,
            token: get("PROVISIONING_TOKEN"),
            region,
            poll_timeout,
        })
    }

    pub fn poller(&self) -> Poller {
        match self.poll_timeout {
            Some(timeout) => Poller::default().with_timeout(timeout),
            None => Poller::default(),
        }
    }
}

/// `reqwest`-backed implementation of every service trait.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    region: String,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            region: config.region.clone(),
        })
    }

    async fn call<I, O>(&self, service: &str, operation: &str, input: &I) -> Result<O, GatewayError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = format!("{}/{service}/{operation}", self.endpoint);
        let body = to_wire(input)?;

        debug!(service, operation, "Calling provisioning API");
        let mut request = self
            .client
            .post(&url)
            .header(REGION_HEADER, &self.region)
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &bytes),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            Ok(serde_json::from_value(Value::Object(Default::default()))?)
        } else {
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}

/// Prefer the provider's `Message` field; fall back to the raw body.
fn error_message(status: u16, body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "message")]
        #[serde(rename = "Message")]
        message: Option<String>,
    }

    if let Ok(ErrorBody { message: Some(m) }) = serde_json::from_slice::<ErrorBody>(body) {
        if !m.is_empty() {
            return m;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("provisioning API returned HTTP {status}")
    } else {
        text
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChannelOutput {
    channel: ResourceRef,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeChannelOutput {
    state: ChannelState,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InputOutput {
    input: ResourceRef,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroupOutput {
    security_group: ResourceRef,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FlowOutput {
    flow: Flow,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FlowStatusOutput {
    flow: FlowStatusBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FlowStatusBody {
    status: FlowStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerOutput {
    container: Container,
}

#[async_trait]
impl MediaLiveApi for GatewayClient {
    async fn create_channel(&self, input: &CreateChannelInput) -> Result<ResourceRef, GatewayError> {
        let out: ChannelOutput = self.call("medialive", "CreateChannel", input).await?;
        Ok(out.channel)
    }

    async fn update_channel(&self, input: &UpdateChannelInput) -> Result<ResourceRef, GatewayError> {
        let out: ChannelOutput = self.call("medialive", "UpdateChannel", input).await?;
        Ok(out.channel)
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .call("medialive", "DeleteChannel", &json!({ "ChannelId": channel_id }))
            .await?;
        Ok(())
    }

    async fn describe_channel(&self, channel_id: &str) -> Result<ChannelState, GatewayError> {
        let out: DescribeChannelOutput = self
            .call("medialive", "DescribeChannel", &json!({ "ChannelId": channel_id }))
            .await?;
        Ok(out.state)
    }

    async fn start_channel(&self, input: &StartChannelInput) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.call("medialive", "StartChannel", input).await?;
        Ok(())
    }

    async fn stop_channel(&self, input: &StopChannelInput) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.call("medialive", "StopChannel", input).await?;
        Ok(())
    }

    async fn create_input(&self, input: &CreateInputInput) -> Result<ResourceRef, GatewayError> {
        let out: InputOutput = self.call("medialive", "CreateInput", input).await?;
        Ok(out.input)
    }

    async fn update_input(&self, input: &UpdateInputInput) -> Result<ResourceRef, GatewayError> {
        let out: InputOutput = self.call("medialive", "UpdateInput", input).await?;
        Ok(out.input)
    }

    async fn delete_input(&self, input_id: &str) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .call("medialive", "DeleteInput", &json!({ "InputId": input_id }))
            .await?;
        Ok(())
    }

    async fn create_input_security_group(
        &self,
        input: &CreateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError> {
        let out: SecurityGroupOutput = self
            .call("medialive", "CreateInputSecurityGroup", input)
            .await?;
        Ok(out.security_group)
    }

    async fn update_input_security_group(
        &self,
        input: &UpdateInputSecurityGroupInput,
    ) -> Result<ResourceRef, GatewayError> {
        let out: SecurityGroupOutput = self
            .call("medialive", "UpdateInputSecurityGroup", input)
            .await?;
        Ok(out.security_group)
    }

    async fn delete_input_security_group(&self, group_id: &str) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .call(
                "medialive",
                "DeleteInputSecurityGroup",
                &json!({ "InputSecurityGroupId": group_id }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MediaConnectApi for GatewayClient {
    async fn create_flow(&self, input: &CreateFlowInput) -> Result<Flow, GatewayError> {
        let out: FlowOutput = self.call("mediaconnect", "CreateFlow", input).await?;
        Ok(out.flow)
    }

    async fn delete_flow(&self, flow_arn: &str) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .call("mediaconnect", "DeleteFlow", &json!({ "FlowArn": flow_arn }))
            .await?;
        Ok(())
    }

    async fn describe_flow(&self, flow_arn: &str) -> Result<FlowStatus, GatewayError> {
        let out: FlowStatusOutput = self
            .call("mediaconnect", "DescribeFlow", &json!({ "FlowArn": flow_arn }))
            .await?;
        Ok(out.flow.status)
    }

    async fn start_flow(&self, input: &StartFlowInput) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.call("mediaconnect", "StartFlow", input).await?;
        Ok(())
    }

    async fn stop_flow(&self, input: &StopFlowInput) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.call("mediaconnect", "StopFlow", input).await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStoreApi for GatewayClient {
    async fn describe_container(
        &self,
        input: &DescribeContainerInput,
    ) -> Result<Container, GatewayError> {
        let out: ContainerOutput = self.call("mediastore", "DescribeContainer", input).await?;
        Ok(out.container)
    }
}

/// Reads [`GatewayConfig`] and builds a fresh client on every invocation.
#[derive(Clone)]
pub struct GatewayLoader {
    lookup: Arc<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl GatewayLoader {
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

#[async_trait]
impl ConfigLoader<MediaServices> for GatewayLoader {
    async fn load(&self) -> Result<MediaServices, Box<dyn std::error::Error + Send + Sync>> {
        let config = GatewayConfig::from_lookup(|key| (self.lookup)(key))?;
        debug!(endpoint = %config.endpoint, region = %config.region, "Loaded gateway configuration");
        let client = GatewayClient::new(&config)?;
        Ok(MediaServices::from_gateway(Arc::new(client), config.poller()))
    }
}
