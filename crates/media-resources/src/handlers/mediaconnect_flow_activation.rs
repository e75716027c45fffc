//! `Custom::MediaConnectFlowActivation`

use super::{map_props, required, unexpected_request_type, wait_for_flow_status};
use crate::api::{FlowStatus, MediaServices};
use crate::model::mediaconnect::{StartFlowInput, StopFlowInput};
use async_trait::async_trait;
use resource_framework::{HandlerError, Request, RequestType, ResourceHandler, Success};
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::MediaConnectFlowActivation";

pub struct MediaConnectFlowActivation;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaConnectFlowActivation {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create | RequestType::Update => {
                let input: StartFlowInput = map_props(&request.resource_properties)?;
                let flow_arn = required(&input.flow_arn, "FlowArn")?;

                services.mediaconnect.start_flow(&input).await?;
                info!(flow_arn, "Starting flow");
                wait_for_flow_status(services, flow_arn, FlowStatus::Active, &[FlowStatus::Starting])
                    .await?;
                Ok(Some(Success::new(format!("{flow_arn}/activation"))))
            }
            RequestType::Delete => {
                let input: StopFlowInput = map_props(&request.resource_properties)?;
                let flow_arn = required(&input.flow_arn, "FlowArn")?;

                services.mediaconnect.stop_flow(&input).await?;
                info!(flow_arn, "Stopping flow");
                wait_for_flow_status(services, flow_arn, FlowStatus::Standby, &[FlowStatus::Stopping])
                    .await?;
                Ok(None)
            }
            RequestType::Other(_) => Err(unexpected_request_type(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{request, FakeServices};
    use serde_json::json;

    const ARN: &str = "arn:aws:mediaconnect:us-east-1:000000000000:flow:1:contribution";

    #[tokio::test(start_paused = true)]
    async fn test_activation_lifecycle() {
        let fakes = FakeServices::new();
        let services = fakes.services();

        fakes
            .mediaconnect
            .script_flow_statuses([FlowStatus::Starting, FlowStatus::Starting, FlowStatus::Active]);
        let success = MediaConnectFlowActivation
            .handle(&request("Create", "", json!({ "FlowArn": ARN })), &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(success.physical_resource_id, format!("{ARN}/activation"));
        assert_eq!(fakes.mediaconnect.calls_to("DescribeFlow").len(), 3);

        fakes
            .mediaconnect
            .script_flow_statuses([FlowStatus::Stopping, FlowStatus::Standby]);
        let result = MediaConnectFlowActivation
            .handle(
                &request("Delete", &success.physical_resource_id, json!({ "FlowArn": ARN })),
                &services,
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(
            fakes.mediaconnect.calls_to("StopFlow"),
            vec![json!({ "FlowArn": ARN })]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_status_is_unexpected() {
        let fakes = FakeServices::new();
        fakes
            .mediaconnect
            .script_flow_statuses([FlowStatus::Starting, FlowStatus::Error]);

        let err = MediaConnectFlowActivation
            .handle(&request("Create", "", json!({ "FlowArn": ARN })), &fakes.services())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Flow reached unexpected state: ERROR");
    }

    #[tokio::test(start_paused = true)]
    async fn test_opt_in_timeout_bounds_the_wait() {
        let fakes = FakeServices::new();
        fakes.mediaconnect.script_flow_statuses([FlowStatus::Starting]);
        let mut services = fakes.services();
        services.poller = services.poller.with_timeout(std::time::Duration::from_secs(60));

        let err = MediaConnectFlowActivation
            .handle(&request("Create", "", json!({ "FlowArn": ARN })), &services)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Flow did not reach ACTIVE within 60s");
    }
}
