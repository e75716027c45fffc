//! `Custom::MediaConnectFlow`
//!
//! Flows cannot be modified after creation, so an Update creates a new flow
//! and the physical id (the flow ARN) changes.

use super::{map_props, unexpected_request_type};
use crate::api::MediaServices;
use crate::model::mediaconnect::CreateFlowInput;
use async_trait::async_trait;
use resource_framework::{HandlerError, PropertyBag, Request, RequestType, ResourceHandler, Success};
use serde_json::json;
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::MediaConnectFlow";

pub struct MediaConnectFlow;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaConnectFlow {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create | RequestType::Update => {
                let input: CreateFlowInput = map_props(&request.resource_properties)?;
                let flow = services.mediaconnect.create_flow(&input).await?;
                info!(flow_arn = %flow.flow_arn, "Created flow");

                let mut data = PropertyBag::new();
                data.insert("Arn".into(), json!(flow.flow_arn));
                Ok(Some(Success::new(flow.flow_arn).with_data(data)))
            }
            RequestType::Delete => {
                services
                    .mediaconnect
                    .delete_flow(&request.physical_resource_id)
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

    #[tokio::test]
    async fn test_update_creates_a_new_flow() {
        let fakes = FakeServices::new();
        let services = fakes.services();
        let props = json!({ "Name": "contribution", "Source": { "Name": "in", "Protocol": "rtp" } });

        let first = MediaConnectFlow
            .handle(&request("Create", "", props.clone()), &services)
            .await
            .unwrap()
            .unwrap();
        let second = MediaConnectFlow
            .handle(&request("Update", &first.physical_resource_id, props), &services)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(first.physical_resource_id, second.physical_resource_id);
        assert_eq!(
            second.data.unwrap()["Arn"],
            json!(second.physical_resource_id)
        );
        assert_eq!(fakes.mediaconnect.calls_to("CreateFlow").len(), 2);
        assert!(fakes.mediaconnect.calls_to("DeleteFlow").is_empty());
    }

    #[tokio::test]
    async fn test_delete_uses_physical_arn() {
        let fakes = FakeServices::new();
        let arn = "arn:aws:mediaconnect:us-east-1:000000000000:flow:1:contribution";

        MediaConnectFlow
            .handle(&request("Delete", arn, json!({})), &fakes.services())
            .await
            .unwrap();

        assert_eq!(
            fakes.mediaconnect.calls_to("DeleteFlow"),
            vec![json!({ "FlowArn": arn })]
        );
    }
}
