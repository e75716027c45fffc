//! `Custom::MediaLiveInputSecurityGroup`

use super::{arn_and_id, map_props, unexpected_request_type};
use crate::api::MediaServices;
use crate::model::medialive::{CreateInputSecurityGroupInput, UpdateInputSecurityGroupInput};
use async_trait::async_trait;
use resource_framework::{HandlerError, Request, RequestType, ResourceHandler, Success};

pub const RESOURCE_TYPE: &str = "Custom::MediaLiveInputSecurityGroup";

pub struct MediaLiveInputSecurityGroup;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaLiveInputSecurityGroup {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create => {
                let input: CreateInputSecurityGroupInput = map_props(&request.resource_properties)?;
                let group = services.medialive.create_input_security_group(&input).await?;
                Ok(Some(Success::new(group.id.clone()).with_data(arn_and_id(&group))))
            }
            RequestType::Update => {
                let mut input: UpdateInputSecurityGroupInput =
                    map_props(&request.resource_properties)?;
                input.input_security_group_id = Some(request.physical_resource_id.clone());
                let group = services.medialive.update_input_security_group(&input).await?;
                Ok(Some(Success::new(group.id.clone()).with_data(arn_and_id(&group))))
            }
            RequestType::Delete => {
                services
                    .medialive
                    .delete_input_security_group(&request.physical_resource_id)
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

    #[tokio::test]
    async fn test_lifecycle() {
        let fakes = FakeServices::new();
        let services = fakes.services();
        let rules = json!({ "WhitelistRules": [{ "Cidr": "10.0.0.0/16" }, { "Cidr": "192.168.0.0/24" }] });

        let created = MediaLiveInputSecurityGroup
            .handle(&request("Create", "", rules.clone()), &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.physical_resource_id, "1000");
        assert_eq!(
            created.data.unwrap()["Arn"],
            "arn:aws:medialive:us-east-1:000000000000:inputSecurityGroup:1000"
        );

        let updated = MediaLiveInputSecurityGroup
            .handle(&request("Update", "1000", rules), &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.physical_resource_id, "1000");
        let body = &fakes.medialive.calls_to("UpdateInputSecurityGroup")[0];
        assert_eq!(body["InputSecurityGroupId"], "1000");
        assert_eq!(body["WhitelistRules"][1]["Cidr"], "192.168.0.0/24");

        let deleted = MediaLiveInputSecurityGroup
            .handle(&request("Delete", "1000", json!({})), &services)
            .await
            .unwrap();
        assert!(deleted.is_none());
        assert_eq!(
            fakes.medialive.calls_to("DeleteInputSecurityGroup"),
            vec![json!({ "InputSecurityGroupId": "1000" })]
        );
    }

    #[tokio::test]
    async fn test_misspelled_rule_key() {
        let fakes = FakeServices::new();
        let err = MediaLiveInputSecurityGroup
            .handle(
                &request("Create", "", json!({ "WhitelistRules": [{ "CIDR": "10.0.0.0/16" }] })),
                &fakes.services(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported property: CIDR in .WhitelistRules[0]");
    }
}
