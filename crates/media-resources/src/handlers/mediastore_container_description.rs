//! `Custom::MediaStoreContainerDescription`
//!
//! Read-only: exposes an existing container's ARN and endpoint as outputs.

use super::{map_props, unexpected_request_type};
use crate::api::MediaServices;
use crate::model::mediastore::DescribeContainerInput;
use async_trait::async_trait;
use resource_framework::{HandlerError, PropertyBag, Request, RequestType, ResourceHandler, Success};
use serde_json::json;

pub const RESOURCE_TYPE: &str = "Custom::MediaStoreContainerDescription";

pub struct MediaStoreContainerDescription;

#[async_trait]
impl ResourceHandler<MediaServices> for MediaStoreContainerDescription {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create | RequestType::Update => {
                let input: DescribeContainerInput = map_props(&request.resource_properties)?;
                let container = services.mediastore.describe_container(&input).await?;

                let mut data = PropertyBag::new();
                data.insert("Arn".into(), json!(container.arn));
                data.insert("Endpoint".into(), json!(container.endpoint));
                Ok(Some(
                    Success::new(format!("MediaStoreContainerDescription/{}", container.arn))
                        .with_data(data),
                ))
            }
            RequestType::Delete => Ok(None),
            RequestType::Other(_) => Err(unexpected_request_type(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{request, FakeServices};

    #[tokio::test]
    async fn test_describe_outputs() {
        let fakes = FakeServices::new();

        let success = MediaStoreContainerDescription
            .handle(
                &request("Create", "", json!({ "ContainerName": "media" })),
                &fakes.services(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            success.physical_resource_id,
            "MediaStoreContainerDescription/arn:aws:mediastore:us-east-1:000000000000:container/media"
        );
        let data = success.data.unwrap();
        assert_eq!(
            data["Endpoint"],
            "https://media.data.mediastore.us-east-1.amazonaws.com"
        );
    }

    #[tokio::test]
    async fn test_delete_is_a_no_op() {
        let fakes = FakeServices::new();
        let result = MediaStoreContainerDescription
            .handle(
                &request("Delete", "MediaStoreContainerDescription/arn", json!({})),
                &fakes.services(),
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(fakes.mediastore.calls().is_empty());
    }
}
