//! `Custom::MediaLiveInput`
//!
//! An input's `Type` cannot be changed in place. An Update that changes it
//! creates a replacement input; the controller then deletes the old one
//! because the physical id changed.

use super::{arn_and_id, map_props, unexpected_request_type};
use crate::api::MediaServices;
use crate::model::medialive::{CreateInputInput, UpdateInputInput};
use async_trait::async_trait;
use resource_framework::{HandlerError, PropertyBag, Request, RequestType, ResourceHandler, Success};
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::MediaLiveInput";

/// Properties whose change forces a replacement.
const REPLACEMENT_KEYS: &[&str] = &["Type"];

pub struct MediaLiveInput;

impl MediaLiveInput {
    async fn create(
        props: &PropertyBag,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        let input: CreateInputInput = map_props(props)?;
        let created = services.medialive.create_input(&input).await?;
        info!(input_id = %created.id, "Created input");
        Ok(Some(Success::new(created.id.clone()).with_data(arn_and_id(&created))))
    }
}

#[async_trait]
impl ResourceHandler<MediaServices> for MediaLiveInput {
    async fn handle(
        &self,
        request: &Request,
        services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create => Self::create(&request.resource_properties, services).await,
            RequestType::Update => {
                let mut needs_replacement = false;
                let mut update_props = PropertyBag::new();
                for (key, value) in &request.resource_properties {
                    if REPLACEMENT_KEYS.contains(&key.as_str()) {
                        if request.old_resource_properties.get(key) != Some(value) {
                            needs_replacement = true;
                        }
                    } else {
                        update_props.insert(key.clone(), value.clone());
                    }
                }

                if needs_replacement {
                    info!(input_id = %request.physical_resource_id, "Input type changed, replacing");
                    return Self::create(&request.resource_properties, services).await;
                }

                let mut input: UpdateInputInput = map_props(&update_props)?;
                input.input_id = Some(request.physical_resource_id.clone());
                let updated = services.medialive.update_input(&input).await?;
                Ok(Some(Success::new(updated.id.clone()).with_data(arn_and_id(&updated))))
            }
            RequestType::Delete => {
                services
                    .medialive
                    .delete_input(&request.physical_resource_id)
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

    fn update(old: serde_json::Value, new: serde_json::Value) -> Request {
        let mut request = request("Update", "555", new);
        request.old_resource_properties = old.as_object().cloned().unwrap_or_default();
        request
    }

    #[tokio::test]
    async fn test_create_sends_type() {
        let fakes = FakeServices::new();

        let success = MediaLiveInput
            .handle(
                &request(
                    "Create",
                    "",
                    json!({ "Name": "in", "Type": "RTMP_PUSH", "Destinations": [{ "StreamName": "live/a" }] }),
                ),
                &fakes.services(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(success.physical_resource_id, "1000");
        let body = &fakes.medialive.calls_to("CreateInput")[0];
        assert_eq!(body["Type"], "RTMP_PUSH");
        assert_eq!(body["Destinations"], json!([{ "StreamName": "live/a" }]));
    }

    #[tokio::test]
    async fn test_update_with_same_type_updates_in_place() {
        let fakes = FakeServices::new();

        let success = MediaLiveInput
            .handle(
                &update(
                    json!({ "Name": "in", "Type": "RTMP_PUSH" }),
                    json!({ "Name": "renamed", "Type": "RTMP_PUSH", "ServiceToken": "arn:token" }),
                ),
                &fakes.services(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(success.physical_resource_id, "555");
        assert!(fakes.medialive.calls_to("CreateInput").is_empty());
        let body = &fakes.medialive.calls_to("UpdateInput")[0];
        assert_eq!(body["InputId"], "555");
        assert_eq!(body["Name"], "renamed");
        assert!(body.get("Type").is_none());
    }

    #[tokio::test]
    async fn test_update_with_changed_type_replaces() {
        let fakes = FakeServices::new();

        let success = MediaLiveInput
            .handle(
                &update(
                    json!({ "Name": "in", "Type": "RTMP_PUSH" }),
                    json!({ "Name": "in", "Type": "RTP_PUSH" }),
                ),
                &fakes.services(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(success.physical_resource_id, "1000");
        assert!(fakes.medialive.calls_to("UpdateInput").is_empty());
        assert_eq!(fakes.medialive.calls_to("CreateInput")[0]["Type"], "RTP_PUSH");
    }

    #[tokio::test]
    async fn test_update_adding_type_replaces() {
        let fakes = FakeServices::new();

        MediaLiveInput
            .handle(
                &update(json!({ "Name": "in" }), json!({ "Name": "in", "Type": "URL_PULL" })),
                &fakes.services(),
            )
            .await
            .unwrap();

        assert_eq!(fakes.medialive.calls_to("CreateInput").len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let fakes = FakeServices::new();

        let result = MediaLiveInput
            .handle(&request("Delete", "555", json!({})), &fakes.services())
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(
            fakes.medialive.calls_to("DeleteInput"),
            vec![json!({ "InputId": "555" })]
        );
    }
}
