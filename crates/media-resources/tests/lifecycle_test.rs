use media_resources::api::{ChannelState, GatewayLoader, MediaServices};
use media_resources::lifecycle::build_registry;
use media_resources::testing::{request_for, FakeServices};
use resource_framework::mock::{MockTransport, StaticConfig};
use resource_framework::{Coordinator, Response, ResponseStatus};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup() -> (
    Coordinator<MediaServices, StaticConfig<MediaServices>, MockTransport>,
    MockTransport,
    FakeServices,
) {
    let fakes = FakeServices::new();
    let transport = MockTransport::new();
    let coordinator = Coordinator::new(
        Arc::new(build_registry()),
        StaticConfig::new(fakes.services()),
        transport.clone(),
    );
    (coordinator, transport, fakes)
}

fn only_delivery(transport: &MockTransport) -> Response {
    let deliveries = transport.deliveries();
    assert_eq!(deliveries.len(), 1, "expected exactly one delivery");
    let (url, response) = deliveries.into_iter().next().unwrap();
    assert_eq!(url, "https://callback.example.com/signed");
    response
}

#[tokio::test(start_paused = true)]
async fn test_channel_create_waits_then_reports_ids() {
    let (coordinator, transport, fakes) = setup();
    fakes
        .medialive
        .script_channel_states([ChannelState::Creating, ChannelState::Idle]);

    coordinator
        .handle(request_for(
            "Custom::MediaLiveChannel",
            "Create",
            "",
            json!({
                "ServiceToken": "arn:aws:lambda:us-east-1:000000000000:function:handler",
                "Name": "live",
                "ChannelClass": "SINGLE_PIPELINE",
                "InputAttachments": [{ "InputId": "42", "InputAttachmentName": "main" }]
            }),
        ))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Success, "{}", response.reason);
    assert_eq!(response.physical_resource_id, "1000");
    let data = response.data.unwrap();
    assert_eq!(data["Id"], "1000");
    assert_eq!(data["Arn"], "arn:aws:medialive:us-east-1:000000000000:channel:1000");

    let created = fakes.medialive.calls_to("CreateChannel");
    assert_eq!(
        created,
        vec![json!({
            "Name": "live",
            "ChannelClass": "SINGLE_PIPELINE",
            "InputAttachments": [{ "InputId": "42", "InputAttachmentName": "main" }]
        })]
    );
    assert_eq!(fakes.medialive.calls_to("DescribeChannel").len(), 2);
}

#[tokio::test]
async fn test_api_failure_on_create_gets_synthetic_id() {
    let (coordinator, transport, fakes) = setup();
    fakes.medialive.fail(
        "CreateInputSecurityGroup",
        "LimitExceededException: too many security groups",
    );

    coordinator
        .handle(request_for(
            "Custom::MediaLiveInputSecurityGroup",
            "Create",
            "",
            json!({ "WhitelistRules": [{ "Cidr": "10.0.0.0/16" }] }),
        ))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(
        response.reason,
        "LimitExceededException: too many security groups"
    );
    assert!(response.physical_resource_id.starts_with("failed/"));
}

#[tokio::test]
async fn test_delete_of_never_created_resource_touches_nothing() {
    let (coordinator, transport, fakes) = setup();

    coordinator
        .handle(request_for(
            "Custom::MediaLiveChannel",
            "Delete",
            "failed/00112233445566778899aabbccddeeff",
            json!({ "Name": "live" }),
        ))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(response.reason, "Resource was never created.");
    assert_eq!(
        response.physical_resource_id,
        "failed/00112233445566778899aabbccddeeff"
    );
    assert!(fakes.medialive.calls().is_empty());
}

#[tokio::test]
async fn test_unregistered_type_fails() {
    let (coordinator, transport, _fakes) = setup();

    coordinator
        .handle(request_for("Custom::MediaPackageChannel", "Create", "", json!({})))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(response.reason, "Invalid custom resource type.");
    assert!(response.physical_resource_id.starts_with("failed/"));
}

#[tokio::test]
async fn test_unsupported_property_fails_before_any_call() {
    let (coordinator, transport, fakes) = setup();

    coordinator
        .handle(request_for(
            "Custom::MediaConnectFlow",
            "Create",
            "",
            json!({ "Name": "contribution", "Source": { "Name": "in", "Colour": "red" } }),
        ))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert!(
        response.reason.starts_with("Unsupported property: Colour"),
        "{}",
        response.reason
    );
    assert!(fakes.mediaconnect.calls().is_empty());
}

#[tokio::test]
async fn test_container_description_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mediastore/DescribeContainer"))
        .and(body_json(json!({ "ContainerName": "media" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Container": {
                "ARN": "arn:aws:mediastore:eu-west-1:000000000000:container/media",
                "Endpoint": "https://abc.data.mediastore.eu-west-1.amazonaws.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = server.uri();
    let loader = GatewayLoader::with_lookup(move |key| match key {
        "PROVISIONING_ENDPOINT" => Some(endpoint.clone()),
        "PROVISIONING_REGION" => Some("eu-west-1".to_string()),
        _ => None,
    });
    let transport = MockTransport::new();
    let coordinator = Coordinator::new(Arc::new(build_registry()), loader, transport.clone());

    coordinator
        .handle(request_for(
            "Custom::MediaStoreContainerDescription",
            "Create",
            "",
            json!({ "ServiceToken": "arn:token", "ContainerName": "media" }),
        ))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Success, "{}", response.reason);
    assert_eq!(
        response.physical_resource_id,
        "MediaStoreContainerDescription/arn:aws:mediastore:eu-west-1:000000000000:container/media"
    );
    assert_eq!(
        response.data.unwrap()["Endpoint"],
        "https://abc.data.mediastore.eu-west-1.amazonaws.com"
    );
}

#[tokio::test]
async fn test_missing_gateway_endpoint_fails_the_request() {
    let transport = MockTransport::new();
    let coordinator = Coordinator::new(
        Arc::new(build_registry()),
        GatewayLoader::with_lookup(|_| None),
        transport.clone(),
    );

    coordinator
        .handle(request_for("Custom::RandomString", "Delete", "ABC", json!({})))
        .await;

    let response = only_delivery(&transport);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(
        response.reason,
        "missing environment variable PROVISIONING_ENDPOINT"
    );
    assert_eq!(response.physical_resource_id, "ABC");
}
