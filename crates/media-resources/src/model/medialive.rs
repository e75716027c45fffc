//! MediaLive request shapes.
//!
//! `EncoderSettings`, `InputSettings` and `Tags` are free-form provider
//! documents and are copied through unvalidated.

use resource_framework::target_shape;
use serde::Serialize;
use serde_json::Value;

// --- Channels ---

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CreateChannelInput {
        pub channel_class: Option<String>,
        pub destinations: Option<Vec<OutputDestination>>,
        pub encoder_settings: Option<Value>,
        pub input_attachments: Option<Vec<InputAttachment>>,
        pub input_specification: Option<InputSpecification>,
        pub log_level: Option<String>,
        pub name: Option<String>,
        pub request_id: Option<String>,
        pub role_arn: Option<String>,
        pub tags: Option<Value>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct UpdateChannelInput {
        pub channel_id: Option<String>,
        pub destinations: Option<Vec<OutputDestination>>,
        pub encoder_settings: Option<Value>,
        pub input_attachments: Option<Vec<InputAttachment>>,
        pub input_specification: Option<InputSpecification>,
        pub log_level: Option<String>,
        pub name: Option<String>,
        pub role_arn: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct StartChannelInput {
        pub channel_id: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct StopChannelInput {
        pub channel_id: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct OutputDestination {
        pub id: Option<String>,
        pub media_package_settings: Option<Vec<MediaPackageOutputDestinationSettings>>,
        pub settings: Option<Vec<OutputDestinationSettings>>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct MediaPackageOutputDestinationSettings {
        pub channel_id: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct OutputDestinationSettings {
        pub password_param: Option<String>,
        pub stream_name: Option<String>,
        pub url: Option<String>,
        pub username: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputAttachment {
        pub input_attachment_name: Option<String>,
        pub input_id: Option<String>,
        pub input_settings: Option<Value>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputSpecification {
        pub codec: Option<String>,
        pub maximum_bitrate: Option<String>,
        pub resolution: Option<String>,
    }
}

// --- Inputs ---

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CreateInputInput {
        pub destinations: Option<Vec<InputDestinationRequest>>,
        pub input_security_groups: Option<Vec<String>>,
        pub media_connect_flows: Option<Vec<MediaConnectFlowRequest>>,
        pub name: Option<String>,
        pub request_id: Option<String>,
        pub role_arn: Option<String>,
        pub sources: Option<Vec<InputSourceRequest>>,
        pub tags: Option<Value>,
        #[serde(rename = "Type")]
        pub input_type = "Type": Option<String>,
        pub vpc: Option<InputVpcRequest>,
    }
}

target_shape! {
    /// Same as [`CreateInputInput`] minus the fields that force a replacement.
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct UpdateInputInput {
        pub destinations: Option<Vec<InputDestinationRequest>>,
        pub input_id: Option<String>,
        pub input_security_groups: Option<Vec<String>>,
        pub media_connect_flows: Option<Vec<MediaConnectFlowRequest>>,
        pub name: Option<String>,
        pub role_arn: Option<String>,
        pub sources: Option<Vec<InputSourceRequest>>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputDestinationRequest {
        pub stream_name: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct MediaConnectFlowRequest {
        pub flow_arn: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputSourceRequest {
        pub password_param: Option<String>,
        pub url: Option<String>,
        pub username: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputVpcRequest {
        pub security_group_ids: Option<Vec<String>>,
        pub subnet_ids: Option<Vec<String>>,
    }
}

// --- Input security groups ---

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CreateInputSecurityGroupInput {
        pub tags: Option<Value>,
        pub whitelist_rules: Option<Vec<InputWhitelistRuleCidr>>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct UpdateInputSecurityGroupInput {
        pub input_security_group_id: Option<String>,
        pub tags: Option<Value>,
        pub whitelist_rules: Option<Vec<InputWhitelistRuleCidr>>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct InputWhitelistRuleCidr {
        pub cidr: Option<String>,
    }
}
