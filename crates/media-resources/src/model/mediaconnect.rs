//! MediaConnect request shapes.

use resource_framework::target_shape;
use serde::Serialize;

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CreateFlowInput {
        pub availability_zone: Option<String>,
        pub entitlements: Option<Vec<GrantEntitlementRequest>>,
        pub name: Option<String>,
        pub outputs: Option<Vec<AddOutputRequest>>,
        pub source: Option<SetSourceRequest>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct StartFlowInput {
        pub flow_arn: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct StopFlowInput {
        pub flow_arn: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct AddOutputRequest {
        pub cidr_allow_list: Option<Vec<String>>,
        pub description: Option<String>,
        pub destination: Option<String>,
        pub encryption: Option<Encryption>,
        pub max_latency: Option<i64>,
        pub name: Option<String>,
        pub port: Option<i64>,
        pub protocol: Option<String>,
        pub remote_id: Option<String>,
        pub smoothing_latency: Option<i64>,
        pub stream_id: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct SetSourceRequest {
        pub decryption: Option<Encryption>,
        pub description: Option<String>,
        pub entitlement_arn: Option<String>,
        pub ingest_port: Option<i64>,
        pub max_bitrate: Option<i64>,
        pub max_latency: Option<i64>,
        pub name: Option<String>,
        pub protocol: Option<String>,
        pub stream_id: Option<String>,
        pub whitelist_cidr: Option<String>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct GrantEntitlementRequest {
        pub data_transfer_subscriber_fee_percent: Option<i64>,
        pub description: Option<String>,
        pub encryption: Option<Encryption>,
        pub name: Option<String>,
        pub subscribers: Option<Vec<String>>,
    }
}

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Encryption {
        pub algorithm: Option<String>,
        pub constant_initialization_vector: Option<String>,
        pub device_id: Option<String>,
        pub key_type: Option<String>,
        pub region: Option<String>,
        pub resource_id: Option<String>,
        pub role_arn: Option<String>,
        pub secret_arn: Option<String>,
        pub url: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::mapper::reshape_props;
    use serde_json::json;

    #[test]
    fn test_flow_ports_accept_strings_and_numbers() {
        // Template engines often stringify numbers.
        let props = json!({
            "Name": "contribution",
            "Source": { "Name": "in", "Protocol": "zixi-push", "IngestPort": "2088", "WhitelistCidr": "10.0.0.0/8" },
            "Outputs": [
                { "Name": "out", "Protocol": "rtp", "Destination": "10.1.1.1", "Port": 5000 }
            ]
        });

        let mut input = CreateFlowInput::default();
        reshape_props(props.as_object().unwrap(), &mut input).unwrap();

        let source = input.source.unwrap();
        assert_eq!(source.ingest_port, Some(2088));
        assert_eq!(source.whitelist_cidr.as_deref(), Some("10.0.0.0/8"));
        let outputs = input.outputs.unwrap();
        assert_eq!(outputs[0].port, Some(5000));
        assert!(outputs[0].encryption.is_none());
        assert!(input.entitlements.is_none());
    }

    #[test]
    fn test_unparseable_port_leaves_allocated_default() {
        let props = json!({ "Source": { "IngestPort": "any" } });
        let mut input = CreateFlowInput::default();
        reshape_props(props.as_object().unwrap(), &mut input).unwrap();
        assert_eq!(input.source.unwrap().ingest_port, Some(0));
    }
}
