//! # Wire Messages
//!
//! The request a provisioning controller sends to the handler, the response
//! delivered back to its callback address, and the [`Success`] value handlers
//! return in between.
//!
//! Field names follow the controller's JSON contract (`RequestType`,
//! `ResponseURL`, `PhysicalResourceId`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// Dynamically-typed keyed map used for inbound properties and outbound data.
pub type PropertyBag = Map<String, Value>;

/// Reserved self-reference key, stripped before mapping.
pub const SERVICE_TOKEN_KEY: &str = "ServiceToken";

/// Prefix of the placeholder id assigned when a Create fails before anything exists.
pub const FAILED_ID_PREFIX: &str = "failed/";

/// Operation kind of a [`Request`].
///
/// Unknown kinds deserialize into [`RequestType::Other`] so the invocation can
/// still be answered with a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Other(String),
}

/// A missing kind decodes as an empty [`RequestType::Other`].
impl Default for RequestType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for RequestType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "Create" => Self::Create,
            "Update" => Self::Update,
            "Delete" => Self::Delete,
            _ => Self::Other(kind),
        }
    }
}

impl From<RequestType> for String {
    fn from(kind: RequestType) -> Self {
        kind.to_string()
    }
}

impl Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("Create"),
            Self::Update => f.write_str("Update"),
            Self::Delete => f.write_str("Delete"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// One lifecycle operation on one logical resource.
///
/// Only `ResponseURL` is required: without it no response can be delivered.
/// Every other field decodes leniently (absent strings become empty, a `null`
/// property bag becomes an empty one) so the request can still be answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    #[serde(default)]
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    #[serde(default)]
    pub stack_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub logical_resource_id: String,
    /// Empty until the first successful Create.
    #[serde(default)]
    pub physical_resource_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resource_properties: PropertyBag,
    /// Only populated on Update.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub old_resource_properties: PropertyBag,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PropertyBag, D::Error> {
    Ok(Option::<PropertyBag>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// True when the physical id was synthesized by a previously failed Create.
    pub fn is_synthetic_failure(&self) -> bool {
        self.physical_resource_id.starts_with(FAILED_ID_PREFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

impl Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

/// The outcome reported to the callback address, exactly one per [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: ResponseStatus,
    #[serde(default)]
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_echo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PropertyBag>,
}

impl Response {
    /// A successful response that mirrors the identifiers of `request`.
    pub fn for_request(request: &Request) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: String::new(),
            physical_resource_id: request.physical_resource_id.clone(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            no_echo: false,
            data: None,
        }
    }
}

/// What a handler returns when it succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Success {
    pub physical_resource_id: String,
    pub data: Option<PropertyBag>,
    pub no_echo: bool,
}

impl Success {
    pub fn new(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: PropertyBag) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_no_echo(mut self) -> Self {
        self.no_echo = true;
        self
    }
}
