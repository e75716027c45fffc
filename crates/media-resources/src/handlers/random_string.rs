//! `Custom::RandomString`
//!
//! Generates a short random identifier, useful for naming other resources.
//! Every Create and Update produces a fresh value.

use super::{map_props, unexpected_request_type};
use crate::api::MediaServices;
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use resource_framework::{
    target_shape, HandlerError, PropertyBag, Request, RequestType, ResourceHandler, Success,
};
use serde_json::json;

pub const RESOURCE_TYPE: &str = "Custom::RandomString";

/// Crockford's base32 alphabet: no I, L, O or U.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
pub const LENGTH: usize = 12;

target_shape! {
    /// Accepts no properties.
    pub struct RandomStringProperties {}
}

pub struct RandomString;

pub fn generate() -> String {
    let mut bytes = [0u8; LENGTH];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
        .collect()
}

#[async_trait]
impl ResourceHandler<MediaServices> for RandomString {
    async fn handle(
        &self,
        request: &Request,
        _services: &MediaServices,
    ) -> Result<Option<Success>, HandlerError> {
        match request.request_type {
            RequestType::Create | RequestType::Update => {
                let _: RandomStringProperties = map_props(&request.resource_properties)?;
                let value = generate();

                let mut data = PropertyBag::new();
                data.insert("String".into(), json!(value));
                Ok(Some(Success::new(value).with_data(data)))
            }
            RequestType::Delete => Ok(None),
            RequestType::Other(_) => Err(unexpected_request_type(request)),
        }
    }
}
