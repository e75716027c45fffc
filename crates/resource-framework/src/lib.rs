//! # Resource Framework
//!
//! Building blocks for custom-resource handlers: processes that receive one
//! lifecycle request (Create, Update or Delete) from a provisioning
//! controller, perform it against an external API, and report the outcome to
//! a callback address.
//!
//! ## Architecture Overview
//!
//! 1. **Handler Layer** ([`ResourceHandler`]) - per-resource-kind business logic
//! 2. **Mapping Layer** ([`mapper`], [`target_shape!`]) - untyped properties into typed API inputs
//! 3. **Coordination Layer** ([`Coordinator`]) - dispatch, panic containment, finalisation
//! 4. **Delivery Layer** ([`CallbackTransport`]) - the single outbound response
//!
//! Handlers only ever return `Ok` or `Err`. Everything the controller sees is
//! produced by the coordinator, which guarantees exactly one delivered
//! response per request regardless of how the handler ends: success, error
//! or panic.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use resource_framework::mapper::reshape_props;
//! use resource_framework::mock::{MockTransport, StaticConfig};
//! use resource_framework::{
//!     target_shape, Coordinator, HandlerError, HandlerRegistry, Request, ResourceHandler,
//!     ResponseStatus, Success,
//! };
//! use std::sync::Arc;
//!
//! target_shape! {
//!     pub struct BucketInput {
//!         pub name: Option<String>,
//!     }
//! }
//!
//! struct Bucket;
//!
//! #[async_trait]
//! impl ResourceHandler<()> for Bucket {
//!     async fn handle(&self, request: &Request, _: &()) -> Result<Option<Success>, HandlerError> {
//!         let mut input = BucketInput::default();
//!         reshape_props(&request.resource_properties, &mut input)?;
//!         Ok(Some(Success::new(input.name.unwrap_or_default())))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = HandlerRegistry::builder().register("Custom::Bucket", Bucket).build();
//!     let transport = MockTransport::new();
//!     let coordinator = Coordinator::new(Arc::new(registry), StaticConfig::new(()), transport.clone());
//!
//!     let request: Request = serde_json::from_value(serde_json::json!({
//!         "RequestType": "Create",
//!         "ResponseURL": "https://callback.example.com/",
//!         "StackId": "stack",
//!         "RequestId": "req",
//!         "ResourceType": "Custom::Bucket",
//!         "LogicalResourceId": "Bucket",
//!         "ResourceProperties": { "ServiceToken": "arn:token", "Name": "media" }
//!     }))
//!     .unwrap();
//!
//!     let response = coordinator.handle(request).await;
//!     assert_eq!(response.status, ResponseStatus::Success);
//!     assert_eq!(response.physical_resource_id, "media");
//!     assert_eq!(transport.count(), 1);
//! }
//! ```
//!
//! ## Testing
//!
//! See the [`mock`] module for in-memory transports, configuration loaders
//! and closure-backed handlers.

pub mod callback;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod message;
pub mod mock;
pub mod poll;
pub mod registry;
pub mod tracing;

// Re-export core types for convenience
pub use callback::{CallbackTransport, HttpCallback};
pub use config::{Config, ConfigError, LogFormat};
pub use coordinator::{ConfigLoader, Coordinator};
pub use error::{CallbackError, FrameworkError, HandlerError, MapError, PollError};
pub use handler::ResourceHandler;
pub use message::{PropertyBag, Request, RequestType, Response, ResponseStatus, Success};
pub use poll::{wait_for_state, Poller};
pub use registry::{HandlerRegistry, RegistryBuilder};

#[doc(hidden)]
pub use paste;
#[doc(hidden)]
pub use serde_json;
