//! # Media Resources
//!
//! Custom-resource handlers for live-video infrastructure: MediaLive
//! channels, inputs and input security groups, MediaConnect flows, MediaStore
//! container lookups, and a random-string generator.
//!
//! ## Module Tour
//!
//! - **[model]**: typed API inputs, declared with
//!   [`target_shape!`](resource_framework::target_shape) so untyped resource
//!   properties can be mapped into them.
//! - **[api]**: the service traits ([`MediaLiveApi`](api::MediaLiveApi), ...)
//!   and the HTTP gateway client that implements them.
//! - **[handlers]**: one [`ResourceHandler`](resource_framework::ResourceHandler)
//!   per resource type.
//! - **[lifecycle]**: assembles the registry the binary dispatches through.
//! - **[testing]**: in-memory fakes of every service trait.
//!
//! The `custom-resource-handler` binary reads one request from stdin, runs it
//! through a [`Coordinator`](resource_framework::Coordinator) and delivers the
//! response to the request's callback URL.

pub mod api;
pub mod handlers;
pub mod lifecycle;
pub mod model;
pub mod testing;
