//! # ResourceHandler Trait
//!
//! The contract every resource kind implements to be driven by the
//! [`Coordinator`](crate::Coordinator).
//!
//! A handler is a function of `(Request, ambient configuration)`. It picks a
//! target shape for the operation kind, maps the request's properties into it,
//! calls the external provisioning API, optionally waits for the backend to
//! settle, and returns either a [`Success`] or a [`HandlerError`].
//!
//! Handlers never build a [`Response`](crate::message::Response) and never talk
//! to the callback address. That is the coordinator's job alone.

use crate::error::HandlerError;
use crate::message::{Request, Success};
use async_trait::async_trait;

/// One resource kind's lifecycle logic.
///
/// `C` is the ambient configuration acquired fresh for each invocation by a
/// [`ConfigLoader`](crate::coordinator::ConfigLoader).
///
/// Returning `Ok(None)` reports success and keeps the inbound physical id,
/// which is what most Delete operations want.
#[async_trait]
pub trait ResourceHandler<C: Send + Sync>: Send + Sync {
    async fn handle(&self, request: &Request, ctx: &C) -> Result<Option<Success>, HandlerError>;
}
