//! # Mock Framework & Testing Guide
//!
//! In-memory stand-ins for the coordinator's collaborators, so lifecycle logic
//! can be tested without a network or a real provisioning backend.
//!
//! | Type | Replaces | Use it to |
//! |------|----------|-----------|
//! | [`MockTransport`] | [`HttpCallback`](crate::callback::HttpCallback) | Inspect exactly what was delivered, or simulate a dead callback address |
//! | [`StaticConfig`] | a production [`ConfigLoader`] | Hand every invocation the same context |
//! | [`FailingConfig`] | a production [`ConfigLoader`] | Exercise the configuration-failure path |
//! | [`FnHandler`] | a [`ResourceHandler`] | Script a handler with a closure |
//!
//! ## Example
//!
//! ```rust
//! use resource_framework::mock::{FnHandler, MockTransport, StaticConfig};
//! use resource_framework::{Coordinator, HandlerRegistry, Request, ResponseStatus, Success};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = HandlerRegistry::builder()
//!         .register(
//!             "Custom::Echo",
//!             FnHandler::new(|request: &Request, _: &()| {
//!                 Ok(Some(Success::new(request.logical_resource_id.clone())))
//!             }),
//!         )
//!         .build();
//!
//!     let transport = MockTransport::new();
//!     let coordinator = Coordinator::new(Arc::new(registry), StaticConfig::new(()), transport.clone());
//!
//!     let request: Request = serde_json::from_value(serde_json::json!({
//!         "RequestType": "Create",
//!         "ResponseURL": "https://callback.example.com/",
//!         "StackId": "stack",
//!         "RequestId": "req",
//!         "ResourceType": "Custom::Echo",
//!         "LogicalResourceId": "Echo"
//!     }))
//!     .unwrap();
//!
//!     coordinator.handle(request).await;
//!
//!     let (url, response) = transport.last().unwrap();
//!     assert_eq!(url, "https://callback.example.com/");
//!     assert_eq!(response.status, ResponseStatus::Success);
//!     assert_eq!(response.physical_resource_id, "Echo");
//! }
//! ```

use crate::callback::CallbackTransport;
use crate::coordinator::ConfigLoader;
use crate::error::{CallbackError, HandlerError};
use crate::handler::ResourceHandler;
use crate::message::{Request, Response, Success};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records every delivery instead of sending it.
#[derive(Clone, Default)]
pub struct MockTransport {
    deliveries: Arc<Mutex<Vec<(String, Response)>>>,
    failure: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records deliveries, then reports each one as failed with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            deliveries: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// All `(url, response)` pairs in delivery order.
    pub fn deliveries(&self) -> Vec<(String, Response)> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<(String, Response)> {
        self.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Response)>> {
        // A poisoned lock only means another test thread panicked mid-push.
        self.deliveries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CallbackTransport for MockTransport {
    async fn deliver(&self, url: &str, response: &Response) -> Result<(), CallbackError> {
        self.lock().push((url.to_string(), response.clone()));
        match &self.failure {
            Some(message) => Err(CallbackError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

/// Hands out a clone of the same context on every load.
#[derive(Clone)]
pub struct StaticConfig<C> {
    ctx: C,
}

impl<C: Clone> StaticConfig<C> {
    pub fn new(ctx: C) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: Clone + Send + Sync> ConfigLoader<C> for StaticConfig<C> {
    async fn load(&self) -> Result<C, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.ctx.clone())
    }
}

/// Always fails to load, with the given message.
#[derive(Debug, Clone)]
pub struct FailingConfig(pub String);

#[async_trait]
impl<C> ConfigLoader<C> for FailingConfig {
    async fn load(&self) -> Result<C, Box<dyn std::error::Error + Send + Sync>> {
        Err(self.0.clone().into())
    }
}

/// A handler backed by a synchronous closure.
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new<C>(f: F) -> Self
    where
        F: Fn(&Request, &C) -> Result<Option<Success>, HandlerError>,
    {
        Self { f }
    }
}

#[async_trait]
impl<C, F> ResourceHandler<C> for FnHandler<F>
where
    C: Send + Sync,
    F: Fn(&Request, &C) -> Result<Option<Success>, HandlerError> + Send + Sync,
{
    async fn handle(&self, request: &Request, ctx: &C) -> Result<Option<Success>, HandlerError> {
        (self.f)(request, ctx)
    }
}
