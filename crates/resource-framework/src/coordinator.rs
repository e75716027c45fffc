//! # Lifecycle Coordinator
//!
//! This module defines the [`Coordinator`], which drives a single request from
//! arrival to callback. It is the only component that produces a
//! [`Response`] and the only one that talks to the callback address.
//!
//! ## Flow
//!
//! 1. Log the request's identifying fields.
//! 2. A physical id carrying the `failed/` marker short-circuits to `FAILED`:
//!    the resource behind it was never created.
//! 3. Acquire ambient configuration through the [`ConfigLoader`].
//! 4. Look the resource type up in the [`HandlerRegistry`] and run the handler.
//!    Steps 3 and 4 share one spawned task, so a panic in the loader, the
//!    lookup or the handler surfaces as a `JoinError` instead of unwinding
//!    through the coordinator.
//! 5. Finalise: build the response from whatever outcome exists, assign a
//!    synthetic `failed/<hex>` id to a failed Create that produced none, log,
//!    and deliver it once through the [`CallbackTransport`].
//!
//! Step 5 runs for every outcome of steps 2-4. Delivery errors are logged and
//! otherwise dropped.

use crate::callback::CallbackTransport;
use crate::error::FrameworkError;
use crate::message::{Request, RequestType, Response, ResponseStatus, Success, FAILED_ID_PREFIX};
use crate::registry::HandlerRegistry;
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Supplies the ambient configuration handed to handlers.
///
/// Called once per invocation; results are never cached.
#[async_trait]
pub trait ConfigLoader<C>: Send + Sync {
    async fn load(&self) -> Result<C, Box<dyn std::error::Error + Send + Sync>>;
}

/// Runs one request to completion and reports the outcome.
pub struct Coordinator<C: Send + Sync, L, T> {
    registry: Arc<HandlerRegistry<C>>,
    loader: Arc<L>,
    transport: T,
}

impl<C, L, T> Coordinator<C, L, T>
where
    C: Send + Sync + 'static,
    L: ConfigLoader<C> + 'static,
    T: CallbackTransport,
{
    pub fn new(registry: Arc<HandlerRegistry<C>>, loader: L, transport: T) -> Self {
        Self {
            registry,
            loader: Arc::new(loader),
            transport,
        }
    }

    /// Handle `request` and deliver exactly one response for it.
    ///
    /// The delivered response is also returned to the caller.
    pub async fn handle(&self, request: Request) -> Response {
        info!(
            request_type = %request.request_type,
            resource_type = %request.resource_type,
            response_url = %request.response_url,
            stack_id = %request.stack_id,
            request_id = %request.request_id,
            logical_resource_id = %request.logical_resource_id,
            physical_resource_id = %request.physical_resource_id,
            "Request received"
        );

        let outcome = self.run(&request).await;
        let response = finalize(&request, outcome);

        info!(
            status = %response.status,
            reason = %response.reason,
            physical_resource_id = %response.physical_resource_id,
            "Sending response"
        );
        if let Err(e) = self
            .transport
            .deliver(&request.response_url, &response)
            .await
        {
            error!(error = %e, "Callback delivery failed");
        }

        response
    }

    async fn run(&self, request: &Request) -> Result<Option<Success>, FrameworkError> {
        if request.is_synthetic_failure() {
            info!(
                physical_resource_id = %request.physical_resource_id,
                "Resource was never created, skipping handler"
            );
            return Err(FrameworkError::NeverCreated);
        }

        // Config load, lookup and handler all run inside the task so a panic
        // in any of them still ends in a response.
        let loader = Arc::clone(&self.loader);
        let registry = Arc::clone(&self.registry);
        let task_request = request.clone();
        let task = tokio::spawn(async move { dispatch(&*loader, &registry, &task_request).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) if join_error.is_panic() => {
                let payload = join_error.into_panic();
                error!(panic = %panic_message(payload.as_ref()), "Handler panicked");
                Err(FrameworkError::Panicked)
            }
            Err(join_error) => {
                error!(error = %join_error, "Handler task did not complete");
                Err(FrameworkError::Panicked)
            }
        }
    }
}

async fn dispatch<C, L>(
    loader: &L,
    registry: &HandlerRegistry<C>,
    request: &Request,
) -> Result<Option<Success>, FrameworkError>
where
    C: Send + Sync,
    L: ConfigLoader<C> + ?Sized,
{
    let ctx = loader.load().await.map_err(|e| {
        warn!(error = %e, "Failed to load configuration");
        FrameworkError::Config(e)
    })?;

    let handler = registry.get(&request.resource_type).ok_or_else(|| {
        warn!(resource_type = %request.resource_type, "No handler registered");
        FrameworkError::InvalidResourceType(request.resource_type.clone())
    })?;

    handler.handle(request, &ctx).await.map_err(|e| {
        warn!(error = %e, "Handler failed");
        e.into()
    })
}

/// Turn an outcome into the response for `request`.
///
/// A failure whose message renders empty is reported with the reason
/// `Unknown error.`, so a `FAILED` response never has an empty reason. A
/// failed Create that never produced a physical id gets a synthetic
/// `failed/` id.
pub fn finalize(request: &Request, outcome: Result<Option<Success>, FrameworkError>) -> Response {
    let mut response = Response::for_request(request);

    match outcome {
        Ok(Some(success)) => {
            response.physical_resource_id = success.physical_resource_id;
            response.data = success.data;
            response.no_echo = success.no_echo;
        }
        Ok(None) => {}
        Err(e) => {
            response.status = ResponseStatus::Failed;
            response.reason = e.to_string();
            if response.reason.is_empty() {
                response.reason = "Unknown error.".to_string();
            }
        }
    }

    if request.request_type == RequestType::Create
        && response.status == ResponseStatus::Failed
        && response.physical_resource_id.is_empty()
    {
        response.physical_resource_id = synthetic_failure_id();
    }

    response
}

/// `failed/` followed by 16 random bytes in lowercase hex.
pub fn synthetic_failure_id() -> String {
    let mut buf = [0u8; 16];
    OsRng.fill_bytes(&mut buf);
    format!("{FAILED_ID_PREFIX}{}", hex::encode(buf))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn request(kind: &str, physical_id: &str) -> Request {
        serde_json::from_value(json!({
            "RequestType": kind,
            "ResponseURL": "https://callback.example.com/",
            "StackId": "stack",
            "RequestId": "req",
            "ResourceType": "Custom::Thing",
            "LogicalResourceId": "Thing",
            "PhysicalResourceId": physical_id
        }))
        .unwrap()
    }

    fn is_synthetic(id: &str) -> bool {
        id.strip_prefix(FAILED_ID_PREFIX).is_some_and(|hex| {
            hex.len() == 32 && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        })
    }

    #[test]
    fn test_synthetic_id_format_and_uniqueness() {
        let a = synthetic_failure_id();
        let b = synthetic_failure_id();
        assert!(is_synthetic(&a), "{a}");
        assert!(is_synthetic(&b), "{b}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_failed_create_without_id_gets_synthetic_id() {
        let response = finalize(
            &request("Create", ""),
            Err(HandlerError::Api("boom".into()).into()),
        );
        assert_eq!(response.status, ResponseStatus::Failed);
        assert_eq!(response.reason, "boom");
        assert!(is_synthetic(&response.physical_resource_id));
    }

    #[test]
    fn test_failed_update_keeps_inbound_id() {
        let response = finalize(
            &request("Update", "channel-1"),
            Err(HandlerError::Api("boom".into()).into()),
        );
        assert_eq!(response.physical_resource_id, "channel-1");
    }

    #[test]
    fn test_failed_delete_without_id_stays_empty() {
        let response = finalize(&request("Delete", ""), Err(FrameworkError::Panicked));
        assert_eq!(response.physical_resource_id, "");
        assert_eq!(response.reason, "Handler panicked. See logs for details.");
    }

    #[test]
    fn test_success_without_value_keeps_inbound_id() {
        let response = finalize(&request("Delete", "channel-1"), Ok(None));
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.physical_resource_id, "channel-1");
        assert!(response.data.is_none());
    }

    #[test]
    fn test_success_copies_handler_output() {
        let mut data = crate::message::PropertyBag::new();
        data.insert("Id".into(), json!("channel-2"));
        let response = finalize(
            &request("Create", ""),
            Ok(Some(Success::new("channel-2").with_data(data).with_no_echo())),
        );
        assert_eq!(response.physical_resource_id, "channel-2");
        assert_eq!(response.data.unwrap()["Id"], "channel-2");
        assert!(response.no_echo);
    }

    #[test]
    fn test_empty_error_message_still_gives_reason() {
        let response = finalize(
            &request("Update", "x"),
            Err(HandlerError::Api(String::new()).into()),
        );
        assert_eq!(response.reason, "Unknown error.");
    }

    struct PanickingConfig;

    #[async_trait]
    impl ConfigLoader<()> for PanickingConfig {
        async fn load(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            panic!("credential chain exploded");
        }
    }

    #[tokio::test]
    async fn test_panicking_config_loader_still_delivers_one_response() {
        let transport = MockTransport::new();
        let registry = Arc::new(HandlerRegistry::<()>::builder().build());
        let coordinator = Coordinator::new(registry, PanickingConfig, transport.clone());

        let response = coordinator.handle(request("Create", "")).await;

        assert_eq!(transport.count(), 1);
        assert_eq!(transport.last().unwrap().1, response);
        assert_eq!(response.status, ResponseStatus::Failed);
        assert_eq!(response.reason, "Handler panicked. See logs for details.");
        assert!(is_synthetic(&response.physical_resource_id));
    }

    #[test]
    fn test_panic_message_extraction() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
