//! # Callback Transport
//!
//! Delivers a [`Response`] to the caller-supplied callback address.
//!
//! Delivery is fire-and-forget: one attempt, no retry, response body
//! discarded. The coordinator logs failures and moves on.

use crate::error::CallbackError;
use crate::message::Response;
use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use std::time::Duration;
use tracing::debug;

/// Sends a response to a callback address.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    async fn deliver(&self, url: &str, response: &Response) -> Result<(), CallbackError>;
}

/// HTTP `PUT` of the JSON-encoded response.
///
/// No `Content-Type` header is sent: pre-signed callback URLs are signed
/// without one and reject requests that carry it.
#[derive(Clone)]
pub struct HttpCallback {
    client: reqwest::Client,
}

impl HttpCallback {
    pub fn new(timeout: Duration) -> Result<Self, CallbackError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallbackTransport for HttpCallback {
    async fn deliver(&self, url: &str, response: &Response) -> Result<(), CallbackError> {
        let body = serde_json::to_vec(response)?;
        let content_length = body.len();

        let reply = self
            .client
            .put(url)
            .header(CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await?;

        let status = reply.status();
        // Drain the body so the connection can be reused.
        let _ = reply.bytes().await;

        if !status.is_success() {
            return Err(CallbackError::Status {
                status: status.as_u16(),
            });
        }
        debug!(%status, content_length, "Callback delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ResponseStatus;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response() -> Response {
        Response {
            status: ResponseStatus::Success,
            reason: String::new(),
            physical_resource_id: "channel-1".into(),
            stack_id: "stack".into(),
            request_id: "req-1".into(),
            logical_resource_id: "Channel".into(),
            no_echo: false,
            data: None,
        }
    }

    #[tokio::test]
    async fn test_put_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/callback"))
            .and(body_json(serde_json::json!({
                "Status": "SUCCESS",
                "Reason": "",
                "PhysicalResourceId": "channel-1",
                "StackId": "stack",
                "RequestId": "req-1",
                "LogicalResourceId": "Channel"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpCallback::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/callback", mock_server.uri());
        transport.deliver(&url, &response()).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_content_type_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let transport = HttpCallback::new(Duration::from_secs(5)).unwrap();
        transport
            .deliver(&mock_server.uri(), &response())
            .await
            .unwrap();

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("content-type").is_none());
        assert!(received[0].headers.get("content-length").is_some());
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
            .mount(&mock_server)
            .await;

        let transport = HttpCallback::new(Duration::from_secs(5)).unwrap();
        let err = transport
            .deliver(&mock_server.uri(), &response())
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::Status { status: 403 }));
    }

    #[tokio::test]
    async fn test_unreachable_address_is_a_transport_error() {
        let transport = HttpCallback::new(Duration::from_secs(1)).unwrap();
        let err = transport
            .deliver("http://127.0.0.1:9/callback", &response())
            .await
            .unwrap_err();
        assert!(matches!(err, CallbackError::Transport(_)));
    }
}
