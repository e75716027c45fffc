//! # Framework Errors
//!
//! This module defines the error types used throughout the resource framework.
//! Every variant renders to the exact text that ends up in a failed response's
//! `Reason`, so the wording here is part of the wire contract.

/// Errors raised while mapping a property bag onto a target shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The caller supplied a key that no field of the target shape consumes.
    #[error("Unsupported property: {key}{}", in_path(.path))]
    UnsupportedProperty { key: String, path: String },

    /// A string destined for a boolean field was neither `"true"` nor `"false"`.
    #[error("Invalid boolean value: {value}")]
    InvalidBoolean { value: String, path: String },
}

fn in_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" in {path}")
    }
}

/// Errors raised by the poll-until-state helper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("{subject} reached unexpected state: {state}")]
    UnexpectedState { subject: String, state: String },

    /// Only produced when a timeout was opted into via [`crate::poll::Poller::with_timeout`].
    #[error("{subject} did not reach {desired} within {timeout_secs}s")]
    Timeout {
        subject: String,
        desired: String,
        timeout_secs: u64,
    },
}

/// Errors a resource handler may return.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Mapping(#[from] MapError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// The external provisioning API failed; the message is surfaced verbatim.
    #[error("{0}")]
    Api(String),

    #[error("unexpected request type")]
    UnexpectedRequestType(String),

    #[error("{0}")]
    Other(String),
}

/// Errors produced by the coordinator itself while running one invocation.
///
/// Every variant becomes a `FAILED` response; none of them escape
/// [`crate::Coordinator::handle`].
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The inbound physical id carries the synthetic failure marker.
    #[error("Resource was never created.")]
    NeverCreated,

    #[error("{0}")]
    Config(Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid custom resource type.")]
    InvalidResourceType(String),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("Handler panicked. See logs for details.")]
    Panicked,
}

/// Errors delivering a response to the callback address.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("callback request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("callback rejected with status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_property_message_at_root() {
        let err = MapError::UnsupportedProperty {
            key: "Bogus".into(),
            path: String::new(),
        };
        assert_eq!(err.to_string(), "Unsupported property: Bogus");
    }

    #[test]
    fn test_unsupported_property_message_nested() {
        let err = MapError::UnsupportedProperty {
            key: "C".into(),
            path: ".A[0]".into(),
        };
        assert_eq!(err.to_string(), "Unsupported property: C in .A[0]");
    }

    #[test]
    fn test_handler_error_is_transparent_for_mapping() {
        let err: HandlerError = MapError::InvalidBoolean {
            value: "yes".into(),
            path: ".Enabled".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid boolean value: yes");
    }
}
