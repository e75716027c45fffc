//! # custom-resource-handler
//!
//! Reads one lifecycle request as JSON from stdin, runs it, and PUTs the
//! response to the request's `ResponseURL`.
//!
//! Environment:
//!
//! - `PROVISIONING_ENDPOINT` (required): base URL of the provisioning API
//! - `PROVISIONING_TOKEN`: bearer token for that API
//! - `PROVISIONING_REGION` / `AWS_REGION`: target region, `us-east-1` by default
//! - `PROVISIONING_POLL_TIMEOUT_SECS`: bound on state waits, unbounded by default
//! - `CALLBACK_TIMEOUT_SECS`: callback delivery timeout, 30 by default
//! - `LOG_FORMAT`: `json` or `compact`
//! - `RUST_LOG`: tracing filter, `info` by default

use media_resources::api::GatewayLoader;
use media_resources::lifecycle::build_registry;
use resource_framework::tracing::{install_panic_hook, setup_tracing};
use resource_framework::{Config, Coordinator, HttpCallback, Request, ResponseStatus};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

const USAGE: &str = "\
Usage: custom-resource-handler < request.json

Handles one custom-resource lifecycle request read from stdin and delivers
the response to the request's ResponseURL.";

#[tokio::main]
async fn main() -> Result<(), String> {
    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(other) => return Err(format!("unexpected argument {other:?}\n\n{USAGE}")),
    }

    let config = Config::from_env().map_err(|e| e.to_string())?;
    setup_tracing(config.log_format);
    install_panic_hook();

    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .map_err(|e| format!("failed to read request from stdin: {e}"))?;
    let request: Request = serde_json::from_str(&raw).map_err(|e| {
        error!(error = %e, "Malformed request");
        format!("malformed request: {e}")
    })?;

    let registry = Arc::new(build_registry());
    info!(handlers = registry.len(), "Handler registry ready");

    let transport = HttpCallback::new(config.callback_timeout).map_err(|e| e.to_string())?;
    let coordinator = Coordinator::new(registry, GatewayLoader::from_env(), transport);

    let response = coordinator.handle(request).await;
    if response.status == ResponseStatus::Failed {
        info!(reason = %response.reason, "Request finished with FAILED status");
    }
    Ok(())
}
