//! # Observability & Tracing
//!
//! Structured logging for the handler process.
//!
//! [`setup_tracing`] installs a subscriber whose level filter comes from
//! `RUST_LOG` (default `info`) and whose line format is chosen by
//! [`LogFormat`]: one JSON object per line for log collectors, or the compact
//! human format on a terminal.
//!
//! ```bash
//! RUST_LOG=debug LOG_FORMAT=compact custom-resource-handler < request.json
//! ```
//!
//! ## What Gets Logged
//!
//! - **Request received**: request type, resource type, callback address and ids
//! - **Sending response**: status, reason and physical id
//! - **Errors**: configuration failures, handler errors, panics, failed delivery
//! - **Debug**: registry wiring, polling rounds, delivered callbacks
//!
//! [`install_panic_hook`] routes panic messages and their backtrace through the
//! same subscriber, so a handler panic leaves a structured record before the
//! coordinator turns it into a failed response.

use crate::config::LogFormat;
use std::backtrace::Backtrace;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global subscriber. Call once at startup.
pub fn setup_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_current_span(false))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_target(false))
                .init();
        }
    }
}

/// Log panics as `error` events carrying the location and a full backtrace.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let backtrace = Backtrace::force_capture();
        tracing::error!(
            panic = %info,
            %location,
            %backtrace,
            "Panic"
        );
    }));
}
