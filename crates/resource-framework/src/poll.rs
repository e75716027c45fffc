//! # Poll Until State
//!
//! Blocking wait loop shared by handlers whose backend resources settle
//! asynchronously (a channel moving from `CREATING` to `IDLE`, a flow from
//! `STARTING` to `ACTIVE`, ...).
//!
//! Each round calls the query once:
//!
//! 1. a query error is returned as-is, with no retry;
//! 2. the desired state ends the wait successfully;
//! 3. a state outside the allowed transitional set fails with
//!    [`PollError::UnexpectedState`];
//! 4. otherwise the loop sleeps for the interval and goes again.
//!
//! [`wait_for_state`] has no timeout and no iteration cap. A [`Poller`] built
//! with [`Poller::with_timeout`] adds a deadline for callers that want one.

use crate::error::PollError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Fixed sleep between two queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    /// Give up with [`PollError::Timeout`] once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Query until `desired` is observed.
    ///
    /// `subject` names the resource in error messages ("Channel", "Flow").
    pub async fn wait_for<S, E, F, Fut>(
        &self,
        subject: &str,
        mut query: F,
        desired: S,
        allowed: &[S],
    ) -> Result<(), E>
    where
        S: PartialEq + Display,
        E: From<PollError>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S, E>>,
    {
        let started = Instant::now();
        loop {
            let state = query().await?;
            if state == desired {
                debug!(subject, %state, "Reached desired state");
                return Ok(());
            }
            if !allowed.contains(&state) {
                return Err(PollError::UnexpectedState {
                    subject: subject.to_string(),
                    state: state.to_string(),
                }
                .into());
            }
            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    return Err(PollError::Timeout {
                        subject: subject.to_string(),
                        desired: desired.to_string(),
                        timeout_secs: timeout.as_secs(),
                    }
                    .into());
                }
            }
            debug!(subject, %state, %desired, "Waiting for state");
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// [`Poller::wait_for`] with the default interval and no timeout.
pub async fn wait_for_state<S, E, F, Fut>(
    subject: &str,
    query: F,
    desired: S,
    allowed: &[S],
) -> Result<(), E>
where
    S: PartialEq + Display,
    E: From<PollError>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
{
    Poller::default()
        .wait_for(subject, query, desired, allowed)
        .await
}
