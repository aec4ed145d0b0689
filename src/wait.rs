//! Bounded polling for provider resources that settle asynchronously.
//!
//! Readiness of clusters, instances and snapshots has no push notification.
//! [`await_terminal`] turns a short provider-side wait into a synchronous
//! checkpoint by retrying it a bounded number of times.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cloud::ProviderError;
use crate::report::Reporter;

/// Default spacing between provider status checks.
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of short waits attempted before giving up.
pub const DEFAULT_WAIT_MAX_INTERVALS: u32 = 60;

/// Result of one short provider-side wait.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PollOutcome {
    /// The resource reached the awaited state.
    Reached,
    /// The short wait ran out; the resource may still get there.
    Pending,
}

/// Interval and attempt budget for [`await_terminal`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPolicy {
    /// Spacing between status checks inside one short wait.
    pub interval: Duration,
    /// Maximum number of short waits.
    pub max_intervals: u32,
}

impl WaitPolicy {
    /// Builds a policy from explicit values.
    #[must_use]
    pub const fn new(interval: Duration, max_intervals: u32) -> Self {
        Self {
            interval,
            max_intervals,
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_MAX_INTERVALS)
    }
}

/// Errors surfaced by [`await_terminal`].
#[derive(Debug, Error)]
pub enum WaitError {
    /// No attempt observed the awaited state.
    #[error("{message}: not reached after {attempts} attempts")]
    Timeout {
        /// Caller-supplied context, for example `Timeout while creating cluster tmp`.
        message: String,
        /// Number of short waits performed.
        attempts: u32,
    },
    /// The provider failed in a way retrying cannot fix.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl WaitError {
    /// Whether the error is a polling timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Retries `poll` until it reports [`PollOutcome::Reached`] or the attempt
/// budget runs out.
///
/// `label` is shown before the progress indicators and each pending attempt
/// emits one indicator through `reporter`. Returns the number of attempts it
/// took.
///
/// # Errors
///
/// Returns [`WaitError::Timeout`] carrying `context` after
/// `policy.max_intervals` pending attempts, or [`WaitError::Provider`] as soon
/// as `poll` fails.
pub async fn await_terminal<F, Fut>(
    reporter: &dyn Reporter,
    label: &str,
    context: &str,
    policy: WaitPolicy,
    mut poll: F,
) -> Result<u32, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome, ProviderError>>,
{
    reporter.progress_start(label);
    for attempt in 1..=policy.max_intervals {
        match poll().await {
            Ok(PollOutcome::Reached) => {
                reporter.progress_end();
                debug!(context, attempt, "resource reached awaited state");
                return Ok(attempt);
            }
            Ok(PollOutcome::Pending) => reporter.progress_tick(),
            Err(err) => {
                reporter.progress_end();
                return Err(err.into());
            }
        }
    }
    reporter.progress_end();
    warn!(context, attempts = policy.max_intervals, "wait budget exhausted");
    Err(WaitError::Timeout {
        message: context.to_owned(),
        attempts: policy.max_intervals,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::test_support::RecordingReporter;
    use rstest::rstest;

    fn scripted(reach_on: Option<u32>, calls: &Cell<u32>) -> Result<PollOutcome, ProviderError> {
        calls.set(calls.get() + 1);
        if Some(calls.get()) == reach_on {
            Ok(PollOutcome::Reached)
        } else {
            Ok(PollOutcome::Pending)
        }
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    #[tokio::test]
    async fn succeeds_after_exactly_k_attempts(#[case] k: u32) {
        let reporter = RecordingReporter::default();
        let calls = Cell::new(0);
        let attempts = await_terminal(&reporter, "Polling", "ctx", WaitPolicy::new(Duration::ZERO, 5), || {
            let outcome = scripted(Some(k), &calls);
            async move { outcome }
        })
        .await
        .unwrap_or_else(|err| panic!("wait failed: {err}"));

        assert_eq!(attempts, k);
        assert_eq!(calls.get(), k);
        assert_eq!(reporter.ticks(), k - 1);
    }

    #[tokio::test]
    async fn times_out_after_max_intervals() {
        let reporter = RecordingReporter::default();
        let calls = Cell::new(0);
        let err = await_terminal(
            &reporter,
            "Creating cluster",
            "Timeout while creating cluster tmp",
            WaitPolicy::new(Duration::ZERO, 4),
            || {
                let outcome = scripted(None, &calls);
                async move { outcome }
            },
        )
        .await
        .expect_err("wait should time out");

        assert_eq!(calls.get(), 4);
        assert_eq!(reporter.ticks(), 4);
        match err {
            WaitError::Timeout { message, attempts } => {
                assert_eq!(message, "Timeout while creating cluster tmp");
                assert_eq!(attempts, 4);
            }
            WaitError::Provider(other) => panic!("unexpected provider error: {other}"),
        }
    }

    #[tokio::test]
    async fn provider_failure_stops_polling() {
        let reporter = RecordingReporter::default();
        let calls = Cell::new(0);
        let err = await_terminal(&reporter, "Polling", "ctx", WaitPolicy::new(Duration::ZERO, 10), || {
            calls.set(calls.get() + 1);
            async {
                Err(ProviderError::Throttled {
                    message: String::from("slow down"),
                })
            }
        })
        .await
        .expect_err("provider error should propagate");

        assert_eq!(calls.get(), 1);
        assert!(!err.is_timeout());
    }

    #[test]
    fn default_policy_allows_an_hour() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(60));
        assert_eq!(policy.max_intervals, 60);
    }
}
