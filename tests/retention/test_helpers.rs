//! Shared fixtures and helpers for retention BDD scenarios.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;
use snapshot_sanitizer::test_support::{FakeCloud, RecordingReporter};
use snapshot_sanitizer::{SweepSummary, WaitPolicy};

#[derive(Clone, Debug)]
pub enum SweepOutcome {
    Success(SweepSummary),
    Failure(String),
}

#[derive(Clone, Debug)]
pub struct RetentionContext {
    pub cloud: FakeCloud,
    pub reporter: RecordingReporter,
    pub outcome: Option<SweepOutcome>,
}

#[fixture]
pub fn retention_context() -> RetentionContext {
    RetentionContext {
        cloud: FakeCloud::new(),
        reporter: RecordingReporter::default(),
        outcome: None,
    }
}

/// Fixed reference time so ages do not drift while a scenario runs.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("reference time should be valid"))
}

pub const fn wait_policy() -> WaitPolicy {
    WaitPolicy::new(Duration::ZERO, 2)
}
