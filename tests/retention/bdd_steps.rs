//! BDD step definitions for retention sweep behaviour.

use snapshot_sanitizer::cloud::{SnapshotType, Waiter};
use snapshot_sanitizer::test_support::snapshot;
use snapshot_sanitizer::{RetentionRule, RetentionSweep};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{RetentionContext, SweepOutcome, reference_time, wait_policy};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a manual snapshot \"{id}\" created {days:u32} days ago")]
fn manual_snapshot(retention_context: RetentionContext, id: String, days: u32) -> RetentionContext {
    let created_at = reference_time() - chrono::Duration::days(i64::from(days));
    retention_context.cloud.add_snapshot(
        snapshot(id.trim(), "tmp", created_at),
        SnapshotType::Manual,
    );
    retention_context
}

#[given("deletion of snapshot \"{id}\" never completes")]
fn deletion_stalls(retention_context: RetentionContext, id: String) -> RetentionContext {
    retention_context
        .cloud
        .stall(Waiter::SnapshotDeleted, id.trim());
    retention_context
}

#[when("I sweep snapshots of \"{prefix}\" older than {days:u32} days")]
fn run_sweep(
    mut retention_context: RetentionContext,
    prefix: String,
    days: u32,
) -> Result<RetentionContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let rule = RetentionRule::new(prefix.trim(), days);
    let result = runtime.block_on(async {
        RetentionSweep::new(
            &retention_context.cloud,
            &retention_context.reporter,
            wait_policy(),
        )
        .run(&rule, reference_time())
        .await
    });
    retention_context.outcome = Some(match result {
        Ok(summary) => SweepOutcome::Success(summary),
        Err(err) => SweepOutcome::Failure(err.to_string()),
    });
    Ok(retention_context)
}

fn summary(
    retention_context: &RetentionContext,
) -> Result<&snapshot_sanitizer::SweepSummary, StepError> {
    match retention_context.outcome.as_ref() {
        Some(SweepOutcome::Success(summary)) => Ok(summary),
        Some(SweepOutcome::Failure(message)) => Err(StepError::Assertion(format!(
            "expected the sweep to finish, got: {message}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the sweep deletes {count:usize} snapshot")]
fn deletes_count(retention_context: &RetentionContext, count: usize) -> Result<(), StepError> {
    let summary = summary(retention_context)?;
    if summary.deleted.len() == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} deletions, got {:?}",
            summary.deleted
        )))
    }
}

#[then("the sweep reports a timeout for \"{id}\"")]
fn reports_timeout(retention_context: &RetentionContext, id: String) -> Result<(), StepError> {
    let summary = summary(retention_context)?;
    let wanted = id.trim();
    let found = summary.failed.iter().any(|failure| {
        failure.snapshot_id == wanted && failure.message.starts_with("Timed out when deleting")
    });
    if found {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a timeout for {wanted}, got {:?}",
            summary.failed
        )))
    }
}

#[then("snapshot \"{id}\" no longer exists")]
fn snapshot_gone(retention_context: &RetentionContext, id: String) -> Result<(), StepError> {
    if retention_context
        .cloud
        .snapshot_ids()
        .iter()
        .any(|existing| existing == id.trim())
    {
        Err(StepError::Assertion(format!("{id} should have been deleted")))
    } else {
        Ok(())
    }
}

#[then("snapshot \"{id}\" still exists")]
fn snapshot_kept(retention_context: &RetentionContext, id: String) -> Result<(), StepError> {
    if retention_context
        .cloud
        .snapshot_ids()
        .iter()
        .any(|existing| existing == id.trim())
    {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("{id} should have been kept")))
    }
}
