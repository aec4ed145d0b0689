//! Retention sweep for shared snapshots.
//!
//! The sweep lists every manual snapshot, keeps the shared copies produced
//! from the configured source cluster that are older than the age threshold,
//! and deletes them one at a time. A snapshot that fails to delete or never
//! disappears is reported and skipped; only a failed listing aborts.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::cloud::{ClusterApi, ProviderError, Snapshot, SnapshotQuery, Waiter};
use crate::report::Reporter;
use crate::wait::{WaitPolicy, await_terminal};

/// Suffix carried by every shared snapshot.
pub const SHARED_SUFFIX: &str = "-shared";

/// Default age threshold in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Which snapshots a sweep removes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetentionRule {
    /// Source cluster identifier. Matching snapshots start with
    /// `<prefix>-`.
    pub prefix: String,
    /// Snapshots strictly older than this many whole days are removed.
    pub max_age_days: u32,
}

impl RetentionRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(prefix: impl Into<String>, max_age_days: u32) -> Self {
        Self {
            prefix: prefix.into(),
            max_age_days,
        }
    }

    /// Whether `snapshot` is a shared copy past the threshold at `now`.
    #[must_use]
    pub fn is_expired(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        snapshot
            .id
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
            && snapshot.id.ends_with(SHARED_SUFFIX)
            && now.signed_duration_since(snapshot.created_at).num_days()
                > i64::from(self.max_age_days)
    }
}

/// One snapshot the sweep could not remove.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepFailure {
    /// Snapshot identifier.
    pub snapshot_id: String,
    /// Failure text.
    pub message: String,
}

/// Outcome of a sweep.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SweepSummary {
    /// Snapshots deleted, in deletion order.
    pub deleted: Vec<String>,
    /// Snapshots that could not be deleted.
    pub failed: Vec<SweepFailure>,
}

/// Errors that abort a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Snapshots could not be listed.
    #[error("failed to list snapshots: {0}")]
    List(#[source] ProviderError),
}

/// Deletes expired shared snapshots.
pub struct RetentionSweep<'a, C> {
    cloud: &'a C,
    reporter: &'a dyn Reporter,
    wait: WaitPolicy,
}

impl<'a, C: ClusterApi> RetentionSweep<'a, C> {
    /// Creates a sweep.
    #[must_use]
    pub const fn new(cloud: &'a C, reporter: &'a dyn Reporter, wait: WaitPolicy) -> Self {
        Self {
            cloud,
            reporter,
            wait,
        }
    }

    /// Runs the sweep with `now` as the reference time.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::List`] when snapshots cannot be listed. Per
    /// snapshot failures are collected in [`SweepSummary::failed`].
    pub async fn run(
        &self,
        rule: &RetentionRule,
        now: DateTime<Utc>,
    ) -> Result<SweepSummary, SweepError> {
        self.reporter.banner("Deleting old snapshots");
        let snapshots = self
            .cloud
            .list_snapshots(&SnapshotQuery::manual())
            .await
            .map_err(SweepError::List)?;

        let mut summary = SweepSummary::default();
        for snapshot in snapshots.iter().filter(|snapshot| rule.is_expired(snapshot, now)) {
            match self.delete(&snapshot.id).await {
                Ok(()) => {
                    self.reporter
                        .line(&format!("Deleted snapshot '{}'", snapshot.id));
                    info!(snapshot = %snapshot.id, created_at = %snapshot.created_at, "deleted expired snapshot");
                    summary.deleted.push(snapshot.id.clone());
                }
                Err(message) => {
                    self.reporter.line(&message);
                    warn!(snapshot = %snapshot.id, error = %message, "failed to delete expired snapshot");
                    summary.failed.push(SweepFailure {
                        snapshot_id: snapshot.id.clone(),
                        message,
                    });
                }
            }
        }
        self.reporter.line("");
        Ok(summary)
    }

    async fn delete(&self, snapshot_id: &str) -> Result<(), String> {
        match self.cloud.delete_snapshot(snapshot_id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(format!("Failed to delete snapshot '{snapshot_id}': {err}")),
        }
        let interval = self.wait.interval;
        await_terminal(
            self.reporter,
            &format!("Deleting snapshot '{snapshot_id}'"),
            &format!("Timed out when deleting snapshot '{snapshot_id}'"),
            self.wait,
            || self.cloud.wait_until(Waiter::SnapshotDeleted, snapshot_id, interval),
        )
        .await
        .map(|_| ())
        .map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests;
