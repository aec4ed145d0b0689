//! BDD scenarios for the retention sweep.

use rstest_bdd_macros::scenario;

use super::test_helpers::{RetentionContext, retention_context};

#[scenario(
    path = "tests/features/retention.feature",
    name = "Delete only old shared snapshots of the source cluster"
)]
fn scenario_delete_old_shared_snapshots(retention_context: RetentionContext) {
    let _ = retention_context;
}

#[scenario(
    path = "tests/features/retention.feature",
    name = "A stuck deletion does not stop the sweep"
)]
fn scenario_stuck_deletion_is_isolated(retention_context: RetentionContext) {
    let _ = retention_context;
}
