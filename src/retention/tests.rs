//! Unit tests for the retention sweep.

use std::time::Duration;

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;
use crate::cloud::SnapshotType;
use crate::test_support::{FakeCloud, RecordingReporter, snapshot};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid timestamp"))
}

fn days_ago(days: i64) -> DateTime<Utc> {
    now() - chrono::Duration::days(days)
}

fn policy() -> WaitPolicy {
    WaitPolicy::new(Duration::ZERO, 2)
}

#[fixture]
fn cloud() -> FakeCloud {
    let cloud = FakeCloud::new();
    for (id, age) in [
        ("prod-a-sanitized-shared", 40),
        ("prod-b-sanitized-shared", 10),
        ("prod-c-sanitized", 40),
        ("staging-d-sanitized-shared", 40),
    ] {
        cloud.add_snapshot(snapshot(id, "tmp", days_ago(age)), SnapshotType::Manual);
    }
    cloud.add_snapshot(
        snapshot("rds:prod-e-shared", "prod", days_ago(40)),
        SnapshotType::Automated,
    );
    cloud
}

#[rstest]
#[tokio::test]
async fn deletes_only_old_shared_snapshots_of_the_source(cloud: FakeCloud) {
    let reporter = RecordingReporter::default();

    let summary = RetentionSweep::new(&cloud, &reporter, policy())
        .run(&RetentionRule::new("prod", 30), now())
        .await
        .unwrap_or_else(|err| panic!("sweep failed: {err}"));

    assert_eq!(summary.deleted, vec![String::from("prod-a-sanitized-shared")]);
    assert!(summary.failed.is_empty());
    assert!(!cloud.snapshot_ids().contains(&String::from("prod-a-sanitized-shared")));
    assert_eq!(cloud.snapshot_ids().len(), 4);
    assert_eq!(reporter.banners(), vec!["Deleting old snapshots"]);
    assert!(
        reporter
            .lines()
            .contains(&String::from("Deleted snapshot 'prod-a-sanitized-shared'"))
    );
}

#[rstest]
#[case("prod-x-sanitized-shared", days_ago(31), true)]
#[case("prod-x-sanitized-shared", days_ago(30), false)]
#[case("prod-x-sanitized-shared", days_ago(31) + chrono::Duration::hours(1), false)]
#[case("prod-x-sanitized", days_ago(90), false)]
#[case("other-x-sanitized-shared", days_ago(90), false)]
#[case("production-x-sanitized-shared", days_ago(90), false)]
fn expiry_requires_prefix_suffix_and_whole_days(
    #[case] id: &str,
    #[case] created_at: DateTime<Utc>,
    #[case] expected: bool,
) {
    let rule = RetentionRule::new("prod", 30);
    assert_eq!(rule.is_expired(&snapshot(id, "tmp", created_at), now()), expected);
}

#[rstest]
#[tokio::test]
async fn stuck_deletion_does_not_stop_the_sweep() {
    let cloud = FakeCloud::new();
    cloud.add_snapshot(
        snapshot("prod-1-sanitized-shared", "tmp", days_ago(50)),
        SnapshotType::Manual,
    );
    cloud.add_snapshot(
        snapshot("prod-2-sanitized-shared", "tmp", days_ago(45)),
        SnapshotType::Manual,
    );
    cloud.stall(Waiter::SnapshotDeleted, "prod-1-sanitized-shared");
    let reporter = RecordingReporter::default();

    let summary = RetentionSweep::new(&cloud, &reporter, policy())
        .run(&RetentionRule::new("prod", 30), now())
        .await
        .unwrap_or_else(|err| panic!("sweep failed: {err}"));

    assert_eq!(summary.deleted, vec![String::from("prod-2-sanitized-shared")]);
    let failure = summary
        .failed
        .first()
        .unwrap_or_else(|| panic!("expected a failure"));
    assert_eq!(failure.snapshot_id, "prod-1-sanitized-shared");
    assert!(
        failure
            .message
            .starts_with("Timed out when deleting snapshot 'prod-1-sanitized-shared'"),
        "{}",
        failure.message
    );
}

#[rstest]
#[tokio::test]
async fn delete_failure_is_reported_and_skipped(cloud: FakeCloud) {
    cloud.add_snapshot(
        snapshot("prod-z-sanitized-shared", "tmp", days_ago(90)),
        SnapshotType::Manual,
    );
    cloud.fail_on(
        "delete_snapshot:prod-a-sanitized-shared",
        ProviderError::Sdk {
            code: Some(String::from("InvalidDBClusterSnapshotStateFault")),
            message: String::from("snapshot is being copied"),
        },
    );
    let reporter = RecordingReporter::default();

    let summary = RetentionSweep::new(&cloud, &reporter, policy())
        .run(&RetentionRule::new("prod", 30), now())
        .await
        .unwrap_or_else(|err| panic!("sweep failed: {err}"));

    assert_eq!(summary.deleted, vec![String::from("prod-z-sanitized-shared")]);
    assert_eq!(summary.failed.len(), 1);
    assert!(cloud.snapshot_ids().contains(&String::from("prod-a-sanitized-shared")));
}

#[rstest]
#[tokio::test]
async fn listing_failure_aborts(cloud: FakeCloud) {
    cloud.fail_on(
        "list_snapshots",
        ProviderError::Throttled {
            message: String::from("slow down"),
        },
    );
    let reporter = RecordingReporter::default();

    let err = RetentionSweep::new(&cloud, &reporter, policy())
        .run(&RetentionRule::new("prod", 30), now())
        .await
        .expect_err("listing failure should abort");

    assert!(matches!(err, SweepError::List(ProviderError::Throttled { .. })));
    assert_eq!(cloud.snapshot_ids().len(), 5);
}
