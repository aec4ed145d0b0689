//! Unit tests for the sanitization engine.

use std::time::Duration;

use super::*;
use crate::policy::{ColumnRule, Sanitizer, TableRule};
use crate::generators::GeneratorKind;
use crate::sql::SqlValue;
use crate::test_support::{ExecutorEvent, RecordingExecutor, RecordingReporter};
use rstest::{fixture, rstest};

fn column(name: &str, sanitizer: Sanitizer) -> ColumnRule {
    ColumnRule {
        name: name.to_owned(),
        sanitizer,
    }
}

fn generated(kind: &str) -> Sanitizer {
    Sanitizer::Generated {
        kind: GeneratorKind::parse(kind).unwrap_or_else(|err| panic!("{err}")),
    }
}

fn fixed(value: &str) -> Sanitizer {
    Sanitizer::Static {
        value: SqlValue::from(value),
    }
}

#[fixture]
fn users_policy() -> SanitizationPolicy {
    SanitizationPolicy {
        drop_indexes: vec![String::from("users")],
        tables: vec![TableRule {
            name: String::from("users"),
            schema: None,
            columns: vec![column("email", generated("email")), column("name", fixed("redacted"))],
            drop_constraints: vec![String::from("users")],
        }],
    }
}

#[rstest]
#[tokio::test]
async fn drops_finish_before_any_update_starts(users_policy: SanitizationPolicy) {
    let executor = RecordingExecutor::new()
        .with_delay("DROP INDEX", Duration::from_millis(20))
        .with_delay("DROP CONSTRAINT", Duration::from_millis(10));
    let reporter = RecordingReporter::default();

    SanitizationEngine::new(&executor, &reporter)
        .run(&users_policy)
        .await
        .unwrap_or_else(|err| panic!("sanitize failed: {err}"));

    let events = executor.events();
    let position = |wanted: &ExecutorEvent| {
        events
            .iter()
            .position(|event| event == wanted)
            .unwrap_or_else(|| panic!("missing event {wanted:?}"))
    };
    let index = "DROP INDEX IF EXISTS \"users\"".to_owned();
    let constraint = "ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users\"".to_owned();
    let update = "UPDATE \"users\" SET (\"email\", \"name\") = ROW($1, $2)".to_owned();

    assert!(position(&ExecutorEvent::Finished(index)) < position(&ExecutorEvent::Started(constraint.clone())));
    assert!(position(&ExecutorEvent::Finished(constraint)) < position(&ExecutorEvent::Started(update)));
}

#[rstest]
#[tokio::test]
async fn update_binds_generated_then_static_values(users_policy: SanitizationPolicy) {
    let executor = RecordingExecutor::new();
    let reporter = RecordingReporter::default();

    SanitizationEngine::new(&executor, &reporter)
        .run(&users_policy)
        .await
        .unwrap_or_else(|err| panic!("sanitize failed: {err}"));

    let update = executor
        .statements()
        .into_iter()
        .find(|statement| statement.text.starts_with("UPDATE"))
        .unwrap_or_else(|| panic!("no update issued"));
    assert_eq!(
        update.text,
        "UPDATE \"users\" SET (\"email\", \"name\") = ROW($1, $2)"
    );
    assert_eq!(update.params.len(), 2);
    match update.params.first() {
        Some(SqlValue::Text(email)) => assert!(email.contains('@'), "{email}"),
        other => panic!("unexpected first parameter {other:?}"),
    }
    assert_eq!(update.params.get(1), Some(&SqlValue::from("redacted")));
    assert!(!update.text.contains("redacted"));
    assert!(reporter.lines().contains(&update.text));
}

#[rstest]
#[tokio::test]
async fn update_casts_to_catalog_types_and_binds_null() {
    let policy = SanitizationPolicy {
        drop_indexes: Vec::new(),
        tables: vec![TableRule {
            name: String::from("people"),
            schema: None,
            columns: vec![
                column("dob", fixed("1970-01-01")),
                column("joined", generated("date_time")),
                column(
                    "note",
                    Sanitizer::Static {
                        value: SqlValue::Null,
                    },
                ),
            ],
            drop_constraints: Vec::new(),
        }],
    };
    let executor = RecordingExecutor::new().with_column_types(
        "people",
        &[
            ("dob", "date"),
            ("joined", "timestamp without time zone"),
            ("note", "text"),
        ],
    );
    let reporter = RecordingReporter::default();

    SanitizationEngine::new(&executor, &reporter)
        .run(&policy)
        .await
        .unwrap_or_else(|err| panic!("sanitize failed: {err}"));

    let statements = executor.statements();
    let update = statements
        .first()
        .unwrap_or_else(|| panic!("no update issued"));
    assert_eq!(
        update.text,
        "UPDATE \"people\" SET (\"dob\", \"joined\", \"note\") = \
         ROW($1::date, $2::timestamp without time zone, $3::text)"
    );
    assert_eq!(update.params.len(), 3);
    assert_eq!(update.params.first(), Some(&SqlValue::from("1970-01-01")));
    assert!(matches!(update.params.get(1), Some(SqlValue::Timestamp(_))));
    assert_eq!(update.params.get(2), Some(&SqlValue::Null));
}

#[rstest]
#[tokio::test]
async fn reports_rows_affected_per_table() {
    let policy = SanitizationPolicy {
        drop_indexes: Vec::new(),
        tables: vec![
            TableRule {
                name: String::from("users"),
                schema: None,
                columns: vec![column("name", fixed("x"))],
                drop_constraints: Vec::new(),
            },
            TableRule {
                name: String::from("audit"),
                schema: None,
                columns: Vec::new(),
                drop_constraints: vec![String::from("audit_user_fk")],
            },
            TableRule {
                name: String::from("orders"),
                schema: Some(String::from("billing")),
                columns: vec![column("note", fixed("y"))],
                drop_constraints: Vec::new(),
            },
        ],
    };
    let executor = RecordingExecutor::new()
        .with_rows("UPDATE \"users\"", 17)
        .with_rows("UPDATE \"billing\".\"orders\"", 3);
    let reporter = RecordingReporter::default();

    let report = SanitizationEngine::new(&executor, &reporter)
        .run(&policy)
        .await
        .unwrap_or_else(|err| panic!("sanitize failed: {err}"));

    assert_eq!(
        report.tables,
        vec![
            TableRows {
                table: String::from("users"),
                rows: 17
            },
            TableRows {
                table: String::from("orders"),
                rows: 3
            },
        ]
    );
    assert_eq!(report.total_rows(), 20);
    assert_eq!(report.constraints_dropped, 1);
}

#[rstest]
#[tokio::test]
async fn failing_drop_stops_before_rewrite(users_policy: SanitizationPolicy) {
    let executor = RecordingExecutor::new().failing_on("DROP CONSTRAINT");
    let reporter = RecordingReporter::default();

    let err = SanitizationEngine::new(&executor, &reporter)
        .run(&users_policy)
        .await
        .expect_err("constraint failure should abort");

    assert_eq!(err.phase, Phase::DropConstraints);
    assert!(
        executor
            .statements()
            .iter()
            .all(|statement| !statement.text.starts_with("UPDATE"))
    );
}

#[rstest]
#[tokio::test]
async fn invalid_identifier_fails_before_execution() {
    let policy = SanitizationPolicy {
        drop_indexes: vec![String::from("bad\0index")],
        tables: Vec::new(),
    };
    let executor = RecordingExecutor::new();
    let reporter = RecordingReporter::default();

    let err = SanitizationEngine::new(&executor, &reporter)
        .run(&policy)
        .await
        .expect_err("NUL identifier should be rejected");

    assert_eq!(err.phase, Phase::DropIndexes);
    assert!(executor.statements().is_empty());
}
