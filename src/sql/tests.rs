//! Unit tests for statement construction.

use super::*;
use rstest::rstest;

#[rstest]
#[case("users", "\"users\"")]
#[case("Mixed Case", "\"Mixed Case\"")]
#[case("evil\"; DROP TABLE x; --", "\"evil\"\"; DROP TABLE x; --\"")]
fn quote_identifier_wraps_and_doubles_quotes(#[case] name: &str, #[case] expected: &str) {
    let quoted = quote_identifier(name).unwrap_or_else(|err| panic!("quote failed: {err}"));
    assert_eq!(quoted, expected);
}

#[rstest]
#[case("")]
#[case("bad\0name")]
fn quote_identifier_rejects_unrepresentable_names(#[case] name: &str) {
    let err = quote_identifier(name).expect_err("name should be rejected");
    assert!(matches!(err, StatementError::InvalidIdentifier { .. }));
}

#[test]
fn update_binds_every_value_as_a_parameter() {
    let statement = update_table(
        TableRef::new("users"),
        vec![
            ("email", SqlValue::from("someone@example.org")),
            ("name", SqlValue::from("redacted")),
        ],
        &ColumnTypes::new(),
    )
    .unwrap_or_else(|err| panic!("build failed: {err}"));

    assert_eq!(
        statement.text,
        "UPDATE \"users\" SET (\"email\", \"name\") = ROW($1, $2)"
    );
    assert_eq!(
        statement.params,
        vec![
            SqlValue::from("someone@example.org"),
            SqlValue::from("redacted")
        ]
    );
    assert!(!statement.text.contains("redacted"));
}

#[test]
fn update_casts_placeholders_to_known_column_types() {
    let types = ColumnTypes::from([
        (String::from("deleted_at"), String::from("timestamp with time zone")),
        (String::from("mood"), String::from("public.mood")),
    ]);
    let statement = update_table(
        TableRef::new("users"),
        vec![
            ("deleted_at", SqlValue::Null),
            ("age", SqlValue::Int(42)),
            ("mood", SqlValue::from("calm")),
        ],
        &types,
    )
    .unwrap_or_else(|err| panic!("build failed: {err}"));

    assert_eq!(
        statement.text,
        "UPDATE \"users\" SET (\"deleted_at\", \"age\", \"mood\") = \
         ROW($1::timestamp with time zone, $2, $3::public.mood)"
    );
    assert_eq!(
        statement.params,
        vec![SqlValue::Null, SqlValue::Int(42), SqlValue::from("calm")]
    );
}

#[rstest]
#[case(SqlValue::Null, None)]
#[case(SqlValue::Bool(false), Some("false"))]
#[case(SqlValue::Int(-3), Some("-3"))]
#[case(SqlValue::Float(2.5), Some("2.5"))]
#[case(SqlValue::from("1970-01-01"), Some("1970-01-01"))]
#[case(
    SqlValue::Date(NaiveDate::from_ymd_opt(2001, 2, 3).unwrap_or_default()),
    Some("2001-02-03")
)]
#[case(SqlValue::Uuid(Uuid::nil()), Some("00000000-0000-0000-0000-000000000000"))]
fn values_travel_as_text_literals(#[case] value: SqlValue, #[case] expected: Option<&str>) {
    assert_eq!(value.to_literal().as_deref(), expected);
}

#[test]
fn update_without_columns_is_rejected() {
    let err = update_table(TableRef::new("users"), Vec::new(), &ColumnTypes::new())
        .expect_err("empty update");
    assert!(matches!(err, StatementError::EmptyUpdate { table } if table == "users"));
}

#[test]
fn schema_qualified_tables_quote_both_parts() {
    let table = TableRef {
        schema: Some("billing"),
        name: "invoices",
    };
    let statement = drop_constraint(table, "invoices_customer_fk")
        .unwrap_or_else(|err| panic!("build failed: {err}"));
    assert_eq!(
        statement.text,
        "ALTER TABLE \"billing\".\"invoices\" DROP CONSTRAINT IF EXISTS \"invoices_customer_fk\""
    );
    assert!(statement.params.is_empty());
}

#[test]
fn drop_index_is_idempotent_sql() {
    let statement = drop_index("users_email_idx").unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(statement.text, "DROP INDEX IF EXISTS \"users_email_idx\"");
}

#[rstest]
#[case(serde_json::json!(null), SqlValue::Null)]
#[case(serde_json::json!(true), SqlValue::Bool(true))]
#[case(serde_json::json!(7), SqlValue::Int(7))]
#[case(serde_json::json!(1.5), SqlValue::Float(1.5))]
#[case(serde_json::json!("x"), SqlValue::Text(String::from("x")))]
fn scalar_json_values_deserialize(#[case] raw: serde_json::Value, #[case] expected: SqlValue) {
    let value: SqlValue =
        serde_json::from_value(raw).unwrap_or_else(|err| panic!("decode failed: {err}"));
    assert_eq!(value, expected);
}

#[rstest]
#[case(serde_json::json!([1, 2]))]
#[case(serde_json::json!({"a": 1}))]
fn composite_json_values_are_rejected(#[case] raw: serde_json::Value) {
    let result = serde_json::from_value::<SqlValue>(raw);
    assert!(result.is_err());
}
