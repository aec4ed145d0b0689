//! Statement construction and the execution seam used by the sanitizer.
//!
//! Every statement is built here from policy-supplied names. Names only ever
//! reach SQL text through [`quote_identifier`]; values only ever travel as
//! bound parameters. Parameters are sent as text and cast to the column type
//! reported by the server catalog, so a literal such as `"1970-01-01"` can
//! land in a `date` or enum column.

mod postgres;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::cloud::Secret;

pub use postgres::{PgConnector, PgExecutor};

/// Scalar value written into a sanitized column.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "serde_json::Value")]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp with time zone.
    Timestamp(DateTime<Utc>),
    /// UUID.
    Uuid(Uuid),
}

/// A policy value that cannot be written into a column.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("static sanitizer values must be scalars, found {kind}")]
pub struct UnsupportedValue {
    /// JSON kind that was rejected.
    pub kind: &'static str,
}

impl TryFrom<serde_json::Value> for SqlValue {
    type Error = UnsupportedValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(flag) => Ok(Self::Bool(flag)),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .ok_or(UnsupportedValue {
                    kind: "out-of-range number",
                }),
            Value::String(text) => Ok(Self::Text(text)),
            Value::Array(_) => Err(UnsupportedValue { kind: "array" }),
            Value::Object(_) => Err(UnsupportedValue { kind: "object" }),
        }
    }
}

impl SqlValue {
    /// Text form sent to the server, or `None` for `NULL`.
    #[must_use]
    pub fn to_literal(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Int(number) => Some(number.to_string()),
            Self::Float(number) => Some(number.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Date(date) => Some(date.to_string()),
            Self::Timestamp(timestamp) => Some(timestamp.to_rfc3339()),
            Self::Uuid(id) => Some(id.hyphenated().to_string()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Parameterized statement ready for execution.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// SQL text with `$n` placeholders.
    pub text: String,
    /// Values bound to the placeholders, in order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    fn without_params(text: String) -> Self {
        Self {
            text,
            params: Vec::new(),
        }
    }
}

/// Table addressed by a statement, optionally schema-qualified.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TableRef<'a> {
    /// Schema name; the connection's search path applies when unset.
    pub schema: Option<&'a str>,
    /// Table name.
    pub name: &'a str,
}

impl<'a> TableRef<'a> {
    /// Unqualified table reference.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { schema: None, name }
    }

    /// Renders the quoted, possibly qualified, table name.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::InvalidIdentifier`] when either part cannot
    /// be quoted.
    pub fn quoted(&self) -> Result<String, StatementError> {
        let table = quote_identifier(self.name)?;
        match self.schema {
            Some(schema) => Ok(format!("{}.{table}", quote_identifier(schema)?)),
            None => Ok(table),
        }
    }
}

/// Quotes an identifier for inclusion in SQL text.
///
/// Embedded double quotes are doubled, so any name round-trips as exactly one
/// identifier.
///
/// # Errors
///
/// Returns [`StatementError::InvalidIdentifier`] for empty names and names
/// containing NUL, which PostgreSQL cannot represent.
pub fn quote_identifier(name: &str) -> Result<String, StatementError> {
    if name.is_empty() {
        return Err(StatementError::InvalidIdentifier {
            identifier: String::new(),
            reason: "identifier is empty",
        });
    }
    if name.contains('\0') {
        return Err(StatementError::InvalidIdentifier {
            identifier: name.replace('\0', "\\0"),
            reason: "identifier contains a NUL character",
        });
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// `DROP INDEX IF EXISTS <index>`.
///
/// # Errors
///
/// Returns [`StatementError::InvalidIdentifier`] for unquotable names.
pub fn drop_index(index: &str) -> Result<Statement, StatementError> {
    Ok(Statement::without_params(format!(
        "DROP INDEX IF EXISTS {}",
        quote_identifier(index)?
    )))
}

/// `ALTER TABLE <table> DROP CONSTRAINT IF EXISTS <constraint>`.
///
/// # Errors
///
/// Returns [`StatementError::InvalidIdentifier`] for unquotable names.
pub fn drop_constraint(table: TableRef<'_>, constraint: &str) -> Result<Statement, StatementError> {
    Ok(Statement::without_params(format!(
        "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
        table.quoted()?,
        quote_identifier(constraint)?
    )))
}

/// Column name to SQL type name, as rendered by `format_type`.
pub type ColumnTypes = BTreeMap<String, String>;

/// `UPDATE <table> SET (<col>, ...) = ROW($1, ...)` with no `WHERE` clause.
///
/// Every value, `NULL` included, becomes one bound parameter. Placeholders
/// of columns found in `column_types` carry a cast to that type.
///
/// # Errors
///
/// Returns [`StatementError::EmptyUpdate`] when `assignments` is empty and
/// [`StatementError::InvalidIdentifier`] for unquotable names.
pub fn update_table(
    table: TableRef<'_>,
    assignments: Vec<(&str, SqlValue)>,
    column_types: &ColumnTypes,
) -> Result<Statement, StatementError> {
    if assignments.is_empty() {
        return Err(StatementError::EmptyUpdate {
            table: table.name.to_owned(),
        });
    }

    let mut columns = Vec::with_capacity(assignments.len());
    let mut slots = Vec::with_capacity(assignments.len());
    let mut params = Vec::with_capacity(assignments.len());

    for (column, value) in assignments {
        columns.push(quote_identifier(column)?);
        params.push(value);
        let mut slot = format!("${}", params.len());
        if let Some(type_name) = column_types.get(column) {
            write!(slot, "::{type_name}").ok();
        }
        slots.push(slot);
    }

    Ok(Statement {
        text: format!(
            "UPDATE {} SET ({}) = ROW({})",
            table.quoted()?,
            columns.join(", "),
            slots.join(", ")
        ),
        params,
    })
}

/// Everything needed to open a pool against the cloned database.
#[derive(Clone, Debug)]
pub struct ConnectionParams {
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: Secret,
    /// Pool size; bounds concurrent statements.
    pub max_connections: u32,
    /// Optional server-side per-statement timeout.
    pub statement_timeout: Option<Duration>,
}

/// Errors raised while building or executing statements.
#[derive(Debug, Error)]
pub enum StatementError {
    /// A policy-supplied name cannot be used as an identifier.
    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// Offending name, with NUL characters escaped.
        identifier: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
    /// An update was requested without any column assignments.
    #[error("update of table '{table}' has no columns")]
    EmptyUpdate {
        /// Table name.
        table: String,
    },
    /// The pool could not be opened.
    #[error("failed to connect to {host}:{port}/{database}: {source}")]
    Connect {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Target database.
        database: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// A statement failed on the server or in transit.
    #[error("statement failed: {statement}: {source}")]
    Execute {
        /// SQL text of the failing statement.
        statement: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
}

/// Future returned by the execution seam.
pub type SqlFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StatementError>> + Send + 'a>>;

/// Executes statements, each on its own pooled connection.
pub trait StatementExecutor: Send + Sync {
    /// Runs one statement and returns the number of rows it affected.
    fn execute<'a>(&'a self, statement: &'a Statement) -> SqlFuture<'a, u64>;

    /// Types of the live columns of `table`.
    fn column_types<'a>(&'a self, table: TableRef<'a>) -> SqlFuture<'a, ColumnTypes>;
}

/// Opens executors for a set of connection parameters.
pub trait Connector: Send + Sync {
    /// Executor produced by a successful connection.
    type Executor: StatementExecutor;

    /// Opens a bounded pool.
    fn connect<'a>(&'a self, params: &'a ConnectionParams) -> SqlFuture<'a, Self::Executor>;
}

#[cfg(test)]
mod tests;
