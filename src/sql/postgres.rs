//! PostgreSQL execution over an `sqlx` pool.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::debug;

use super::{
    ColumnTypes, ConnectionParams, Connector, SqlFuture, Statement, StatementError,
    StatementExecutor, TableRef,
};

/// Live columns of one relation with their unmodified type names.
const COLUMN_TYPES_QUERY: &str = "SELECT a.attname::text, format_type(a.atttypid, NULL) \
     FROM pg_catalog.pg_attribute a \
     WHERE a.attrelid = $1::regclass AND a.attnum > 0 AND NOT a.attisdropped";

/// Opens TLS-only pools against PostgreSQL-compatible clusters.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgConnector;

impl Connector for PgConnector {
    type Executor = PgExecutor;

    fn connect<'a>(&'a self, params: &'a ConnectionParams) -> SqlFuture<'a, Self::Executor> {
        Box::pin(async move {
            let mut options = PgConnectOptions::new()
                .host(&params.host)
                .port(params.port)
                .database(&params.database)
                .username(&params.username)
                .password(params.password.expose())
                .ssl_mode(PgSslMode::Require);
            if let Some(limit) = params.statement_timeout {
                options = options.options([("statement_timeout", limit.as_millis())]);
            }

            debug!(
                host = %params.host,
                port = params.port,
                database = %params.database,
                max_connections = params.max_connections,
                "opening connection pool"
            );
            let pool = PgPoolOptions::new()
                .max_connections(params.max_connections)
                .connect_with(options)
                .await
                .map_err(|source| StatementError::Connect {
                    host: params.host.clone(),
                    port: params.port,
                    database: params.database.clone(),
                    source,
                })?;
            Ok(PgExecutor { pool })
        })
    }
}

/// Statement executor over a bounded pool.
#[derive(Clone, Debug)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl StatementExecutor for PgExecutor {
    fn execute<'a>(&'a self, statement: &'a Statement) -> SqlFuture<'a, u64> {
        Box::pin(async move {
            let mut query = sqlx::query(&statement.text);
            for param in &statement.params {
                query = query.bind(param.to_literal());
            }
            let result = query
                .execute(&self.pool)
                .await
                .map_err(|source| StatementError::Execute {
                    statement: statement.text.clone(),
                    source,
                })?;
            Ok(result.rows_affected())
        })
    }

    fn column_types<'a>(&'a self, table: TableRef<'a>) -> SqlFuture<'a, ColumnTypes> {
        Box::pin(async move {
            let relation = table.quoted()?;
            let rows: Vec<(String, String)> = sqlx::query_as(COLUMN_TYPES_QUERY)
                .bind(relation.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|source| StatementError::Execute {
                    statement: format!("{COLUMN_TYPES_QUERY} [{relation}]"),
                    source,
                })?;
            debug!(table = %relation, columns = rows.len(), "resolved column types");
            Ok(rows.into_iter().collect())
        })
    }
}
