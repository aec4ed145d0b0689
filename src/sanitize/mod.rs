//! Rewrites sensitive data inside a cloned database.
//!
//! Work runs in three phases: drop indexes, drop constraints, rewrite rows.
//! Statements inside a phase run concurrently and the next phase starts only
//! once every statement of the previous one has finished. Concurrency is
//! bounded by the executor's pool, not by this module.

use std::fmt;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::policy::SanitizationPolicy;
use crate::report::Reporter;
use crate::sql::{self, ColumnTypes, Statement, StatementError, StatementExecutor};

/// Sanitization phase, in execution order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// `DROP INDEX IF EXISTS` for every policy index.
    DropIndexes,
    /// `ALTER TABLE .. DROP CONSTRAINT IF EXISTS` for every table constraint.
    DropConstraints,
    /// One unconditional `UPDATE` per table with columns.
    RewriteRows,
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::DropIndexes => "drop indexes",
            Self::DropConstraints => "drop constraints",
            Self::RewriteRows => "rewrite rows",
        })
    }
}

/// Errors raised by [`SanitizationEngine::run`].
#[derive(Debug, Error)]
#[error("sanitization failed during {phase}: {source}")]
pub struct SanitizeError {
    /// Phase that failed.
    pub phase: Phase,
    /// First statement failure observed.
    #[source]
    pub source: StatementError,
}

impl SanitizeError {
    const fn new(phase: Phase, source: StatementError) -> Self {
        Self { phase, source }
    }
}

/// Rows rewritten in one table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableRows {
    /// Table name as written in the policy.
    pub table: String,
    /// Rows affected by the update.
    pub rows: u64,
}

/// Audit output of a sanitization run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SanitizationReport {
    /// Indexes dropped (or already absent).
    pub indexes_dropped: usize,
    /// Constraints dropped (or already absent).
    pub constraints_dropped: usize,
    /// Per-table row counts, in policy order.
    pub tables: Vec<TableRows>,
}

impl SanitizationReport {
    /// Rows rewritten across every table.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|table| table.rows).sum()
    }
}

/// Applies a [`SanitizationPolicy`] through a [`StatementExecutor`].
pub struct SanitizationEngine<'a, E> {
    executor: &'a E,
    reporter: &'a dyn Reporter,
}

impl<'a, E> SanitizationEngine<'a, E>
where
    E: StatementExecutor,
{
    /// Creates an engine over an open executor.
    pub const fn new(executor: &'a E, reporter: &'a dyn Reporter) -> Self {
        Self { executor, reporter }
    }

    /// Runs every phase of `policy` in order.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError`] as soon as any statement cannot be built or
    /// fails; later phases do not start.
    pub async fn run(&self, policy: &SanitizationPolicy) -> Result<SanitizationReport, SanitizeError> {
        let (index_count, constraint_count, update_count) = policy.statement_counts();
        info!(
            indexes = index_count,
            constraints = constraint_count,
            tables = update_count,
            "starting sanitization"
        );

        let drops = policy
            .drop_indexes
            .iter()
            .map(|index| sql::drop_index(index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SanitizeError::new(Phase::DropIndexes, err))?;
        self.run_phase(Phase::DropIndexes, &drops).await?;

        let constraints = policy
            .tables
            .iter()
            .flat_map(|table| {
                table
                    .drop_constraints
                    .iter()
                    .map(move |constraint| sql::drop_constraint(table.table_ref(), constraint))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SanitizeError::new(Phase::DropConstraints, err))?;
        self.run_phase(Phase::DropConstraints, &constraints).await?;

        let column_types = self
            .column_types(policy)
            .await
            .map_err(|err| SanitizeError::new(Phase::RewriteRows, err))?;
        let (tables, updates) = build_updates(policy, &column_types)
            .map_err(|err| SanitizeError::new(Phase::RewriteRows, err))?;
        let counts = self.run_phase(Phase::RewriteRows, &updates).await?;

        let report = SanitizationReport {
            indexes_dropped: drops.len(),
            constraints_dropped: constraints.len(),
            tables: tables
                .into_iter()
                .zip(counts)
                .map(|(table, rows)| TableRows { table, rows })
                .collect(),
        };
        info!(rows = report.total_rows(), "sanitization finished");
        Ok(report)
    }

    /// Column types of every table that gets rewritten, in policy order.
    async fn column_types(
        &self,
        policy: &SanitizationPolicy,
    ) -> Result<Vec<ColumnTypes>, StatementError> {
        try_join_all(
            policy
                .tables
                .iter()
                .filter(|table| !table.columns.is_empty())
                .map(|table| self.executor.column_types(table.table_ref())),
        )
        .await
    }

    async fn run_phase(
        &self,
        phase: Phase,
        statements: &[Statement],
    ) -> Result<Vec<u64>, SanitizeError> {
        debug!(%phase, statements = statements.len(), "starting phase");
        try_join_all(statements.iter().map(|statement| self.execute(statement)))
            .await
            .map_err(|err| SanitizeError::new(phase, err))
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, StatementError> {
        self.reporter.line(&statement.text);
        debug!(sql = %statement.text, params = statement.params.len(), "executing statement");
        self.executor.execute(statement).await
    }
}

/// Builds one update per table that has columns, drawing generated values
/// now so each run gets fresh ones.
fn build_updates(
    policy: &SanitizationPolicy,
    column_types: &[ColumnTypes],
) -> Result<(Vec<String>, Vec<Statement>), StatementError> {
    let mut rng = rand::rng();
    let mut tables = Vec::new();
    let mut statements = Vec::new();
    let rewritten = policy.tables.iter().filter(|table| !table.columns.is_empty());
    for (table, types) in rewritten.zip(column_types) {
        let assignments = table
            .columns
            .iter()
            .map(|column| (column.name.as_str(), column.sanitizer.value(&mut rng)))
            .collect();
        statements.push(sql::update_table(table.table_ref(), assignments, types)?);
        tables.push(table.name.clone());
    }
    Ok((tables, statements))
}

#[cfg(test)]
mod tests;
