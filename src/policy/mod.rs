//! Declarative sanitization policy.
//!
//! A policy lists indexes to drop, and per table the constraints to drop and
//! the replacement rule for each sensitive column. Policies are read-only for
//! the duration of a run.

use std::collections::BTreeSet;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;

use crate::generators::GeneratorKind;
use crate::sql::{SqlValue, TableRef};

/// Per-column replacement rule.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sanitizer {
    /// Writes the same literal into every row.
    Static {
        /// Replacement value.
        value: SqlValue,
    },
    /// Writes a freshly generated value at execution time.
    #[serde(rename = "random", alias = "generated")]
    Generated {
        /// Registered generator.
        kind: GeneratorKind,
    },
}

impl Sanitizer {
    /// Produces the value to bind for this rule.
    pub fn value(&self, rng: &mut dyn RngCore) -> SqlValue {
        match self {
            Self::Static { value } => value.clone(),
            Self::Generated { kind } => kind.generate(rng),
        }
    }
}

/// Replacement rule for one column.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ColumnRule {
    /// Column name.
    pub name: String,
    /// How the column is rewritten.
    pub sanitizer: Sanitizer,
}

/// Rules for one table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TableRule {
    /// Table name.
    pub name: String,
    /// Optional schema qualifying the table.
    #[serde(default)]
    pub schema: Option<String>,
    /// Columns to rewrite. A table without columns only drops constraints.
    #[serde(default)]
    pub columns: Vec<ColumnRule>,
    /// Constraints dropped before any row is rewritten.
    #[serde(default)]
    pub drop_constraints: Vec<String>,
}

impl TableRule {
    /// Reference used when building statements against this table.
    #[must_use]
    pub fn table_ref(&self) -> TableRef<'_> {
        TableRef {
            schema: self.schema.as_deref(),
            name: &self.name,
        }
    }
}

/// Complete policy for one run.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SanitizationPolicy {
    /// Indexes dropped cluster-wide before rewriting data.
    #[serde(default)]
    pub drop_indexes: Vec<String>,
    /// Table rules, in file order.
    #[serde(default)]
    pub tables: Vec<TableRule>,
}

/// Errors raised while loading a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("failed to read policy file {path}: {message}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },
    /// The policy file is not a valid policy document.
    #[error("failed to parse policy file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The policy parsed but describes something that cannot run.
    #[error("invalid policy: {0}")]
    Invalid(String),
}

impl SanitizationPolicy {
    /// Reads and validates a policy from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the file is unreadable, malformed, names
    /// an unknown generator, or fails [`SanitizationPolicy::validate`].
    pub fn load(path: &Utf8Path) -> Result<Self, PolicyError> {
        let contents = read_policy_file(path)?;
        let policy: Self =
            serde_json::from_str(&contents).map_err(|source| PolicyError::Parse {
                path: path.to_string(),
                source,
            })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks the policy for names that could never be executed.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Invalid`] for blank names or duplicate columns.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for index in &self.drop_indexes {
            require_name("index", index)?;
        }
        for table in &self.tables {
            require_name("table", &table.name)?;
            if let Some(schema) = &table.schema {
                require_name("schema", schema)?;
            }
            for constraint in &table.drop_constraints {
                require_name("constraint", constraint)?;
            }
            let mut seen = BTreeSet::new();
            for column in &table.columns {
                require_name("column", &column.name)?;
                if !seen.insert(column.name.as_str()) {
                    return Err(PolicyError::Invalid(format!(
                        "column '{}' appears more than once in table '{}'",
                        column.name, table.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of statements each phase will issue.
    #[must_use]
    pub fn statement_counts(&self) -> (usize, usize, usize) {
        let constraints = self
            .tables
            .iter()
            .map(|table| table.drop_constraints.len())
            .sum();
        let updates = self
            .tables
            .iter()
            .filter(|table| !table.columns.is_empty())
            .count();
        (self.drop_indexes.len(), constraints, updates)
    }
}

fn require_name(kind: &str, name: &str) -> Result<(), PolicyError> {
    if name.trim().is_empty() {
        return Err(PolicyError::Invalid(format!("{kind} name must not be blank")));
    }
    Ok(())
}

fn read_policy_file(path: &Utf8Path) -> Result<String, PolicyError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| PolicyError::Read {
        path: path.to_string(),
        message: String::from("policy path is missing a file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| PolicyError::Read {
        path: parent.to_string(),
        message: err.to_string(),
    })?;
    dir.read_to_string(file_name)
        .map_err(|err| PolicyError::Read {
            path: path.to_string(),
            message: err.to_string(),
        })
}
