//! Configuration loading via `ortho-config`.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::{MIN_CAPACITY, PipelineSettings};
use crate::retention::{DEFAULT_RETENTION_DAYS, RetentionRule};
use crate::wait::{DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_MAX_INTERVALS, WaitPolicy};

/// Default location of the sanitization policy.
pub const DEFAULT_POLICY_FILE: &str = "sanitizer-policy.json";

/// Configuration file name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "snapshot-sanitizer.toml";

/// Sanitizer settings derived from environment variables and configuration
/// files.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq)]
#[ortho_config(
    prefix = "SANITIZER",
    discovery(
        app_name = "snapshot-sanitizer",
        env_var = "SANITIZER_CONFIG_PATH",
        config_file_name = "snapshot-sanitizer.toml",
        dotfile_name = ".snapshot-sanitizer.toml",
        project_file_name = "snapshot-sanitizer.toml"
    )
)]
pub struct SanitizerConfig {
    /// Production cluster whose latest automated snapshot is cloned. Required.
    #[ortho_config(default = String::new())]
    pub rds_cluster_id: String,
    /// Serverless capacity ceiling of the temporary cluster, in capacity
    /// units.
    #[ortho_config(default = 2.0)]
    pub rds_instance_acu: f64,
    /// Connection pool size used while sanitizing.
    #[ortho_config(default = 20)]
    pub sql_max_connections: u32,
    /// Encryption key for the shared copy. The sanitized snapshot's key is
    /// kept when unset.
    pub share_kms_key_id: Option<String>,
    /// Comma-separated accounts granted restore permission on the shared
    /// copy. Sharing is skipped when empty.
    pub share_account_ids: Option<String>,
    /// Region holding the sanitized snapshot when the shared copy is made.
    /// Falls back to `AWS_REGION`, then `AWS_DEFAULT_REGION`.
    pub aws_region: Option<String>,
    /// Run the retention sweep after a successful pipeline.
    #[ortho_config(default = false)]
    pub delete_old_snapshots: bool,
    /// Age in days after which shared snapshots are swept.
    #[ortho_config(default = DEFAULT_RETENTION_DAYS)]
    pub old_snapshots_days: u32,
    /// Path to the JSON sanitization policy.
    #[ortho_config(default = DEFAULT_POLICY_FILE.to_owned())]
    pub policy_file: String,
    /// Seconds between provider status checks.
    #[ortho_config(default = DEFAULT_WAIT_INTERVAL.as_secs())]
    pub wait_interval_secs: u64,
    /// Number of short waits attempted before a stage times out.
    #[ortho_config(default = DEFAULT_WAIT_MAX_INTERVALS)]
    pub wait_max_intervals: u32,
    /// Server-side statement timeout applied while sanitizing. No timeout
    /// when unset.
    pub sql_statement_timeout_secs: Option<u64>,
    /// Tear down temporary resources when a stage fails.
    #[ortho_config(default = true)]
    pub cleanup_on_failure: bool,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to {CONFIG_FILE_NAME}",
            self.description, self.env_var, self.toml_key
        ))
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::Invalid(format!(
            "{} {reason}: check {} or {} in {CONFIG_FILE_NAME}",
            self.description, self.env_var, self.toml_key
        ))
    }
}

const CLUSTER_ID: FieldMetadata = FieldMetadata::new(
    "source cluster identifier",
    "SANITIZER_RDS_CLUSTER_ID",
    "rds_cluster_id",
);
const INSTANCE_ACU: FieldMetadata = FieldMetadata::new(
    "serverless capacity ceiling",
    "SANITIZER_RDS_INSTANCE_ACU",
    "rds_instance_acu",
);
const MAX_CONNECTIONS: FieldMetadata = FieldMetadata::new(
    "SQL pool size",
    "SANITIZER_SQL_MAX_CONNECTIONS",
    "sql_max_connections",
);
const ACCOUNT_IDS: FieldMetadata = FieldMetadata::new(
    "share account list",
    "SANITIZER_SHARE_ACCOUNT_IDS",
    "share_account_ids",
);
const POLICY_FILE: FieldMetadata =
    FieldMetadata::new("policy file", "SANITIZER_POLICY_FILE", "policy_file");
const WAIT_MAX_INTERVALS: FieldMetadata = FieldMetadata::new(
    "wait attempt budget",
    "SANITIZER_WAIT_MAX_INTERVALS",
    "wait_max_intervals",
);
const STATEMENT_TIMEOUT: FieldMetadata = FieldMetadata::new(
    "statement timeout",
    "SANITIZER_SQL_STATEMENT_TIMEOUT_SECS",
    "sql_statement_timeout_secs",
);

impl SanitizerConfig {
    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, and environment variables in that order
    /// of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("snapshot-sanitizer")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and configuration key to fix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required value is blank
    /// and [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rds_cluster_id.trim().is_empty() {
            return Err(CLUSTER_ID.missing());
        }
        if self.policy_file.trim().is_empty() {
            return Err(POLICY_FILE.missing());
        }
        if !self.rds_instance_acu.is_finite() || self.rds_instance_acu < MIN_CAPACITY {
            return Err(INSTANCE_ACU.invalid(&format!("must be at least {MIN_CAPACITY}")));
        }
        if self.sql_max_connections == 0 {
            return Err(MAX_CONNECTIONS.invalid("must be at least 1"));
        }
        if self.wait_max_intervals == 0 {
            return Err(WAIT_MAX_INTERVALS.invalid("must be at least 1"));
        }
        if self.sql_statement_timeout_secs == Some(0) {
            return Err(STATEMENT_TIMEOUT.invalid("must be at least 1 second when set"));
        }
        let accounts = self.account_ids();
        if accounts
            .iter()
            .any(|account| !account.chars().all(|ch| ch.is_ascii_digit()))
        {
            return Err(ACCOUNT_IDS.invalid("must be comma-separated numeric account ids"));
        }
        Ok(())
    }

    /// Accounts to share with, trimmed, with blank entries dropped.
    #[must_use]
    pub fn account_ids(&self) -> Vec<String> {
        self.share_account_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|account| !account.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Source region passed with the snapshot copy, when one is known.
    #[must_use]
    pub fn source_region(&self) -> Option<String> {
        self.aws_region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .map(str::to_owned)
            .or_else(|| env_region("AWS_REGION"))
            .or_else(|| env_region("AWS_DEFAULT_REGION"))
    }

    /// Polling budget for every wait.
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_secs(self.wait_interval_secs),
            self.wait_max_intervals,
        )
    }

    /// Server-side statement timeout, when configured.
    #[must_use]
    pub fn statement_timeout(&self) -> Option<Duration> {
        self.sql_statement_timeout_secs.map(Duration::from_secs)
    }

    /// Policy file location.
    #[must_use]
    pub fn policy_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.policy_file)
    }

    /// Pipeline settings for this configuration.
    #[must_use]
    pub fn pipeline_settings(&self, local: bool) -> PipelineSettings {
        PipelineSettings {
            source_cluster_id: self.rds_cluster_id.trim().to_owned(),
            max_capacity: self.rds_instance_acu,
            max_connections: self.sql_max_connections,
            share_kms_key_id: self.share_kms_key_id.clone(),
            share_account_ids: self.account_ids(),
            source_region: self.source_region(),
            local,
            wait: self.wait_policy(),
            statement_timeout: self.statement_timeout(),
            cleanup_on_failure: self.cleanup_on_failure,
        }
    }

    /// Retention rule for shared copies of the source cluster.
    #[must_use]
    pub fn retention_rule(&self) -> RetentionRule {
        RetentionRule::new(self.rds_cluster_id.trim(), self.old_snapshots_days)
    }
}

fn env_region(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|region| !region.trim().is_empty())
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is out of range.
    #[error("invalid configuration value: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
