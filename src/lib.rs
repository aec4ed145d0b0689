//! Core library for the snapshot sanitizer.
//!
//! The crate clones the latest automated snapshot of a production database
//! cluster into a temporary cluster, rewrites sensitive columns according to
//! a declarative policy, snapshots the result, and shares a copy with other
//! accounts. Every temporary resource is removed afterwards, and an optional
//! retention sweep deletes shared copies past a configured age.
//!
//! The provider, secret store, and database driver sit behind the traits in
//! [`cloud`] and [`sql`], so the orchestration in [`pipeline`] can be driven
//! by the in-memory doubles in [`test_support`].

pub mod cloud;
pub mod config;
pub mod generators;
pub mod pipeline;
pub mod policy;
pub mod report;
pub mod retention;
pub mod sanitize;
pub mod sql;
pub mod test_support;
pub mod wait;

pub use cloud::{AwsContext, ClusterApi, ProviderError, SecretStore};
pub use config::{ConfigError, SanitizerConfig};
pub use generators::{GeneratorKind, UnknownGenerator};
pub use pipeline::{
    CleanupReport, PipelineError, PipelineOrchestrator, PipelineRun, PipelineSettings, Stage,
};
pub use policy::{PolicyError, SanitizationPolicy};
pub use report::{Reporter, StdoutReporter, init_tracing};
pub use retention::{RetentionRule, RetentionSweep, SweepError, SweepSummary};
pub use sanitize::{SanitizationEngine, SanitizationReport, SanitizeError};
pub use sql::{PgConnector, StatementError};
pub use wait::{WaitError, WaitPolicy, await_terminal};
