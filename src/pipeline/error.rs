//! Errors surfaced by the pipeline.

use std::fmt;

use thiserror::Error;

use crate::cloud::ProviderError;
use crate::sanitize::SanitizeError;
use crate::sql::StatementError;
use crate::wait::WaitError;

/// Pipeline stage, in execution order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Find the newest automated snapshot of the source cluster.
    LocateSnapshot,
    /// Restore and harden a temporary cluster.
    Restore,
    /// Generate, store and apply a fresh master password.
    RotateCredentials,
    /// Attach a compute instance to the temporary cluster.
    CreateInstance,
    /// Rewrite sensitive data.
    Sanitize,
    /// Snapshot the sanitized cluster.
    Snapshot,
    /// Copy and share the sanitized snapshot.
    Share,
    /// Delete temporary resources.
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::LocateSnapshot => "locate latest snapshot",
            Self::Restore => "restore cluster",
            Self::RotateCredentials => "rotate credentials",
            Self::CreateInstance => "create instance",
            Self::Sanitize => "sanitize",
            Self::Snapshot => "create sanitized snapshot",
            Self::Share => "share snapshot",
            Self::Cleanup => "clean up",
        })
    }
}

/// Errors returned by [`super::PipelineOrchestrator::execute`].
///
/// `message` fields carry the underlying failure text and, when compensation
/// ran, a note describing any teardown that also failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source cluster has no automated snapshots.
    #[error("no automated snapshots found for cluster '{cluster_id}'")]
    NotFound {
        /// Source cluster identifier.
        cluster_id: String,
    },
    /// A provider call failed.
    #[error("{stage} failed: {message}")]
    Provider {
        /// Stage that failed.
        stage: Stage,
        /// Human-readable description of the failure.
        message: String,
        /// Provider error.
        #[source]
        source: ProviderError,
    },
    /// A resource did not reach its terminal state in time.
    #[error("{stage} timed out: {message}")]
    Timeout {
        /// Stage that failed.
        stage: Stage,
        /// Human-readable description of the failure.
        message: String,
        /// Wait error.
        #[source]
        source: WaitError,
    },
    /// The cloned database could not be reached.
    #[error("failed to connect to the temporary cluster: {message}")]
    Connect {
        /// Human-readable description of the failure.
        message: String,
        /// Driver error.
        #[source]
        source: StatementError,
    },
    /// A sanitization statement failed.
    #[error("sanitization failed: {message}")]
    Sanitize {
        /// Human-readable description of the failure.
        message: String,
        /// Sanitization error.
        #[source]
        source: SanitizeError,
    },
    /// The run succeeded but temporary resources could not all be removed.
    #[error("shared snapshot '{shared_snapshot_id}' created but cleanup failed: {message}")]
    Teardown {
        /// Snapshot the run produced.
        shared_snapshot_id: String,
        /// Description of every failed cleanup step.
        message: String,
    },
}

impl PipelineError {
    /// Stage the error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::NotFound { .. } => Stage::LocateSnapshot,
            Self::Provider { stage, .. } | Self::Timeout { stage, .. } => *stage,
            Self::Connect { .. } | Self::Sanitize { .. } => Stage::Sanitize,
            Self::Teardown { .. } => Stage::Cleanup,
        }
    }

    pub(super) fn provider(stage: Stage, source: ProviderError) -> Self {
        Self::Provider {
            stage,
            message: source.to_string(),
            source,
        }
    }

    pub(super) fn wait(stage: Stage, source: WaitError) -> Self {
        match source {
            WaitError::Provider(provider) => Self::provider(stage, provider),
            timeout @ WaitError::Timeout { .. } => Self::Timeout {
                stage,
                message: timeout.to_string(),
                source: timeout,
            },
        }
    }

    /// Appends a note about failed compensation to the error message.
    #[must_use]
    pub(super) fn with_teardown_note(self, note: Option<String>) -> Self {
        let Some(teardown) = note else {
            return self;
        };
        let annotate = |message: String| format!("{message} (teardown also failed: {teardown})");
        match self {
            Self::Provider {
                stage,
                message,
                source,
            } => Self::Provider {
                stage,
                message: annotate(message),
                source,
            },
            Self::Timeout {
                stage,
                message,
                source,
            } => Self::Timeout {
                stage,
                message: annotate(message),
                source,
            },
            Self::Connect { message, source } => Self::Connect {
                message: annotate(message),
                source,
            },
            Self::Sanitize { message, source } => Self::Sanitize {
                message: annotate(message),
                source,
            },
            other @ (Self::NotFound { .. } | Self::Teardown { .. }) => other,
        }
    }
}
