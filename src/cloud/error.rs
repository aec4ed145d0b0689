//! Provider error classification.
//!
//! SDK failures are classified by their error code rather than by matching
//! on rendered messages.

use thiserror::Error;

/// Errors raised by the cloud provider seam.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProviderError {
    /// The addressed resource does not exist.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Resource kind (for example `cluster`).
        resource: &'static str,
        /// Resource identifier.
        id: String,
    },
    /// A resource entered a state it cannot leave while being waited on.
    #[error("{resource} '{id}' entered terminal state '{status}'")]
    TerminalState {
        /// Resource kind.
        resource: &'static str,
        /// Resource identifier.
        id: String,
        /// Status reported by the provider.
        status: String,
    },
    /// The provider throttled the request.
    #[error("provider rate limit exceeded: {message}")]
    Throttled {
        /// Message returned by the provider.
        message: String,
    },
    /// A response lacked a field the pipeline depends on.
    #[error("provider response for {operation} is missing {field}")]
    MissingField {
        /// Operation whose response was incomplete.
        operation: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// Any other provider failure.
    #[error("provider error [{}]: {message}", .code.as_deref().unwrap_or("unknown"))]
    Sdk {
        /// Provider error code, when one was returned.
        code: Option<String>,
        /// Provider error message.
        message: String,
    },
}

impl ProviderError {
    /// Whether the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Error codes the provider returns for missing resources.
const NOT_FOUND_CODES: &[&str] = &[
    "DBClusterNotFoundFault",
    "DBInstanceNotFound",
    "DBInstanceNotFoundFault",
    "DBClusterSnapshotNotFoundFault",
    "ParameterNotFound",
];

/// Error codes the provider returns when rate limiting.
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Classifies a provider error from its code and message.
#[must_use]
pub fn classify_provider_error(
    resource: &'static str,
    id: &str,
    code: Option<&str>,
    message: Option<&str>,
) -> ProviderError {
    let text = message.unwrap_or("unknown error").to_owned();
    match code {
        Some(found) if NOT_FOUND_CODES.contains(&found) => ProviderError::NotFound {
            resource,
            id: id.to_owned(),
        },
        Some(found) if THROTTLING_CODES.contains(&found) => {
            ProviderError::Throttled { message: text }
        }
        _ => ProviderError::Sdk {
            code: code.map(str::to_owned),
            message: text,
        },
    }
}
