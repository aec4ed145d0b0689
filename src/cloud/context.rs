//! Shared AWS SDK configuration.

use std::fmt;
use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};

/// Loaded SDK configuration from which service clients are built.
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
}

impl AwsContext {
    /// Loads credentials and region from the standard provider chain.
    pub async fn load() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            config: Arc::new(config),
        }
    }

    /// Region the clients will address, if one was resolved.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.config
            .region()
            .map(|region| AsRef::<str>::as_ref(region))
    }

    /// Builds a database service client.
    #[must_use]
    pub fn rds_client(&self) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::new(&self.config)
    }

    /// Builds a parameter store client.
    #[must_use]
    pub fn ssm_client(&self) -> aws_sdk_ssm::Client {
        aws_sdk_ssm::Client::new(&self.config)
    }
}

impl fmt::Debug for AwsContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AwsContext")
            .field("region", &self.region())
            .finish_non_exhaustive()
    }
}
