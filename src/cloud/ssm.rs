//! [`SecretStore`] backed by the parameter store.

use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::types::ParameterType;

use super::{AwsContext, CloudFuture, ProviderError, Secret, SecretStore, classify_provider_error};

/// Secrets stored as encrypted parameters.
#[derive(Clone, Debug)]
pub struct SsmSecretStore {
    client: Client,
}

impl SsmSecretStore {
    /// Builds the store from a loaded SDK context.
    #[must_use]
    pub fn new(context: &AwsContext) -> Self {
        Self {
            client: context.ssm_client(),
        }
    }
}

impl SecretStore for SsmSecretStore {
    fn put_secret<'a>(
        &'a self,
        name: &'a str,
        value: &'a Secret,
        description: &'a str,
    ) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .put_parameter()
                .name(name)
                .description(description)
                .value(value.expose())
                .r#type(ParameterType::SecureString)
                .overwrite(true)
                .send()
                .await
                .map_err(|err| provider_error(name, &err))?;
            Ok(())
        })
    }

    fn get_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, Secret> {
        Box::pin(async move {
            let response = self
                .client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await
                .map_err(|err| provider_error(name, &err))?;
            let value = response
                .parameter()
                .and_then(|parameter| parameter.value())
                .ok_or(ProviderError::MissingField {
                    operation: "GetParameter",
                    field: "Parameter.Value",
                })?;
            Ok(Secret::new(value.to_owned()))
        })
    }

    fn delete_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .delete_parameter()
                .name(name)
                .send()
                .await
                .map_err(|err| provider_error(name, &err))?;
            Ok(())
        })
    }
}

fn provider_error<E>(name: &str, err: &E) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), str::to_owned);
    classify_provider_error("parameter", name, err.code(), Some(&message))
}
