//! SSM Parameter Store service
//!
//! Implements [`ParameterStore`] on top of the `GetParameters` API.

use async_trait::async_trait;
use aws_sdk_ssm::{
    error::ProvideErrorMetadata, operation::get_parameters::GetParametersError,
    Client as SsmSdkClient,
};
use aws_smithy_runtime_api::client::result::SdkError;
use std::error::Error as StdError;

use crate::error::ParameterStoreError;
use crate::resolver::{ParameterStore, ParametersResponse, MAX_BATCH_SIZE};

/// Error codes that mean the caller's credentials were not accepted
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDeniedException",
    "UnrecognizedClientException",
    "ExpiredTokenException",
    "InvalidSignatureException",
];

/// Parameter store backed by AWS SSM.
#[derive(Clone)]
pub struct SsmParameterStore {
    client: SsmSdkClient,
}

impl SsmParameterStore {
    pub fn new(client: SsmSdkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<ParametersResponse, ParameterStoreError> {
        if names.len() > MAX_BATCH_SIZE {
            return Err(ParameterStoreError::BatchTooLarge {
                requested: names.len(),
                limit: MAX_BATCH_SIZE,
            });
        }

        tracing::debug!(
            names = names.len(),
            with_decryption,
            "Calling SSM GetParameters"
        );

        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(ParameterStoreError::from_get_parameters_error)?;

        let resolved = output
            .parameters()
            .iter()
            .filter_map(|p| Some((p.name()?.to_string(), p.value()?.to_string())))
            .collect();

        Ok(ParametersResponse {
            resolved,
            invalid: output.invalid_parameters().to_vec(),
        })
    }
}

impl ParameterStoreError {
    /// Classify a `GetParameters` SDK error
    pub fn from_get_parameters_error<R>(err: SdkError<GetParametersError, R>) -> Self
    where
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(service_err) => {
                let error = service_err.err();
                match error {
                    GetParametersError::InternalServerError(e) => ParameterStoreError::Internal(
                        e.message().unwrap_or("Internal server error").to_string(),
                    ),
                    GetParametersError::InvalidKeyId(e) => ParameterStoreError::InvalidKeyId(
                        e.message().unwrap_or("Invalid key id").to_string(),
                    ),
                    _ if error.code().is_some_and(|c| ACCESS_DENIED_CODES.contains(&c)) => {
                        ParameterStoreError::AccessDenied(
                            error.message().unwrap_or("Access denied").to_string(),
                        )
                    }
                    _ => ParameterStoreError::Unknown(format!(
                        "{}: {}",
                        error.code().unwrap_or("Unhandled"),
                        error.message().unwrap_or("no message")
                    )),
                }
            }
            SdkError::TimeoutError(_)
            | SdkError::DispatchFailure(_)
            | SdkError::ResponseError(_) => ParameterStoreError::Transport(error_chain(&err)),
            _ => ParameterStoreError::Unknown(error_chain(&err)),
        }
    }
}

/// Render an error and all of its sources on one line
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::types::error::{InternalServerError, InvalidKeyId};
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    fn service_error(err: GetParametersError) -> SdkError<GetParametersError, HttpResponse> {
        let response = HttpResponse::new(StatusCode::try_from(400).unwrap(), SdkBody::empty());
        SdkError::service_error(err, response)
    }

    #[test]
    fn test_internal_server_error_is_classified() {
        let err = service_error(GetParametersError::InternalServerError(
            InternalServerError::builder().message("boom").build(),
        ));
        assert!(matches!(
            ParameterStoreError::from_get_parameters_error(err),
            ParameterStoreError::Internal(msg) if msg == "boom"
        ));
    }

    #[test]
    fn test_invalid_key_is_classified() {
        let err = service_error(GetParametersError::InvalidKeyId(
            InvalidKeyId::builder().message("bad key").build(),
        ));
        assert!(matches!(
            ParameterStoreError::from_get_parameters_error(err),
            ParameterStoreError::InvalidKeyId(_)
        ));
    }

    #[test]
    fn test_timeout_is_transport() {
        let err: SdkError<GetParametersError, HttpResponse> =
            SdkError::timeout_error("deadline exceeded");
        assert!(matches!(
            ParameterStoreError::from_get_parameters_error(err),
            ParameterStoreError::Transport(_)
        ));
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "refused");
        let outer = anyhow::Error::new(inner).context("dispatch failure");
        let boxed: &(dyn StdError + 'static) = outer.as_ref();
        assert_eq!(error_chain(boxed), "dispatch failure: refused");
    }
}
