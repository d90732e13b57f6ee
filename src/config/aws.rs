//! AWS SDK configuration
//!
//! Builds the SSM client, supporting an explicit region and a custom endpoint
//! URL for LocalStack-style testing.

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_sdk_ssm::Client as SsmSdkClient;

use crate::config::Settings;

/// AWS configuration builder
///
/// Region resolution tries the configured region first and then falls back
/// to the default provider chain (env vars, profile, instance metadata).
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base AWS SDK configuration
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let region_provider =
            RegionProviderChain::first_try(self.settings.aws_region.clone().map(Region::new))
                .or_default_provider();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        match sdk_config.region() {
            Some(region) => tracing::debug!(region = %region, "Resolved AWS region"),
            None => tracing::warn!("No AWS region configured, set AWS_REGION or a profile region"),
        }

        sdk_config
    }

    /// SSM client, pointed at `SSM_ENDPOINT_URL` when one is configured
    pub async fn build_ssm_client(&self) -> SsmSdkClient {
        let sdk_config = self.build_sdk_config().await;

        if let Some(endpoint_url) = &self.settings.ssm_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom SSM endpoint");

            let ssm_config = aws_sdk_ssm::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            SsmSdkClient::from_conf(ssm_config)
        } else {
            SsmSdkClient::new(&sdk_config)
        }
    }
}

/// Shorthand for `AwsConfigBuilder::new(settings).build_ssm_client()`
pub async fn create_ssm_client(settings: &Settings) -> SsmSdkClient {
    AwsConfigBuilder::new(settings).build_ssm_client().await
}
