//! Configuration management module
//!
//! Loads settings from environment variables and builds the AWS SDK
//! configuration used by the parameter store client.

pub mod aws;
pub mod settings;

pub use aws::{create_ssm_client, AwsConfigBuilder};
pub use settings::{Settings, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY};
