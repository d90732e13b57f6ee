//! Application settings and configuration
//!
//! Settings are read from environment variables with sensible defaults and
//! may be overridden by command-line flags afterwards.

use anyhow::{Context, Result};
use std::env;

use crate::resolver::{DEFAULT_REFERENCE_RULE, MAX_BATCH_SIZE};

/// Default number of names fetched per `GetParameters` call
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default number of batches in flight at once
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Main application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub log_level: String,

    // AWS settings
    pub aws_region: Option<String>,
    pub ssm_endpoint_url: Option<String>,

    // Resolution settings
    pub batch_size: usize,
    pub concurrency: usize,
    pub reference_rule: String,
    pub decrypt: bool,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        let settings = Self {
            app_name: env_or_default("APP_NAME", "tfconfig"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            aws_region: env::var("AWS_REGION").ok().filter(|r| !r.is_empty()),
            ssm_endpoint_url: env::var("SSM_ENDPOINT_URL").ok().filter(|u| !u.is_empty()),

            batch_size: env_or_default("TFCONFIG_BATCH_SIZE", "10")
                .parse()
                .context("Invalid TFCONFIG_BATCH_SIZE value")?,
            concurrency: env_or_default("TFCONFIG_CONCURRENCY", "4")
                .parse()
                .context("Invalid TFCONFIG_CONCURRENCY value")?,
            reference_rule: env_or_default("TFCONFIG_REFERENCE_RULE", DEFAULT_REFERENCE_RULE),
            decrypt: parse_flag(&env_or_default("TFCONFIG_DECRYPT", "true"))
                .context("Invalid TFCONFIG_DECRYPT value")?,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("Batch size must be > 0");
        }
        if self.batch_size > MAX_BATCH_SIZE {
            anyhow::bail!(
                "Batch size {} exceeds the Parameter Store limit of {}",
                self.batch_size,
                MAX_BATCH_SIZE
            );
        }
        if self.concurrency == 0 {
            anyhow::bail!("Concurrency must be > 0");
        }
        if self.reference_rule.trim().is_empty() {
            anyhow::bail!("Reference rule cannot be empty");
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "tfconfig".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            aws_region: None,
            ssm_endpoint_url: None,
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            reference_rule: DEFAULT_REFERENCE_RULE.to_string(),
            decrypt: true,
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`
fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "tfconfig");
        assert_eq!(settings.batch_size, 10);
        assert!(settings.decrypt);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut settings = Settings::default();
        settings.batch_size = 0;
        assert!(settings.validate().is_err());

        settings.batch_size = MAX_BATCH_SIZE + 1;
        assert!(settings.validate().is_err());

        settings.batch_size = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut settings = Settings::default();
        settings.concurrency = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_blank_rule_rejected() {
        let mut settings = Settings::default();
        settings.reference_rule = "   ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
