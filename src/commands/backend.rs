//! `backend` command
//!
//! Renders the Terraform S3 backend config from the environment's
//! `environment.env` and the project's `terraform.env`.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::templates::{self, BACKEND_TEMPLATE};
use super::{show_opts, AppContext, ENVIRONMENTS_DIR, MODULES_DIR};
use crate::dotenv;
use crate::resolver::ConfigMap;
use crate::utils::{
    ask_confirm_or_skip, create_or_replace, file_status, find_modules, validate_environment,
    FileStatus,
};

/// Default output file for the backend config
pub const DEFAULT_BACKEND_CONFIG: &str = "terraform-backend.tfconf";

/// Per-environment settings inside the modules checkout
pub const ENVIRONMENT_CONFIG: &str = "environment.env";

/// Default project-specific settings file
pub const DEFAULT_PROJECT_CONFIG: &str = "terraform.env";

/// Generate backend configuration
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Environment name
    pub environment: String,

    /// Where the backend config is saved, relative to the project
    #[arg(long, default_value = DEFAULT_BACKEND_CONFIG)]
    pub backend_config: PathBuf,

    /// Project specific config, relative to the project
    #[arg(long, default_value = DEFAULT_PROJECT_CONFIG)]
    pub project_config: PathBuf,
}

/// Values substituted into the backend template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackendConfig {
    pub environment: String,
    pub region: String,
    pub terraform_state_bucket: String,
    pub terraform_state_key: String,
    pub terraform_lock_table: String,
    pub kms_key_arn: String,
}

impl BackendConfig {
    /// Pick the backend values out of the environment and project files.
    ///
    /// Missing keys render as empty strings, with a warning.
    pub fn from_maps(environment: &str, environment_env: &ConfigMap, project_env: &ConfigMap) -> Self {
        Self {
            environment: environment.to_string(),
            region: lookup(environment_env, "REGION"),
            terraform_state_bucket: lookup(environment_env, "TERRAFORM_STATE_BUCKET"),
            terraform_lock_table: lookup(environment_env, "TERRAFORM_LOCK_TABLE"),
            kms_key_arn: lookup(environment_env, "KMS_KEY_ARN"),
            terraform_state_key: lookup(project_env, "TERRAFORM_STATE_KEY"),
        }
    }

    pub fn render(&self) -> Result<String> {
        templates::render(BACKEND_TEMPLATE, self).context("Failed to render backend config")
    }
}

fn lookup(map: &ConfigMap, key: &str) -> String {
    match map.get(key) {
        Some(value) => value.clone(),
        None => {
            tracing::warn!("Key '{}' is not set, leaving it empty", key);
            String::new()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn execute(ctx: &AppContext, args: &BackendArgs) -> Result<()> {
    ctx.validate_path()?;

    show_opts("Environment", &args.environment);
    validate_environment(&args.environment)?;

    let modules = find_modules(&ctx.project_path, MODULES_DIR)?
        .ok_or_else(|| anyhow!("Cant find '{}' dir", MODULES_DIR))?;

    let environment_config = modules
        .absolute
        .join(ENVIRONMENTS_DIR)
        .join(&args.environment)
        .join(ENVIRONMENT_CONFIG);
    show_opts("Environment config path", environment_config.display());
    if !file_status(&environment_config).exists() {
        return Err(anyhow!("Environment config '{}' not exists", ENVIRONMENT_CONFIG));
    }

    let project_config = ctx.project_path.join(&args.project_config);
    show_opts("Project config path", project_config.display());
    if !file_status(&project_config).exists() {
        return Err(anyhow!("Project config '{}' not exists", file_name(&project_config)));
    }

    let backend_config = ctx.project_path.join(&args.backend_config);
    show_opts("Backend config path", backend_config.display());
    match file_status(&backend_config) {
        FileStatus::Writable => tracing::warn!(
            "Backend config '{}' exists and will be overridden",
            file_name(&backend_config)
        ),
        FileStatus::ReadOnly => {
            return Err(anyhow!(
                "Backend config '{}' exists, but dont have write permissions",
                file_name(&backend_config)
            ));
        }
        FileStatus::Missing => tracing::info!(
            "Backend config '{}' does'nt exists and will be created",
            file_name(&backend_config)
        ),
    }

    let config = BackendConfig::from_maps(
        &args.environment,
        &dotenv::read(&environment_config)?,
        &dotenv::read(&project_config)?,
    );

    ask_confirm_or_skip(ctx.ci)?;

    create_or_replace(&backend_config, &config.render()?)
        .with_context(|| format!("Cannot write '{}'", backend_config.display()))?;

    tracing::info!("Successfully generated: {}", file_name(&backend_config));
    Ok(())
}
