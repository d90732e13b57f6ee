//! `env` command
//!
//! Points the project's `environment.tf` at the config module of the chosen
//! environment.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use minijinja::context;

use super::templates::{self, ENVIRONMENT_TEMPLATE, WARNING_HEADER};
use super::{show_opts, AppContext, ENVIRONMENTS_DIR, MODULES_DIR};
use crate::utils::{
    ask_confirm_or_skip, create_or_replace, file_status, find_modules, validate_environment,
    FileStatus,
};

/// Root Terraform file that must exist in the project
pub const CONFIG_FILE: &str = "config.tf";

/// Generated file selecting the environment
pub const ENVIRONMENT_FILE: &str = "environment.tf";

/// Name of the config module inside each environment
pub const CONFIG_MODULE_NAME: &str = "config";

/// Switch project environment
#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// Environment name
    #[arg(env = "TF_ENV")]
    pub environment: String,
}

/// Module source for `environment`, relative to the project
pub fn module_source(modules_dir: &str, environment: &str) -> String {
    format!("{modules_dir}/{ENVIRONMENTS_DIR}/{environment}/{CONFIG_MODULE_NAME}")
}

/// Contents of `environment.tf`
pub fn render_environment_config(source: &str) -> Result<String> {
    templates::render(
        ENVIRONMENT_TEMPLATE,
        context! {
            header => WARNING_HEADER,
            module_name => CONFIG_MODULE_NAME,
            source => source,
        },
    )
    .context("Failed to render environment config")
}

pub fn execute(ctx: &AppContext, args: &EnvArgs) -> Result<()> {
    ctx.validate_path()?;

    let config_file = ctx.project_path.join(CONFIG_FILE);
    show_opts("Config", config_file.display());
    if !file_status(&config_file).exists() {
        return Err(anyhow!("Configuration file '{}' does'nt exists", CONFIG_FILE));
    }

    show_opts("Environment", &args.environment);
    validate_environment(&args.environment)?;

    let environment_file = ctx.project_path.join(ENVIRONMENT_FILE);
    match file_status(&environment_file) {
        FileStatus::Writable => {
            tracing::warn!("Environment file '{}' exists and will be overridden", ENVIRONMENT_FILE)
        }
        FileStatus::ReadOnly => {
            return Err(anyhow!(
                "Environment file '{}' exists, but dont have write permissions",
                ENVIRONMENT_FILE
            ));
        }
        FileStatus::Missing => {
            tracing::info!("Environment file '{}' does'nt exists and will be created", ENVIRONMENT_FILE)
        }
    }

    let modules = find_modules(&ctx.project_path, MODULES_DIR)?
        .ok_or_else(|| anyhow!("Cant find '{}' dir", MODULES_DIR))?;

    let source = module_source(&modules.relative, &args.environment);
    tracing::info!("Module source will be: '{}'", source);

    ask_confirm_or_skip(ctx.ci)?;

    let content = render_environment_config(&source)?;
    create_or_replace(&environment_file, &content)
        .with_context(|| format!("Cannot write '{}'", environment_file.display()))?;

    tracing::info!("Environment successfully switched: {}", args.environment);
    Ok(())
}
