//! `dotenv` command
//!
//! Reads `.env.<environment>`, resolves Parameter Store references and prints
//! the result, prints it as `export` statements, or writes it to a new file.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{show_opts, AppContext};
use crate::config::{create_ssm_client, Settings};
use crate::dotenv;
use crate::output::{self, OutputMode};
use crate::resolver::{ParameterStore, ReferenceRule, ResolutionReport, SecretResolver};
use crate::services::SsmParameterStore;
use crate::utils::{file_status, validate_environment, FileStatus};

/// Prefix of the per-environment source file
pub const DOTENV_FILE_PREFIX: &str = ".env.";

/// Generate a .env file or expose configuration from Parameter Store
#[derive(Args, Debug, Clone, Default)]
pub struct DotEnvArgs {
    /// Environment name
    pub environment: String,

    /// dotEnv file the configuration will be saved to instead of printed
    #[arg(value_name = "DOT_ENV_FILE")]
    pub dot_env_file: Option<PathBuf>,

    /// Decrypt SecureString parameters (default)
    #[arg(short = 'd', long, overrides_with = "no_decrypt")]
    pub decrypt: bool,

    /// Return SecureString parameters encrypted
    #[arg(long, overrides_with = "decrypt")]
    pub no_decrypt: bool,

    /// Print vars prepared for eval as `export VAR_NAME="value"`
    #[arg(short, long)]
    pub export: bool,

    /// Parameters fetched per request (max 10)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Requests in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Template deciding which values are Parameter Store references
    #[arg(long)]
    pub reference_rule: Option<String>,
}

impl DotEnvArgs {
    /// Printing modes keep stdout for the variables and log only warnings
    pub fn is_quiet(&self) -> bool {
        self.dot_env_file.is_none()
    }

    /// Apply command-line overrides to `settings`
    fn settings(&self, base: &Settings) -> Result<Settings> {
        let mut settings = base.clone();
        if let Some(batch_size) = self.batch_size {
            settings.batch_size = batch_size;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(rule) = &self.reference_rule {
            settings.reference_rule = rule.clone();
        }
        if self.no_decrypt {
            settings.decrypt = false;
        } else if self.decrypt {
            settings.decrypt = true;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Validated inputs and output of a `dotenv` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEnvPlan {
    pub source: PathBuf,
    pub output: OutputMode,
}

/// Check the environment, source and destination before anything is fetched
pub fn validate(ctx: &AppContext, args: &DotEnvArgs) -> Result<DotEnvPlan> {
    ctx.validate_path()?;

    show_opts("Environment", &args.environment);
    validate_environment(&args.environment)?;

    let source_name = format!("{DOTENV_FILE_PREFIX}{}", args.environment);
    show_opts("Source dotEnv file", &source_name);
    let source = ctx.project_path.join(&source_name);
    if !file_status(&source).exists() {
        return Err(anyhow!("dotEnv file: '{}' does'nt exists", source_name));
    }

    let output = match &args.dot_env_file {
        None if args.export => OutputMode::Export,
        None => OutputMode::Print,
        Some(destination) => {
            show_opts("Destination dotEnv file", destination.display());
            check_destination(ctx, &source_name, destination)?
        }
    };

    Ok(DotEnvPlan { source, output })
}

fn check_destination(ctx: &AppContext, source_name: &str, destination: &Path) -> Result<OutputMode> {
    let path = ctx.project_path.join(destination);

    match file_status(&path) {
        FileStatus::ReadOnly => {
            return Err(anyhow!(
                "dotEnv file: '{}' exists, but does'nt have write permissions",
                destination.display()
            ));
        }
        FileStatus::Writable => {
            tracing::warn!(
                "dotEnv file '{}' exists and will be overridden",
                destination.display()
            );
        }
        FileStatus::Missing => {}
    }

    if destination
        .to_string_lossy()
        .eq_ignore_ascii_case(source_name)
    {
        return Err(anyhow!(
            "Source dotEnv file '{}' and destination dotEnv file '{}' must be different",
            source_name,
            destination.display()
        ));
    }

    Ok(OutputMode::File(path))
}

/// Run the command against AWS SSM
pub async fn execute(ctx: &AppContext, args: &DotEnvArgs) -> Result<()> {
    let plan = validate(ctx, args)?;

    let client = create_ssm_client(&ctx.settings).await;
    let store = Arc::new(SsmParameterStore::new(client));

    run_plan(ctx, args, &plan, store, &mut io::stdout()).await?;
    Ok(())
}

/// Resolve the source file of `plan` against `store` and dispatch the result
pub async fn run_plan<W: Write>(
    ctx: &AppContext,
    args: &DotEnvArgs,
    plan: &DotEnvPlan,
    store: Arc<dyn ParameterStore>,
    stdout: &mut W,
) -> Result<ResolutionReport> {
    let settings = args.settings(&ctx.settings)?;
    let rule = ReferenceRule::new(settings.reference_rule.clone())?;

    let mut map = dotenv::read(&plan.source)?;
    tracing::debug!(variables = map.len(), "Read source dotEnv file");

    let resolver = SecretResolver::new(rule, store)
        .with_batch_size(settings.batch_size)
        .with_concurrency(settings.concurrency)
        .with_decrypt(settings.decrypt);

    let report = resolver
        .resolve(&mut map)
        .await
        .context("Failed to resolve parameters")?;

    tracing::debug!(
        bindings = report.bindings,
        unique_names = report.unique_names,
        batches = report.batches,
        resolved = report.resolved,
        invalid = report.invalid,
        "Resolution finished"
    );

    output::dispatch(&plan.output, &map, stdout, ctx.ci)?;

    Ok(report)
}
