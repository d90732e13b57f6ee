//! tfconfig
//!
//! Terraform configuration helper: resolves `.env` files against AWS SSM
//! Parameter Store and switches environments of Terraform projects.

use anyhow::Result;
use clap::{builder::FalseyValueParser, Parser, Subcommand};
use std::path::PathBuf;
use tfconfig::{
    commands::{self, AppContext, BackendArgs, DotEnvArgs, EnvArgs},
    config::Settings,
    logging::{init_tracing, LoggingOptions},
};

/// Terraform configuration helper
#[derive(Parser, Debug)]
#[command(name = "tfconfig")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Terraform project (defaults to the current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Run in CI mode: confirmations are skipped
    #[arg(short, long, env = "CI", value_parser = FalseyValueParser::new(), global = true)]
    ci: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log AWS SDK internals
    #[arg(long, global = true)]
    aws_debug: bool,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a .env file or print configuration resolved from Parameter Store
    Dotenv(DotEnvArgs),
    /// Switch the project environment
    Env(EnvArgs),
    /// Generate the Terraform backend configuration
    Backend(BackendArgs),
}

impl Cli {
    /// Flag level first, then `--verbose`, then quiet printing, then settings
    fn log_level(&self, configured: Option<&str>) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        if self.verbose {
            return "debug".to_string();
        }
        if let Command::Dotenv(args) = &self.command {
            if args.is_quiet() {
                return "warn".to_string();
            }
        }
        configured.unwrap_or("info").to_string()
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use log_level)
    let settings = Settings::load();

    let options = LoggingOptions {
        level: cli.log_level(settings.as_ref().ok().map(|s| s.log_level.as_str())),
        aws_debug: cli.aws_debug,
    };
    if let Err(err) = init_tracing(&options) {
        eprintln!("[ERROR]  {err:#}");
        std::process::exit(1);
    }

    let result = match settings {
        Ok(settings) => run(cli, settings).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let project_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    tracing::debug!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        "Starting"
    );

    let ctx = AppContext::new(project_path, cli.ci, settings);

    match &cli.command {
        Command::Dotenv(args) => commands::dotenv::execute(&ctx, args).await,
        Command::Env(args) => commands::env::execute(&ctx, args),
        Command::Backend(args) => commands::backend::execute(&ctx, args),
    }
}
