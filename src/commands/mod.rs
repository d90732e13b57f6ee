//! Subcommands
//!
//! Every command receives an [`AppContext`] carrying the global flags and
//! settings instead of reaching for process-wide state.

pub mod backend;
pub mod dotenv;
pub mod env;
mod templates;

use std::fmt::Display;
use std::path::PathBuf;

use crate::config::Settings;
use crate::utils::validate_project_path;

pub use backend::BackendArgs;
pub use dotenv::DotEnvArgs;
pub use env::EnvArgs;

/// Name of the shared Terraform modules checkout
pub const MODULES_DIR: &str = "aws-terraform-modules";

/// Directory inside the modules checkout holding one folder per environment
pub const ENVIRONMENTS_DIR: &str = "environment";

/// Global state shared by all commands
#[derive(Debug, Clone)]
pub struct AppContext {
    pub project_path: PathBuf,
    /// Skip interactive confirmations
    pub ci: bool,
    pub settings: Settings,
}

impl AppContext {
    pub fn new(project_path: PathBuf, ci: bool, settings: Settings) -> Self {
        Self {
            project_path,
            ci,
            settings,
        }
    }

    /// Log and validate the project path
    pub fn validate_path(&self) -> anyhow::Result<()> {
        show_opts("Path", self.project_path.display());
        validate_project_path(&self.project_path)?;
        Ok(())
    }
}

/// Log one `Name:<tab>value` option line
pub fn show_opts(name: &str, value: impl Display) {
    tracing::info!("{}:\t{}", name, value);
}
