//! tfconfig library
//!
//! Resolves `.env` files against AWS SSM Parameter Store and generates the
//! Terraform environment and backend files.

// Public modules
pub mod commands;
pub mod config;
pub mod dotenv;
pub mod error;
pub mod logging;
pub mod output;
pub mod resolver;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Result, TfConfigError};
pub use resolver::{ConfigMap, ParameterStore, ReferenceRule, SecretResolver};
