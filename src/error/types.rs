//! Error types
//!
//! Each concern owns its error enum; `TfConfigError` is the umbrella the
//! commands return so the binary can print a single `[ERROR]` line.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the parameter store
#[derive(Error, Debug)]
pub enum ParameterStoreError {
    /// The request could not be completed (network, DNS, timeout)
    #[error("Parameter store request failed: {0}")]
    Transport(String),

    /// Credentials were missing, expired or rejected
    #[error("Parameter store access denied: {0}")]
    AccessDenied(String),

    /// The KMS key used to decrypt a SecureString is invalid
    #[error("Invalid KMS key: {0}")]
    InvalidKeyId(String),

    /// The store reported an internal error
    #[error("Parameter store internal error: {0}")]
    Internal(String),

    /// More names were requested than one call accepts
    #[error("Batch of {requested} names exceeds the store limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },

    #[error("Unknown parameter store error: {0}")]
    Unknown(String),
}

/// Errors raised while compiling or evaluating a reference rule
#[derive(Error, Debug)]
pub enum ReferenceRuleError {
    #[error("Malformed reference rule: {0}")]
    Compile(#[source] minijinja::Error),

    #[error("Reference rule failed for variable '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Errors raised while reading or writing dotenv files
#[derive(Error, Debug)]
pub enum DotEnvError {
    #[error("Cannot read dotEnv file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Cannot write dotEnv file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input validation failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Environment name cant be empty")]
    EmptyEnvironment,

    #[error("Environment name cant contain characters:\t {0}")]
    RestrictedCharacters(&'static str),

    #[error("Project path cant be empty")]
    EmptyPath,

    #[error("Project path '{0}' does'nt exists")]
    MissingPath(PathBuf),

    #[error("Project path '{0}' must have write permissions")]
    ReadOnlyPath(PathBuf),
}

/// Top-level error for command execution
#[derive(Error, Debug)]
pub enum TfConfigError {
    #[error(transparent)]
    ParameterStore(#[from] ParameterStoreError),

    #[error(transparent)]
    ReferenceRule(#[from] ReferenceRuleError),

    #[error(transparent)]
    DotEnv(#[from] DotEnvError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The user declined an interactive confirmation
    #[error("Abort.")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = TfConfigError> = std::result::Result<T, E>;
