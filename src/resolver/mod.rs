//! Secret reference resolution
//!
//! Turns `ssm://` style indirections in a dotenv map into the values stored
//! in the parameter store:
//!
//! 1. [`ReferenceRule`] decides per entry whether the value is a reference and
//!    extracts the remote parameter name.
//! 2. [`plan`] deduplicates the names and slices them into batches that fit
//!    the store's per-request limit.
//! 3. [`SecretResolver`] issues one [`ParameterStore`] call per batch.
//! 4. [`merge`] writes the results back under the original variable names.

use std::collections::{BTreeMap, HashMap};

mod engine;
mod merger;
mod planner;
mod reference;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{ResolutionReport, SecretResolver};
pub use merger::{merge, MergeSummary};
pub use planner::{plan, unique_names, Batch};
pub use reference::ReferenceRule;
pub use store::{ParameterStore, ParametersResponse};

/// Rule used when none is configured: everything after an `ssm://` marker.
pub const DEFAULT_REFERENCE_RULE: &str =
    r#"{% if has_prefix(Value, "ssm://") %}{{ trim_prefix(Value, "ssm://") }}{% endif %}"#;

/// Upper bound of names per `GetParameters` call
pub const MAX_BATCH_SIZE: usize = 10;

/// Placeholder written for parameters the store reports as invalid
pub const VALUE_NOT_EXISTS: &str = "VALUE_NOT_EXISTS";

/// Variable name to raw value, as read from a dotenv file
pub type ConfigMap = BTreeMap<String, String>;

/// Outcomes keyed by the parameter name as requested
pub type Outcomes = HashMap<String, ResolutionOutcome>;

/// A local variable whose value should be replaced by a remote parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    pub env_var: String,
    pub parameter: String,
}

impl ParameterBinding {
    pub fn new(env_var: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            parameter: parameter.into(),
        }
    }
}

/// Result of looking up one parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(String),
    NotFound,
}

/// Key used for case-insensitive parameter matching
pub(crate) fn normalize(name: &str) -> String {
    name.to_lowercase()
}
