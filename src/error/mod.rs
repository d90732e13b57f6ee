//! Error handling

mod types;

pub use types::{
    DotEnvError, ParameterStoreError, ReferenceRuleError, Result, TfConfigError, ValidationError,
};
