//! Services module
//!
//! External service integrations.

pub mod ssm;

pub use ssm::SsmParameterStore;
