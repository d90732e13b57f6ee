//! Utility modules
//!
//! Validation, filesystem checks and the confirmation prompt.

pub mod fs;
pub mod prompt;
pub mod validate;

pub use fs::{create_or_replace, file_status, find_modules, FileStatus, ModulesLocation};
pub use prompt::ask_confirm_or_skip;
pub use validate::{validate_environment, validate_project_path};
