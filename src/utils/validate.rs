//! Input validation

use std::path::Path;

use crate::error::ValidationError;
use crate::utils::fs::is_writable;

/// Characters not allowed in an environment name
pub const RESTRICTED_CHARACTERS: &str = " -_\\/~!@#$^&*)(=+`][;:'\"?><}{,.";

/// Check that `environment` can be used to build file and module paths
pub fn validate_environment(environment: &str) -> Result<(), ValidationError> {
    if environment.is_empty() {
        return Err(ValidationError::EmptyEnvironment);
    }
    if environment.contains(|c| RESTRICTED_CHARACTERS.contains(c)) {
        return Err(ValidationError::RestrictedCharacters(RESTRICTED_CHARACTERS));
    }
    Ok(())
}

/// Check that the project path exists and can be written to
pub fn validate_project_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if !path.exists() {
        return Err(ValidationError::MissingPath(path.to_path_buf()));
    }
    if !is_writable(path) {
        return Err(ValidationError::ReadOnlyPath(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plain_environment_names_pass() {
        assert!(validate_environment("dev").is_ok());
        assert!(validate_environment("staging2").is_ok());
    }

    #[test]
    fn test_empty_environment_fails() {
        assert_eq!(
            validate_environment(""),
            Err(ValidationError::EmptyEnvironment)
        );
    }

    #[test]
    fn test_restricted_characters_fail() {
        for name in ["my-env", "my_env", "a b", "../prod", "prod.", "x$y"] {
            assert!(
                matches!(
                    validate_environment(name),
                    Err(ValidationError::RestrictedCharacters(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_project_path_checks() {
        let dir = tempdir().unwrap();
        assert!(validate_project_path(dir.path()).is_ok());
        assert_eq!(
            validate_project_path(Path::new("")),
            Err(ValidationError::EmptyPath)
        );
        assert!(matches!(
            validate_project_path(&dir.path().join("missing")),
            Err(ValidationError::MissingPath(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_project_path_fails() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let result = validate_project_path(dir.path());

        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
        if crate::utils::fs::running_as_root() {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ValidationError::ReadOnlyPath(_))));
        }
    }
}
