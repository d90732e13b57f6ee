//! Filesystem helpers

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directories searched for the modules folder, relative to the project
pub const SEARCH_PATHS: &[&str] = &["./", "../", "../../", "../../../", "../../../../"];

/// State of a destination file before it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Missing,
    Writable,
    ReadOnly,
}

impl FileStatus {
    pub fn exists(self) -> bool {
        self != FileStatus::Missing
    }
}

/// Inspect `path` without opening it
pub fn file_status(path: &Path) -> FileStatus {
    if fs::metadata(path).is_err() {
        return FileStatus::Missing;
    }
    if is_writable(path) {
        FileStatus::Writable
    } else {
        FileStatus::ReadOnly
    }
}

/// Whether the current user may write to `path`
#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

/// Whether the current user may write to `path`
#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Write permission checks are bypassed for the superuser
#[cfg(test)]
pub(crate) fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Where the modules directory was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulesLocation {
    /// Path relative to the project, e.g. `../aws-terraform-modules`
    pub relative: String,
    pub absolute: PathBuf,
}

/// Look for a directory (or symlink) named `dir_name` in the project and
/// up to four parents. Names are compared case-insensitively.
pub fn find_modules(project: &Path, dir_name: &str) -> io::Result<Option<ModulesLocation>> {
    for prefix in SEARCH_PATHS {
        let search_path = project.join(prefix);
        let Ok(entries) = fs::read_dir(&search_path) else {
            continue;
        };

        tracing::debug!("Looking in '{}'", search_path.display());

        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if name.eq_ignore_ascii_case(dir_name) && (file_type.is_dir() || file_type.is_symlink()) {
                let absolute = fs::canonicalize(&search_path)?.join(&name);
                tracing::info!("Found '{}' in '{}'", dir_name, absolute.display());
                return Ok(Some(ModulesLocation {
                    relative: format!("{prefix}{name}"),
                    absolute,
                }));
            }
        }
    }

    Ok(None)
}

/// Write `content` to `path`, creating or truncating the file
pub fn create_or_replace(path: &Path, content: &str) -> io::Result<()> {
    let existed = path.exists();
    fs::write(path, content)?;
    if existed {
        tracing::debug!("Replaced '{}'", path.display());
    } else {
        tracing::debug!("Created '{}'", path.display());
    }
    Ok(())
}
