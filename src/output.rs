//! Output of a resolved config map

use std::io::Write;
use std::path::PathBuf;

use crate::dotenv;
use crate::error::Result;
use crate::resolver::ConfigMap;
use crate::utils::ask_confirm_or_skip;

/// Where the resolved variables go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// `NAME=value ` pairs on stdout
    Print,
    /// `export NAME="value"` lines for `eval`
    Export,
    /// A new dotenv file, written after confirmation
    File(PathBuf),
}

/// `NAME=value ` for every entry, on a single line
pub fn format_pairs(map: &ConfigMap) -> String {
    map.iter().map(|(k, v)| format!("{k}={v} ")).collect()
}

/// One `export NAME="value"` line per entry
pub fn format_exports(map: &ConfigMap) -> String {
    map.iter()
        .map(|(k, v)| format!("export {k}=\"{}\"\n", shell_escape(v)))
        .collect()
}

// Characters still special inside double quotes.
fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Send `map` to the selected output.
///
/// `skip_confirm` bypasses the prompt before a file is written.
pub fn dispatch<W: Write>(
    mode: &OutputMode,
    map: &ConfigMap,
    stdout: &mut W,
    skip_confirm: bool,
) -> Result<()> {
    match mode {
        OutputMode::Print => {
            stdout.write_all(format_pairs(map).as_bytes())?;
            stdout.flush()?;
        }
        OutputMode::Export => {
            stdout.write_all(format_exports(map).as_bytes())?;
            stdout.flush()?;
        }
        OutputMode::File(path) => {
            ask_confirm_or_skip(skip_confirm)?;
            dotenv::write(path, map)?;
            tracing::info!("Successful.");
        }
    }
    Ok(())
}
