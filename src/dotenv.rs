//! Reading and writing dotenv files
//!
//! Parsing is delegated to `dotenvy`. Files are written sorted by key, with
//! integers bare and everything else double-quoted using escapes `dotenvy`
//! reads back.

use std::fs;
use std::path::Path;

use crate::error::DotEnvError;
use crate::resolver::ConfigMap;

/// Read a dotenv file into a map.
///
/// Later assignments of the same key win.
pub fn read(path: &Path) -> Result<ConfigMap, DotEnvError> {
    let read_error = |source| DotEnvError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut map = ConfigMap::new();
    for item in dotenvy::from_path_iter(path).map_err(read_error)? {
        let (key, value) = item.map_err(read_error)?;
        map.insert(key, value);
    }

    Ok(map)
}

/// Serialize `map` in dotenv format, one assignment per line
pub fn marshal(map: &ConfigMap) -> String {
    let mut out = String::new();
    for (key, value) in map {
        if value.parse::<i64>().is_ok() {
            out.push_str(&format!("{key}={value}\n"));
        } else {
            out.push_str(&format!("{key}=\"{}\"\n", escape(value)));
        }
    }
    out
}

/// Write `map` to `path`, replacing any existing file
pub fn write(path: &Path, map: &ConfigMap) -> Result<(), DotEnvError> {
    fs::write(path, marshal(map)).map_err(|source| DotEnvError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
