//! Reading inputs and writing results.
use crate::error::CliError;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    // Serializing a `Value` cannot fail.
    rendered.unwrap_or_default()
}

/// Replaces `path` with `contents`. On native platforms the data goes to a
/// temporary file in the same directory first, so readers never observe a
/// partial write.
pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    write_file(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(feature = "native")]
fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}
