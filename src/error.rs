use jsonmorph_core::ScriptError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}' is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
    #[error("Usage error: {0}")]
    Usage(String),
    #[error("Script failed for {failed} of {total} document(s)")]
    ScriptFailed { failed: usize, total: usize },
}
