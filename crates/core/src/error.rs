use thiserror::Error;

/// Hard failures loading a script. Problems inside a well-formed script are
/// reported through the logger instead.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("A script must be a JSON array of commands, found {0}")]
    NotAnArray(&'static str),
    #[error("Invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
}
