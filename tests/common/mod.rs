pub mod fixtures;

use jsonmorph::{Engine, LogEntry, LogLevel, RunOutput, ScriptError};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs `script` against `document` with a default engine.
pub fn run(script: Value, document: Value) -> Result<RunOutput, ScriptError> {
    init_logger();
    Engine::new().run(&script, document)
}

pub fn entries_at(output: &RunOutput, level: LogLevel) -> Vec<&LogEntry> {
    output
        .diagnostics
        .iter()
        .filter(|e| e.level == level)
        .collect()
}

/// True if some warning mentions `needle`.
pub fn warned_about(output: &RunOutput, needle: &str) -> bool {
    entries_at(output, LogLevel::Warning)
        .iter()
        .any(|e| e.message.contains(needle))
}
