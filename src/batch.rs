//! One script, many documents.
//!
//! The script is compiled once and shared; every document gets its own
//! diagnostics. With the `rayon-executor` feature the documents are processed
//! on rayon's global pool, otherwise one after another. Output order always
//! follows input order.
use jsonmorph_context::{LogEntry, MemoryLogger};
use jsonmorph_core::{Engine, RunOutput, Script, ScriptError};
use serde_json::Value;

#[cfg(feature = "rayon-executor")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Diagnostics from compiling the script (unknown functions and such).
    pub compile_diagnostics: Vec<LogEntry>,
    pub outputs: Vec<RunOutput>,
}

impl BatchOutput {
    pub fn success(&self) -> bool {
        self.outputs.iter().all(|o| o.success)
    }

    pub fn failed(&self) -> usize {
        self.outputs.iter().filter(|o| !o.success).count()
    }
}

pub fn run_batch(
    engine: &Engine,
    script: &Value,
    documents: Vec<Value>,
) -> Result<BatchOutput, ScriptError> {
    let logger = MemoryLogger::forwarding();
    let compiled = engine.compile(script, &logger)?;
    log::debug!(
        "Running {} command(s) over {} document(s)",
        compiled.len(),
        documents.len()
    );
    Ok(BatchOutput {
        compile_diagnostics: logger.take(),
        outputs: execute_all(engine, &compiled, documents),
    })
}

#[cfg(feature = "rayon-executor")]
fn execute_all(engine: &Engine, script: &Script, documents: Vec<Value>) -> Vec<RunOutput> {
    documents
        .into_par_iter()
        .map(|document| engine.run_compiled(script, document))
        .collect()
}

#[cfg(not(feature = "rayon-executor"))]
fn execute_all(engine: &Engine, script: &Script, documents: Vec<Value>) -> Vec<RunOutput> {
    documents
        .into_iter()
        .map(|document| engine.run_compiled(script, document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_context::LogLevel;
    use serde_json::json;

    #[test]
    fn test_documents_are_independent_and_ordered() {
        let engine = Engine::new();
        let script = json!([
            {"op": "add", "path": "$.total", "value": "=sum(@.items)"},
            {"op": "remove", "path": "$.items"}
        ]);
        let documents: Vec<Value> = (0..32)
            .map(|i| json!({"id": i, "items": [i, i, 1]}))
            .collect();

        let batch = run_batch(&engine, &script, documents).unwrap();
        assert!(batch.success());
        assert_eq!(batch.outputs.len(), 32);
        for (i, output) in batch.outputs.iter().enumerate() {
            assert_eq!(output.document, json!({"id": i, "total": 2 * i + 1}));
        }
    }

    #[test]
    fn test_failures_are_counted_per_document() {
        let batch = run_batch(
            &Engine::new(),
            &json!([{"op": "set", "path": "$.a", "value": 0}]),
            vec![json!({"a": 1}), json!({}), json!({"a": 2})],
        )
        .unwrap();
        assert!(!batch.success());
        assert_eq!(batch.failed(), 1);
        assert!(batch.outputs[1]
            .diagnostics
            .iter()
            .any(|e| e.level == LogLevel::Warning));
    }

    #[test]
    fn test_compile_diagnostics_are_reported_once() {
        let batch = run_batch(
            &Engine::new(),
            &json!([{"op": "put", "path": "$.a", "value": "=nope()"}]),
            vec![json!({}), json!({})],
        )
        .unwrap();
        assert_eq!(batch.compile_diagnostics.len(), 1);
        assert_eq!(batch.outputs[0].document, json!({"a": "=nope()"}));
    }
}
