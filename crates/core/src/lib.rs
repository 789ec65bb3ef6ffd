//! # jsonmorph-core
//!
//! Runs transformation scripts against a mutable JSON document.
//!
//! - **addressing**: node selection through the pluggable query backend and
//!   construction of missing intermediate objects
//! - **policy**: how Add, Set and Put write a value into a resolved target
//! - **apply**: the resolve-then-write algorithm every value command shares
//! - **commands**: the built-in commands and the extension point
//! - **script** / **engine**: compiling scripts and running them
//!
//! ```no_run
//! use jsonmorph_core::Engine;
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let output = engine
//!     .run(
//!         &json!([{ "op": "add", "path": "$.customer.name", "value": "=upper('ada')" }]),
//!         json!({}),
//!     )
//!     .unwrap();
//! assert_eq!(output.document, json!({ "customer": { "name": "ADA" } }));
//! ```

pub mod addressing;
pub mod apply;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod registry;
pub mod script;

pub use addressing::{ensure_path, select};
pub use apply::{ValueSource, apply_value, resolve_targets};
pub use commands::{
    Command, CommandFactory, ExtensionCommand, NotFoundCommand, RemoveCommand, TransferCommand,
    TransferMode, ValueCommand,
};
pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder, RunOutput};
pub use error::ScriptError;
pub use policy::{AddPolicy, Occupant, PutPolicy, SetPolicy, Slot, Target, ValuePolicy};
pub use registry::CommandRegistry;
pub use script::{Script, ScriptCompiler};

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_context::LogLevel;
    use serde_json::{Value, json};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn run(script: Value, document: Value) -> RunOutput {
        init_logger();
        Engine::new().run(&script, document).unwrap()
    }

    #[test]
    fn test_add_set_put_on_properties() {
        let output = run(
            json!([
                {"op": "add", "path": "$.a", "value": 1},
                {"op": "add", "path": "$.a", "value": 2},
                {"op": "set", "path": "$.b", "value": 1},
                {"op": "put", "path": "$.c", "value": 1},
                {"op": "put", "path": "$.c", "value": 2}
            ]),
            json!({}),
        );
        assert!(!output.success);
        assert_eq!(output.document, json!({"a": 1, "c": 2}));
        assert_eq!(
            output
                .diagnostics
                .iter()
                .filter(|e| e.level == LogLevel::Warning)
                .count(),
            2
        );
    }

    #[test]
    fn test_literal_address_resolves_but_plain_strings_stay() {
        let output = run(
            json!([
                {"op": "add", "path": "$.b", "value": "$.a"},
                {"op": "copy", "fromPath": "$.text", "toPath": "$.copied"}
            ]),
            json!({"a": 5, "text": "$.a"}),
        );
        assert!(output.success);
        assert_eq!(output.document["b"], json!(5));
        assert_eq!(output.document["copied"], json!("$.a"));
    }

    #[test]
    fn test_unknown_command_is_reported_once() {
        let output = run(json!([{"op": "bogus"}]), json!({"a": 1}));
        assert!(!output.success);
        assert_eq!(output.document, json!({"a": 1}));
        let errors: Vec<_> = output
            .diagnostics
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("bogus"));
    }

    #[test]
    fn test_remove_renumbers_arrays() {
        let output = run(
            json!([
                {"op": "remove", "path": "$.xs[0]"},
                {"op": "set", "path": "$.xs[0]", "value": "first"}
            ]),
            json!({"xs": [1, 2, 3]}),
        );
        assert!(output.success);
        assert_eq!(output.document, json!({"xs": ["first", 3]}));
    }
}
