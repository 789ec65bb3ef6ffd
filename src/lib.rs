//! # jsonmorph
//!
//! An embeddable JSON transformation engine. A script is a JSON array of
//! commands (`add`, `set`, `put`, `move`, `copy`, `remove`, plus registered
//! extensions); each addresses the document with a JSONPath-like string and
//! may compute its value with an expression such as
//! `=concat(@.first,' ',@.last)`.
//!
//! This crate re-exports the workspace crates and adds batch execution and the
//! file helpers used by the `jsonmorph` binary.

// Re-export foundation crates
pub use jsonmorph_context as context;
pub use jsonmorph_document as document;

// Re-export language crates
pub use jsonmorph_expr as expr;
pub use jsonmorph_jpath as jpath;

pub mod batch;
pub mod error;
pub mod output;

pub use batch::{BatchOutput, run_batch};
pub use error::CliError;
pub use jsonmorph_context::{
    AddressQuery, ExecutionContext, ExecutionResult, Limits, LogCategory, LogEntry, LogLevel,
    Logger, MemoryLogger,
};
pub use jsonmorph_core::{
    Command, CommandFactory, CommandRegistry, Engine, EngineBuilder, EngineConfig,
    ExtensionCommand, RunOutput, Script, ScriptError,
};
pub use jsonmorph_document::{Document, NodeId};
pub use jsonmorph_expr::{Function, FunctionArgs, FunctionNode, FunctionRegistry};
pub use jsonmorph_jpath::{JsonPathQuery, SplitPath};
