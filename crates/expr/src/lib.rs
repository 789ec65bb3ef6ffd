//! Value expressions.
//!
//! A value field is either plain JSON or a string of the form
//! `=name(arg, ...)`. [`ExpressionParser`] turns it into a [`FunctionNode`]
//! tree once; the tree is then evaluated against each target node when a
//! command writes.

pub mod ast;
pub mod function;
pub mod library;
mod parser;

// --- Public API ---
pub use ast::{Argument, FunctionNode};
pub use function::{CallContext, Function, FunctionArgs, FunctionRegistry};
pub use parser::ExpressionParser;
