//! Addresses and how they are resolved.
//!
//! This crate splits address strings into a selection prefix and a
//! construction suffix, splits function-call text with a bracket-aware
//! tokenizer, and provides [`JsonPathQuery`], the default
//! [`AddressQuery`](jsonmorph_context::AddressQuery) backend.

pub mod ast;
pub mod engine;
pub mod error;
mod parser;
pub mod path;
pub mod tokenizer;

// --- Public API ---
pub use ast::{CompareOp, FilterExpr, Operand, Query, QueryRoot, Segment, Selector};
pub use engine::{JsonPathQuery, evaluate};
pub use error::JPathError;
pub use parser::parse_query;
pub use path::{PathElement, SplitPath, normalize_address, render_elements};
pub use tokenizer::{BalancedTokenizer, Delimiter};
