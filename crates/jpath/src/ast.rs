//! Defines the Abstract Syntax Tree (AST) for address queries.
use serde_json::Value;

/// A parsed query: a root marker followed by segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub root: QueryRoot,
    pub segments: Vec<Segment>,
}

/// Which node a query starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoot {
    /// `$`: the origin handed to the query.
    Origin,
    /// `@`: the node under test inside a filter. At the top level it means the
    /// origin too.
    Current,
}

/// One step of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// `.name`, `[...]`: applies the selectors to the children of each node.
    Child(Vec<Selector>),
    /// `..name`, `..[...]`: applies the selectors to every descendant.
    Descendant(Vec<Selector>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Name(String),
    Wildcard,
    /// Negative indexes count from the end.
    Index(i64),
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },
    Filter(FilterExpr),
}

/// A boolean test inside `[?( ... )]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Or(Box<FilterExpr>, Box<FilterExpr>),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    /// True when the embedded query selects at least one node.
    Exists(Query),
    Constant(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Path(Query),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}
