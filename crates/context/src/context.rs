use crate::logger::{LogCategory, Logger, ScopedLogger};
use crate::query::{AddressQuery, QueryError};
use jsonmorph_document::{Document, NodeId};
use serde::{Deserialize, Serialize};

/// Bounds on recursive constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    /// Deepest function-call nesting accepted by the expression parser.
    pub max_expression_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_expression_depth: 64,
        }
    }
}

/// Capabilities shared by every step of one script execution.
///
/// Built once per run and passed by reference down to commands and function
/// nodes. It borrows everything, so it is cheap to copy.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub query: &'a dyn AddressQuery,
    pub logger: &'a dyn Logger,
    pub limits: Limits,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(query: &'a dyn AddressQuery, logger: &'a dyn Logger) -> Self {
        Self {
            query,
            logger,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Diagnostics for command execution.
    pub fn commands(&self) -> ScopedLogger<'a> {
        ScopedLogger::new(self.logger, LogCategory::Command)
    }

    /// Diagnostics for function evaluation.
    pub fn functions(&self) -> ScopedLogger<'a> {
        ScopedLogger::new(self.logger, LogCategory::Function)
    }

    pub fn try_select(
        &self,
        document: &Document,
        origin: NodeId,
        query: &str,
    ) -> Result<Vec<NodeId>, QueryError> {
        self.query.select(document, origin, query)
    }

    /// Runs a query, reporting a malformed address as a warning in `category`
    /// and treating it as matching nothing.
    pub fn select(
        &self,
        document: &Document,
        origin: NodeId,
        query: &str,
        category: LogCategory,
    ) -> Vec<NodeId> {
        match self.query.select(document, origin, query) {
            Ok(nodes) => nodes,
            Err(e) => {
                ScopedLogger::new(self.logger, category).warn(e.to_string());
                Vec::new()
            }
        }
    }
}
