//! Assembly of registries, query backend and configuration into a reusable
//! [`Engine`].
use crate::commands::CommandFactory;
use crate::config::EngineConfig;
use crate::error::ScriptError;
use crate::registry::CommandRegistry;
use crate::script::{Script, ScriptCompiler};
use jsonmorph_context::{
    AddressQuery, ExecutionContext, ExecutionResult, LogEntry, Logger, MemoryLogger,
};
use jsonmorph_document::Document;
use jsonmorph_expr::{ExpressionParser, Function, FunctionRegistry};
use jsonmorph_jpath::JsonPathQuery;
use serde_json::Value;
use std::sync::Arc;

/// Compiles and runs scripts. Immutable once built, so one engine can serve
/// many threads, each with its own document.
pub struct Engine {
    functions: FunctionRegistry,
    commands: CommandRegistry,
    query: Arc<dyn AddressQuery>,
    config: EngineConfig,
}

/// What [`Engine::run`] hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub success: bool,
    pub document: Value,
    pub diagnostics: Vec<LogEntry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Parse-time diagnostics (unknown functions, nesting limits) go to
    /// `logger`.
    pub fn compile(&self, script: &Value, logger: &dyn Logger) -> Result<Script, ScriptError> {
        let parser =
            ExpressionParser::new(&self.functions, logger).with_limits(self.config.limits);
        ScriptCompiler::new(&parser, &self.commands).compile(script)
    }

    pub fn compile_str(&self, script: &str, logger: &dyn Logger) -> Result<Script, ScriptError> {
        let value: Value = serde_json::from_str(script)?;
        self.compile(&value, logger)
    }

    pub fn context<'a>(&'a self, logger: &'a dyn Logger) -> ExecutionContext<'a> {
        ExecutionContext::new(self.query.as_ref(), logger).with_limits(self.config.limits)
    }

    /// Runs the commands in order. The result is the AND of every command's
    /// result.
    pub fn execute(
        &self,
        script: &Script,
        document: &mut Document,
        logger: &dyn Logger,
    ) -> ExecutionResult<()> {
        let ctx = self.context(logger);
        let mut result = ExecutionResult::from_success(true);
        for (index, command) in script.commands().iter().enumerate() {
            log::debug!("Executing command #{} ({})", index, command.name());
            let outcome = command.execute(document, &ctx);
            if !outcome.success {
                log::debug!("Command #{} ({}) failed", index, command.name());
                result = result.and(false);
                if self.config.halt_on_failure {
                    log::info!(
                        "Halting after command #{}; {} command(s) skipped",
                        index,
                        script.len() - index - 1
                    );
                    break;
                }
            }
        }
        result
    }

    /// Compiles `script`, runs it against `document` and collects every
    /// diagnostic. Entries are also forwarded to the `log` facade.
    pub fn run(&self, script: &Value, document: Value) -> Result<RunOutput, ScriptError> {
        let logger = MemoryLogger::forwarding();
        let compiled = self.compile(script, &logger)?;
        let mut output = self.run_compiled(&compiled, document);
        let mut diagnostics = logger.take();
        diagnostics.append(&mut output.diagnostics);
        output.diagnostics = diagnostics;
        Ok(output)
    }

    /// Runs an already compiled script against one document. Only execution
    /// diagnostics are collected.
    pub fn run_compiled(&self, script: &Script, document: Value) -> RunOutput {
        let logger = MemoryLogger::forwarding();
        let mut document = Document::from_value(document);
        let result = self.execute(script, &mut document, &logger);
        RunOutput {
            success: result.success,
            document: document.to_value(),
            diagnostics: logger.take(),
        }
    }
}

/// Fluent construction of an [`Engine`].
pub struct EngineBuilder {
    functions: FunctionRegistry,
    commands: CommandRegistry,
    query: Arc<dyn AddressQuery>,
    config: EngineConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            functions: FunctionRegistry::default(),
            commands: CommandRegistry::new(),
            query: Arc::new(JsonPathQuery),
            config: EngineConfig::default(),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the built-in function library wholesale.
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_function(mut self, name: &str, function: impl Function + 'static) -> Self {
        self.functions.register(name, function);
        self
    }

    pub fn with_command(mut self, name: &str, factory: impl CommandFactory + 'static) -> Self {
        self.commands.register(name, factory);
        self
    }

    pub fn with_query_backend(mut self, query: impl AddressQuery + 'static) -> Self {
        self.query = Arc::new(query);
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            functions: self.functions,
            commands: self.commands,
            query: self.query,
            config: self.config,
        }
    }
}
