use jsonmorph_context::{ExecutionContext, ExecutionResult};

/// Stand-in for a script entry whose discriminator names no command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundCommand {
    pub discriminator: String,
}

impl NotFoundCommand {
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
        }
    }

    /// Always fails, reporting the discriminator once at error level.
    pub fn execute(&self, ctx: &ExecutionContext<'_>) -> ExecutionResult<()> {
        ctx.commands()
            .error(format!("Unknown command '{}'", self.discriminator));
        ExecutionResult::from_success(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmorph_context::{LogLevel, MemoryLogger};
    use jsonmorph_jpath::JsonPathQuery;

    #[test]
    fn test_fails_with_one_error() {
        let logger = MemoryLogger::new();
        let ctx = ExecutionContext::new(&JsonPathQuery, &logger);
        let result = NotFoundCommand::new("bogus").execute(&ctx);
        assert!(!result.success);
        let errors = logger.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("bogus"));
        assert_eq!(logger.entries().len(), 1);
    }
}
