//! Diagnostics sink threaded through parsing and execution.
//!
//! Every entry carries a level and a category. The category separates
//! diagnostics raised while running commands from those raised while
//! evaluating functions, so collaborators can filter on either.
use std::cell::RefCell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Information,
    Warning,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Information => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Information => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Raised by the command pipeline: addressing, validation, policies.
    Command,
    /// Raised while parsing or evaluating function expressions.
    Function,
}

impl LogCategory {
    /// The `log` target used when forwarding entries of this category.
    pub fn target(self) -> &'static str {
        match self {
            LogCategory::Command => "jsonmorph::command",
            LogCategory::Function => "jsonmorph::function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.category.target(), self.message)
    }
}

/// A sink for engine diagnostics.
pub trait Logger {
    fn log(&self, level: LogLevel, category: LogCategory, message: &str);

    fn info(&self, category: LogCategory, message: &str) {
        self.log(LogLevel::Information, category, message);
    }

    fn warn(&self, category: LogCategory, message: &str) {
        self.log(LogLevel::Warning, category, message);
    }

    fn error(&self, category: LogCategory, message: &str) {
        self.log(LogLevel::Error, category, message);
    }
}

/// Sends every entry to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardingLogger;

impl Logger for ForwardingLogger {
    fn log(&self, level: LogLevel, category: LogCategory, message: &str) {
        log::log!(target: category.target(), level.into(), "{}", message);
    }
}

/// Records entries in memory, optionally forwarding them to the `log` facade
/// as well.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: RefCell<Vec<LogEntry>>,
    forward: bool,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that also forwards to the `log` facade.
    pub fn forwarding() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            forward: true,
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Drains the recorded entries.
    pub fn take(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .count()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, category: LogCategory, message: &str) {
        if self.forward {
            ForwardingLogger.log(level, category, message);
        }
        self.entries.borrow_mut().push(LogEntry {
            level,
            category,
            message: message.to_string(),
        });
    }
}

/// A logger bound to one category.
#[derive(Clone, Copy)]
pub struct ScopedLogger<'a> {
    logger: &'a dyn Logger,
    category: LogCategory,
}

impl<'a> ScopedLogger<'a> {
    pub fn new(logger: &'a dyn Logger, category: LogCategory) -> Self {
        Self { logger, category }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.logger.info(self.category, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.logger.warn(self.category, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.logger.error(self.category, message.as_ref());
    }
}
