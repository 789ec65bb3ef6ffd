use serde_json::Value;

/// The outcome of evaluating a function node, running a command or a whole
/// script. Failure is carried as data; callers decide whether it matters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult<T = Value> {
    pub success: bool,
    pub value: T,
}

impl<T> ExecutionResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            success: true,
            value,
        }
    }

    pub fn failed(value: T) -> Self {
        Self {
            success: false,
            value,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExecutionResult<U> {
        ExecutionResult {
            success: self.success,
            value: f(self.value),
        }
    }
}

impl ExecutionResult<()> {
    pub fn from_success(success: bool) -> Self {
        Self { success, value: () }
    }

    /// Folds another outcome into this one (logical AND).
    pub fn and(self, other: bool) -> Self {
        Self::from_success(self.success && other)
    }
}

impl ExecutionResult<Value> {
    /// A failed evaluation with a `null` value.
    pub fn null_failure() -> Self {
        Self::failed(Value::Null)
    }
}

impl<T: Default> Default for ExecutionResult<T> {
    fn default() -> Self {
        Self::ok(T::default())
    }
}
