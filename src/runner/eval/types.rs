//! Core types for the evaluation engine.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;

/// Completion record type.
/// Represents the result of evaluating a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionType {
    /// Normal completion - execution continues.
    Normal,
    /// Return completion - function returns.
    Return,
    /// Break completion - break out of the nearest loop.
    Break,
    /// Continue completion - continue the nearest loop.
    Continue,
}

/// Completion record.
/// Every statement evaluation returns a completion record; thrown script
/// values travel on the `Err` channel as [`ScriptError::Thrown`].
pub struct Completion {
    /// The type of completion.
    pub completion_type: CompletionType,
    /// The value, if any.
    pub value: Option<Value>,
}

impl Completion {
    /// Create a normal completion with no value.
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    /// Create a normal completion with a value.
    pub fn normal_with_value(value: Value) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    /// Create a return completion.
    pub fn return_value(value: Value) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    /// Create a break completion.
    pub fn break_completion() -> Self {
        Completion {
            completion_type: CompletionType::Break,
            value: None,
        }
    }

    /// Create a continue completion.
    pub fn continue_completion() -> Self {
        Completion {
            completion_type: CompletionType::Continue,
            value: None,
        }
    }

    /// Check if this is a normal completion.
    pub fn is_normal(&self) -> bool {
        matches!(self.completion_type, CompletionType::Normal)
    }

    /// Check if this is an abrupt completion (not normal).
    pub fn is_abrupt(&self) -> bool {
        !self.is_normal()
    }

    /// Get the value, or undefined if none.
    pub fn get_value(&self) -> Value {
        self.value.clone().unwrap_or(Value::Undefined)
    }
}

/// Hard caps on a single evaluation: total interpreter steps and call
/// depth. Exhausting either aborts the run with a fault instead of letting
/// a malicious or buggy bundle spin forever.
#[derive(Debug, Clone, Copy)]
pub struct ExecLimits {
    pub max_steps: u64,
    pub max_depth: usize,
}

impl Default for ExecLimits {
    fn default() -> Self {
        ExecLimits {
            max_steps: 1_000_000,
            max_depth: 128,
        }
    }
}

/// Mutable state threaded through one evaluation run: the step budget and
/// the current call depth.
pub struct EvalContext {
    limits: ExecLimits,
    steps: u64,
    depth: usize,
}

impl EvalContext {
    pub fn new(limits: ExecLimits) -> Self {
        EvalContext {
            limits,
            steps: 0,
            depth: 0,
        }
    }

    /// Accounts one interpreter step.
    pub fn tick(&mut self) -> Result<(), ScriptError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(ScriptError::BudgetExhausted(self.limits.max_steps));
        }
        Ok(())
    }

    pub fn enter_function(&mut self) -> Result<(), ScriptError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(ScriptError::StackOverflow(self.depth));
        }
        Ok(())
    }

    pub fn exit_function(&mut self) {
        self.depth -= 1;
    }

    pub fn steps_used(&self) -> u64 {
        self.steps
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        EvalContext::new(ExecLimits::default())
    }
}

/// Result type for evaluation operations.
pub type EvalResult = Result<Completion, ScriptError>;

/// Result type for value-returning operations.
pub type ValueResult = Result<Value, ScriptError>;
