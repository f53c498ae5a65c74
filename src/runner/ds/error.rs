use thiserror::Error;

use crate::runner::ds::value::Value;

/// Faults raised while evaluating bundle code. `Thrown` carries the script
/// value given to `throw`; the rest are host-detected conditions.
#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("reference error: {0}")]
    Reference(String),
    #[error("type error: {0}")]
    Type(String),
    #[error("range error: {0}")]
    Range(String),
    #[error("uncaught {rendered}")]
    Thrown { value: Value, rendered: String },
    #[error("execution budget exhausted after {0} steps")]
    BudgetExhausted(u64),
    #[error("call depth limit exceeded at depth {0}")]
    StackOverflow(usize),
}

impl ScriptError {
    /// Wraps a thrown script value, pre-rendering it so the error message
    /// stays readable after the value graph is gone.
    pub fn thrown(value: Value) -> Self {
        let rendered = render_thrown(&value);
        ScriptError::Thrown { value, rendered }
    }
}

/// Error-shaped objects (own `message`, optional `name`) render in the
/// familiar `Name: message` form; anything else falls back to Display.
pub fn render_thrown(value: &Value) -> String {
    if let Value::Object(obj) = value {
        if let Some(Value::String(message)) = obj.borrow().get_own("message") {
            let name = match obj.borrow().get_own("name") {
                Some(Value::String(n)) => n,
                _ => "Error".to_string(),
            };
            return format!("{}: {}", name, message);
        }
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
