//! Tree-walking evaluator for parsed bundle programs.
//!
//! Expressions produce plain values, statements produce [`Completion`]
//! records, and a shared [`EvalContext`] enforces the step and call-depth
//! budgets across one execution.

pub mod expression;
pub mod function;
pub mod statement;
pub mod types;

pub use expression::evaluate_expression;
pub use function::{call_function, construct, instantiate_function};
pub use statement::{execute_body, execute_statement};
pub use types::{Completion, CompletionType, EvalContext, EvalResult, ExecLimits, ValueResult};
