//! Statement execution.
//!
//! Statements produce [`Completion`] records so that `return`, `break` and
//! `continue` can unwind through nested blocks and loops without unwinding
//! the Rust stack. Thrown script values travel on the `Err` channel instead.

use crate::parser::ast::{
    DeclarationKind, ExpressionType, ForInit, Statement, VariableDeclaratorData,
};
use crate::runner::ds::error::ScriptError;
use crate::runner::ds::scope::Scope;
use crate::runner::ds::value::Value;

use super::expression::evaluate_expression;
use super::function::instantiate_function;
use super::types::{Completion, CompletionType, EvalContext, EvalResult};

/// Execute a single statement.
pub fn execute_statement(stmt: &Statement, scope: &Scope, ctx: &mut EvalContext) -> EvalResult {
    ctx.tick()?;
    match stmt {
        Statement::ExpressionStatement { expression, .. } => {
            evaluate_expression(expression, scope, ctx)?;
            Ok(Completion::normal())
        }

        Statement::VariableDeclaration {
            kind, declarations, ..
        } => execute_variable_declaration(*kind, declarations, scope, ctx),

        // Function declarations are installed by the hoisting pass before the
        // surrounding body runs, so reaching one at execution time is a no-op.
        Statement::FunctionDeclaration(_) => Ok(Completion::normal()),

        Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test_value = evaluate_expression(test, scope, ctx)?;
            if test_value.is_truthy() {
                execute_statement(consequent, scope, ctx)
            } else if let Some(alternate) = alternate {
                execute_statement(alternate, scope, ctx)
            } else {
                Ok(Completion::normal())
            }
        }

        Statement::WhileStatement { test, body, .. } => {
            execute_while_statement(test, body, scope, ctx)
        }

        Statement::ForStatement {
            init,
            test,
            update,
            body,
            ..
        } => execute_for_statement(init.as_ref(), test.as_ref(), update.as_ref(), body, scope, ctx),

        Statement::ReturnStatement { argument, .. } => {
            let value = match argument {
                Some(expr) => evaluate_expression(expr, scope, ctx)?,
                None => Value::Undefined,
            };
            Ok(Completion::return_value(value))
        }

        Statement::ThrowStatement { argument, .. } => {
            let value = evaluate_expression(argument, scope, ctx)?;
            Err(ScriptError::thrown(value))
        }

        Statement::BreakStatement { .. } => Ok(Completion::break_completion()),

        Statement::ContinueStatement { .. } => Ok(Completion::continue_completion()),

        Statement::BlockStatement { body, .. } => {
            let block_scope = scope.child();
            execute_statement_list(body, &block_scope, ctx)
        }

        Statement::EmptyStatement { .. } => Ok(Completion::normal()),
    }
}

/// Execute a list of statements, stopping at the first abrupt completion.
pub fn execute_statement_list(
    statements: &[Statement],
    scope: &Scope,
    ctx: &mut EvalContext,
) -> EvalResult {
    for stmt in statements {
        let completion = execute_statement(stmt, scope, ctx)?;
        if completion.is_abrupt() {
            return Ok(completion);
        }
    }
    Ok(Completion::normal())
}

// ============================================================================
// Declarations
// ============================================================================

fn execute_variable_declaration(
    kind: DeclarationKind,
    declarations: &[VariableDeclaratorData],
    scope: &Scope,
    ctx: &mut EvalContext,
) -> EvalResult {
    for declarator in declarations {
        let value = match &declarator.init {
            Some(init) => evaluate_expression(init, scope, ctx)?,
            None => {
                if kind == DeclarationKind::Const {
                    return Err(ScriptError::Syntax(
                        "missing initializer in const declaration".to_string(),
                    ));
                }
                // A bare `var x;` was fully handled by hoisting.
                if kind == DeclarationKind::Var {
                    continue;
                }
                Value::Undefined
            }
        };
        match kind {
            // `var` writes through to the binding hoisted at the top of the
            // enclosing body, so a declaration inside a block stays visible
            // after the block exits.
            DeclarationKind::Var => scope.assign(&declarator.name, value)?,
            DeclarationKind::Let => scope.declare_lexical(&declarator.name, value, true)?,
            DeclarationKind::Const => scope.declare_lexical(&declarator.name, value, false)?,
        }
    }
    Ok(Completion::normal())
}

// ============================================================================
// Loops
// ============================================================================

fn execute_while_statement(
    test: &ExpressionType,
    body: &Statement,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> EvalResult {
    loop {
        let test_value = evaluate_expression(test, scope, ctx)?;
        if !test_value.is_truthy() {
            return Ok(Completion::normal());
        }
        let completion = execute_statement(body, scope, ctx)?;
        match completion.completion_type {
            CompletionType::Normal | CompletionType::Continue => {}
            CompletionType::Break => return Ok(Completion::normal()),
            CompletionType::Return => return Ok(completion),
        }
    }
}

fn execute_for_statement(
    init: Option<&ForInit>,
    test: Option<&ExpressionType>,
    update: Option<&ExpressionType>,
    body: &Statement,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> EvalResult {
    // The head gets its own scope so `let` loop variables do not leak.
    let loop_scope = scope.child();
    match init {
        Some(ForInit::Declaration { kind, declarations }) => {
            let completion = execute_variable_declaration(*kind, declarations, &loop_scope, ctx)?;
            debug_assert!(completion.is_normal());
        }
        Some(ForInit::Expression(expr)) => {
            evaluate_expression(expr, &loop_scope, ctx)?;
        }
        None => {}
    }
    loop {
        if let Some(test) = test {
            let test_value = evaluate_expression(test, &loop_scope, ctx)?;
            if !test_value.is_truthy() {
                return Ok(Completion::normal());
            }
        }
        let completion = execute_statement(body, &loop_scope, ctx)?;
        match completion.completion_type {
            // `continue` still runs the update expression.
            CompletionType::Normal | CompletionType::Continue => {}
            CompletionType::Break => return Ok(Completion::normal()),
            CompletionType::Return => return Ok(completion),
        }
        if let Some(update) = update {
            evaluate_expression(update, &loop_scope, ctx)?;
        }
    }
}

// ============================================================================
// Hoisting
// ============================================================================

/// Run a function or program body: hoist `var` names and function
/// declarations to the top of the body's scope, then execute the statements.
pub fn execute_body(body: &[Statement], scope: &Scope, ctx: &mut EvalContext) -> EvalResult {
    hoist_var_names(body, scope);
    hoist_function_declarations(body, scope);
    let completion = execute_statement_list(body, scope, ctx)?;
    match completion.completion_type {
        CompletionType::Normal | CompletionType::Return => Ok(completion),
        CompletionType::Break => Err(ScriptError::Syntax(
            "illegal break outside of a loop".to_string(),
        )),
        CompletionType::Continue => Err(ScriptError::Syntax(
            "illegal continue outside of a loop".to_string(),
        )),
    }
}

/// Pre-declare every `var` name in the body as `undefined`. The walk stops
/// at nested functions, which hoist into their own scope when called.
fn hoist_var_names(statements: &[Statement], scope: &Scope) {
    for stmt in statements {
        hoist_var_names_in_statement(stmt, scope);
    }
}

fn hoist_var_names_in_statement(stmt: &Statement, scope: &Scope) {
    match stmt {
        Statement::VariableDeclaration {
            kind: DeclarationKind::Var,
            declarations,
            ..
        } => {
            for declarator in declarations {
                if !scope.has_own(&declarator.name) {
                    scope.declare_var(&declarator.name, Value::Undefined);
                }
            }
        }
        Statement::IfStatement {
            consequent,
            alternate,
            ..
        } => {
            hoist_var_names_in_statement(consequent, scope);
            if let Some(alternate) = alternate {
                hoist_var_names_in_statement(alternate, scope);
            }
        }
        Statement::WhileStatement { body, .. } => hoist_var_names_in_statement(body, scope),
        Statement::ForStatement { init, body, .. } => {
            if let Some(ForInit::Declaration {
                kind: DeclarationKind::Var,
                declarations,
            }) = init
            {
                for declarator in declarations {
                    if !scope.has_own(&declarator.name) {
                        scope.declare_var(&declarator.name, Value::Undefined);
                    }
                }
            }
            hoist_var_names_in_statement(body, scope);
        }
        Statement::BlockStatement { body, .. } => hoist_var_names(body, scope),
        _ => {}
    }
}

/// Install top-level function declarations before the body runs, so calls
/// can appear above the declaration text.
fn hoist_function_declarations(statements: &[Statement], scope: &Scope) {
    for stmt in statements {
        if let Statement::FunctionDeclaration(data) = stmt {
            if let Some(name) = &data.name {
                let function = instantiate_function(data, scope);
                scope.declare_var(name, Value::Function(function));
            }
        }
    }
}
