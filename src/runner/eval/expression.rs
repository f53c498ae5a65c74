//! Expression evaluation.
//!
//! This module provides the core expression evaluation logic for the bundle
//! script interpreter. It handles all expression types defined in the AST.

use std::rc::Rc;

use crate::parser::ast::{
    AssignmentOperator, BinaryOperator, ExpressionType, LiteralData, LiteralType, LogicalOperator,
    MemberExpressionData, MemberKey, NumberLiteralType, UnaryOperator, UpdateOperator,
};
use crate::runner::ds::error::ScriptError;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::scope::Scope;
use crate::runner::ds::value::{NumberKind, Value, RENDER_DEPTH_LIMIT};

use super::function::{call_function, construct, instantiate_function};
use super::types::{EvalContext, ValueResult};

/// Evaluate an expression and return its value.
pub fn evaluate_expression(
    expr: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    ctx.tick()?;
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier(id) => lookup_identifier(scope, &id.name),

        ExpressionType::ThisExpression { .. } => Ok(scope.this_value()),

        ExpressionType::ArrayExpression { elements, .. } => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(evaluate_expression(element, scope, ctx)?);
            }
            Ok(Value::Array(Rc::new(std::cell::RefCell::new(items))))
        }

        ExpressionType::ObjectExpression { properties, .. } => {
            let handle = ObjectHandle::new();
            for property in properties {
                let value = evaluate_expression(&property.value, scope, ctx)?;
                handle.set(&property.key, value);
            }
            Ok(Value::Object(handle))
        }

        ExpressionType::FunctionExpression(data) => {
            Ok(Value::Function(instantiate_function(data, scope)))
        }

        ExpressionType::MemberExpression(member) => {
            let object_value = evaluate_expression(&member.object, scope, ctx)?;
            let key = resolve_member_key(&member.key, scope, ctx)?;
            get_member(&object_value, &key)
        }

        ExpressionType::UnaryExpression {
            operator, argument, ..
        } => evaluate_unary_expression(operator, argument, scope, ctx),

        ExpressionType::UpdateExpression {
            operator, target, ..
        } => evaluate_update_expression(operator, target, scope, ctx),

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
            ..
        } => evaluate_binary_expression(operator, left, right, scope, ctx),

        ExpressionType::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => evaluate_logical_expression(operator, left, right, scope, ctx),

        ExpressionType::AssignmentExpression {
            operator,
            target,
            value,
            ..
        } => evaluate_assignment_expression(operator, target, value, scope, ctx),

        ExpressionType::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test_value = evaluate_expression(test, scope, ctx)?;
            if test_value.is_truthy() {
                evaluate_expression(consequent, scope, ctx)
            } else {
                evaluate_expression(alternate, scope, ctx)
            }
        }

        ExpressionType::CallExpression {
            callee, arguments, ..
        } => evaluate_call_expression(callee, arguments, scope, ctx),

        ExpressionType::NewExpression {
            callee, arguments, ..
        } => {
            let constructor = evaluate_expression(callee, scope, ctx)?;
            let args = evaluate_arguments(arguments, scope, ctx)?;
            construct(&constructor, args, ctx)
        }
    }
}

/// Evaluate a literal and return its value.
fn evaluate_literal(lit: &LiteralData) -> Value {
    match &lit.value {
        LiteralType::NullLiteral => Value::Null,
        LiteralType::UndefinedLiteral => Value::Undefined,
        LiteralType::BooleanLiteral(b) => Value::Boolean(*b),
        LiteralType::StringLiteral(s) => Value::String(s.clone()),
        LiteralType::NumberLiteral(n) => match n {
            NumberLiteralType::IntegerLiteral(i) => Value::int(*i),
            NumberLiteralType::FloatLiteral(f) => Value::float(*f),
        },
    }
}

fn lookup_identifier(scope: &Scope, name: &str) -> ValueResult {
    scope
        .lookup(name)
        .ok_or_else(|| ScriptError::Reference(format!("'{}' is not defined", name)))
}

// ============================================================================
// Member access
// ============================================================================

fn resolve_member_key(
    key: &MemberKey,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> Result<String, ScriptError> {
    match key {
        MemberKey::Simple(name) => Ok(name.clone()),
        MemberKey::Computed(expr) => {
            let value = evaluate_expression(expr, scope, ctx)?;
            Ok(match value {
                Value::String(s) => s,
                other => other.to_log_string(),
            })
        }
    }
}

/// Read a property off any value. Reads from `undefined`/`null` fail; reads
/// of absent properties elsewhere produce `undefined`.
pub fn get_member(object: &Value, key: &str) -> ValueResult {
    match object {
        Value::Object(handle) => Ok(handle.get(key)),
        Value::Array(items) => match key {
            "length" => Ok(Value::int(items.borrow().len() as i64)),
            "push" => Ok(make_array_push()),
            _ => match key.parse::<usize>() {
                Ok(index) => Ok(items
                    .borrow()
                    .get(index)
                    .cloned()
                    .unwrap_or(Value::Undefined)),
                Err(_) => Ok(Value::Undefined),
            },
        },
        Value::Function(function) => Ok(function.get_property(key).unwrap_or(Value::Undefined)),
        Value::String(s) => match key {
            "length" => Ok(Value::int(s.chars().count() as i64)),
            _ => Ok(Value::Undefined),
        },
        Value::Undefined | Value::Null => Err(ScriptError::Type(format!(
            "cannot read property '{}' of {}",
            key, object
        ))),
        _ => Ok(Value::Undefined),
    }
}

/// Write a property. Only objects, functions and array indices are
/// assignable.
pub fn set_member(
    object: &Value,
    key: &str,
    value: Value,
    ctx: &mut EvalContext,
) -> Result<(), ScriptError> {
    match object {
        Value::Object(handle) => {
            handle.set(key, value);
            Ok(())
        }
        Value::Function(function) => {
            function.set_property(key, value);
            Ok(())
        }
        Value::Array(items) => match key.parse::<usize>() {
            Ok(index) => {
                let mut items = items.borrow_mut();
                if index < items.len() {
                    items[index] = value;
                } else {
                    // A write past the end fills with undefined; each filled
                    // slot costs a step so a huge index exhausts the budget
                    // instead of the host's memory.
                    while items.len() < index {
                        ctx.tick()?;
                        items.push(Value::Undefined);
                    }
                    items.push(value);
                }
                Ok(())
            }
            Err(_) => Err(ScriptError::Type(format!(
                "cannot set property '{}' on array",
                key
            ))),
        },
        other => Err(ScriptError::Type(format!(
            "cannot set property '{}' on {}",
            key,
            other.type_of()
        ))),
    }
}

fn make_array_push() -> Value {
    Value::Function(Rc::new(FunctionValue::native("push", |this, args| {
        if let Value::Array(items) = this {
            let mut items = items.borrow_mut();
            for arg in args {
                items.push(arg.clone());
            }
            Ok(Value::int(items.len() as i64))
        } else {
            Err(ScriptError::Type("push called on non-array".to_string()))
        }
    })))
}

// ============================================================================
// Calls
// ============================================================================

fn evaluate_arguments(
    arguments: &[ExpressionType],
    scope: &Scope,
    ctx: &mut EvalContext,
) -> Result<Vec<Value>, ScriptError> {
    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(evaluate_expression(argument, scope, ctx)?);
    }
    Ok(args)
}

fn evaluate_call_expression(
    callee: &ExpressionType,
    arguments: &[ExpressionType],
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    if let ExpressionType::MemberExpression(member) = callee {
        return evaluate_method_call(member, arguments, scope, ctx);
    }
    let function = evaluate_expression(callee, scope, ctx)?;
    let args = evaluate_arguments(arguments, scope, ctx)?;
    if !function.is_callable() {
        return Err(ScriptError::Type(format!(
            "{} is not a function",
            callee_label(callee)
        )));
    }
    call_function(&function, Value::Undefined, args, ctx)
}

/// Method call: the member's base object becomes `this`. `fn.call(this,
/// ...)` on a function value rebinds `this` explicitly, which is how
/// downlevel class constructors chain to their parent.
fn evaluate_method_call(
    member: &MemberExpressionData,
    arguments: &[ExpressionType],
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    let object_value = evaluate_expression(&member.object, scope, ctx)?;
    let key = resolve_member_key(&member.key, scope, ctx)?;

    if key == "call" && object_value.is_callable() {
        let mut args = evaluate_arguments(arguments, scope, ctx)?;
        let this_value = if args.is_empty() {
            Value::Undefined
        } else {
            args.remove(0)
        };
        return call_function(&object_value, this_value, args, ctx);
    }

    let function = get_member(&object_value, &key)?;
    let args = evaluate_arguments(arguments, scope, ctx)?;
    if !function.is_callable() {
        return Err(ScriptError::Type(format!("'{}' is not a function", key)));
    }
    call_function(&function, object_value, args, ctx)
}

fn callee_label(expr: &ExpressionType) -> String {
    match expr {
        ExpressionType::Identifier(id) => format!("'{}'", id.name),
        _ => "expression result".to_string(),
    }
}

// ============================================================================
// Unary and update operators
// ============================================================================

fn evaluate_unary_expression(
    operator: &UnaryOperator,
    argument: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    match operator {
        UnaryOperator::TypeOf => match evaluate_expression(argument, scope, ctx) {
            Ok(value) => Ok(Value::String(value.type_of().to_string())),
            // `typeof missing` reports "undefined" instead of failing.
            Err(ScriptError::Reference(_)) => Ok(Value::str("undefined")),
            Err(e) => Err(e),
        },
        UnaryOperator::LogicalNot => {
            let value = evaluate_expression(argument, scope, ctx)?;
            Ok(Value::Boolean(!value.is_truthy()))
        }
        UnaryOperator::Minus => {
            let value = evaluate_expression(argument, scope, ctx)?;
            Ok(negate_number(&value))
        }
        UnaryOperator::Plus => {
            let value = evaluate_expression(argument, scope, ctx)?;
            Ok(Value::Number(to_number(&value)))
        }
    }
}

fn evaluate_update_expression(
    operator: &UpdateOperator,
    target: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    let delta = match operator {
        UpdateOperator::PlusPlus => 1,
        UpdateOperator::MinusMinus => -1,
    };
    match target {
        ExpressionType::Identifier(id) => {
            let old_value = Value::Number(to_number(&lookup_identifier(scope, &id.name)?));
            let new_value = add_values(&old_value, &Value::int(delta));
            scope.assign(&id.name, new_value)?;
            Ok(old_value)
        }
        ExpressionType::MemberExpression(member) => {
            let object_value = evaluate_expression(&member.object, scope, ctx)?;
            let key = resolve_member_key(&member.key, scope, ctx)?;
            let old_value = Value::Number(to_number(&get_member(&object_value, &key)?));
            let new_value = add_values(&old_value, &Value::int(delta));
            set_member(&object_value, &key, new_value, ctx)?;
            Ok(old_value)
        }
        _ => Err(ScriptError::Type(
            "invalid increment/decrement target".to_string(),
        )),
    }
}

// ============================================================================
// Binary, logical and assignment operators
// ============================================================================

fn evaluate_binary_expression(
    operator: &BinaryOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    let left_val = evaluate_expression(left, scope, ctx)?;
    let right_val = evaluate_expression(right, scope, ctx)?;

    Ok(match operator {
        BinaryOperator::Add => add_values(&left_val, &right_val),
        BinaryOperator::Subtract => subtract_values(&left_val, &right_val),
        BinaryOperator::Multiply => multiply_values(&left_val, &right_val),
        BinaryOperator::Divide => divide_values(&left_val, &right_val),
        BinaryOperator::Modulo => modulo_values(&left_val, &right_val),

        BinaryOperator::LessThan => {
            compare_values(&left_val, &right_val, |o| o == std::cmp::Ordering::Less)
        }
        BinaryOperator::LessThanEqual => {
            compare_values(&left_val, &right_val, |o| o != std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThan => {
            compare_values(&left_val, &right_val, |o| o == std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThanEqual => {
            compare_values(&left_val, &right_val, |o| o != std::cmp::Ordering::Less)
        }

        BinaryOperator::StrictlyEqual => Value::Boolean(strict_equality(&left_val, &right_val)),
        BinaryOperator::StrictlyUnequal => Value::Boolean(!strict_equality(&left_val, &right_val)),
        BinaryOperator::LooselyEqual => Value::Boolean(loose_equality(&left_val, &right_val)),
        BinaryOperator::LooselyUnequal => Value::Boolean(!loose_equality(&left_val, &right_val)),
    })
}

/// Evaluate a logical expression with short-circuit evaluation.
fn evaluate_logical_expression(
    operator: &LogicalOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    let left_val = evaluate_expression(left, scope, ctx)?;

    match operator {
        LogicalOperator::And => {
            if !left_val.is_truthy() {
                Ok(left_val)
            } else {
                evaluate_expression(right, scope, ctx)
            }
        }
        LogicalOperator::Or => {
            if left_val.is_truthy() {
                Ok(left_val)
            } else {
                evaluate_expression(right, scope, ctx)
            }
        }
    }
}

fn evaluate_assignment_expression(
    operator: &AssignmentOperator,
    target: &ExpressionType,
    value_expr: &ExpressionType,
    scope: &Scope,
    ctx: &mut EvalContext,
) -> ValueResult {
    match target {
        ExpressionType::Identifier(id) => {
            let rhs = evaluate_expression(value_expr, scope, ctx)?;
            let final_value = match operator {
                AssignmentOperator::Equals => rhs,
                AssignmentOperator::AddEquals => {
                    add_values(&lookup_identifier(scope, &id.name)?, &rhs)
                }
                AssignmentOperator::SubtractEquals => {
                    subtract_values(&lookup_identifier(scope, &id.name)?, &rhs)
                }
            };
            scope.assign(&id.name, final_value.clone())?;
            Ok(final_value)
        }
        ExpressionType::MemberExpression(member) => {
            let object_value = evaluate_expression(&member.object, scope, ctx)?;
            let key = resolve_member_key(&member.key, scope, ctx)?;
            let rhs = evaluate_expression(value_expr, scope, ctx)?;
            let final_value = match operator {
                AssignmentOperator::Equals => rhs,
                AssignmentOperator::AddEquals => {
                    add_values(&get_member(&object_value, &key)?, &rhs)
                }
                AssignmentOperator::SubtractEquals => {
                    subtract_values(&get_member(&object_value, &key)?, &rhs)
                }
            };
            set_member(&object_value, &key, final_value.clone(), ctx)?;
            Ok(final_value)
        }
        _ => Err(ScriptError::Type("invalid assignment target".to_string())),
    }
}

// ============================================================================
// Type conversion helpers
// ============================================================================

/// Convert a value to a number.
fn to_number(value: &Value) -> NumberKind {
    match value {
        Value::Undefined => NumberKind::Float(f64::NAN),
        Value::Null => NumberKind::Integer(0),
        Value::Boolean(true) => NumberKind::Integer(1),
        Value::Boolean(false) => NumberKind::Integer(0),
        Value::Number(n) => *n,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                NumberKind::Integer(0)
            } else if let Ok(i) = trimmed.parse::<i64>() {
                NumberKind::Integer(i)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                NumberKind::Float(f)
            } else {
                NumberKind::Float(f64::NAN)
            }
        }
        Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::Element(_) => {
            NumberKind::Float(f64::NAN)
        }
    }
}

fn negate_number(value: &Value) -> Value {
    match to_number(value) {
        NumberKind::Integer(i) => match i.checked_neg() {
            Some(n) => Value::int(n),
            None => Value::float(-(i as f64)),
        },
        NumberKind::Float(f) => Value::float(-f),
    }
}

/// String conversion used by concatenation; unlike Display, strings are not
/// quoted and arrays render comma joined.
fn to_string_value(value: &Value) -> String {
    to_string_bounded(value, 0)
}

fn to_string_bounded(value: &Value, depth: usize) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) => "[object Object]".to_string(),
        // The depth guard keeps self-referential arrays from recursing
        // forever.
        Value::Array(_) if depth >= RENDER_DEPTH_LIMIT => "...".to_string(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .map(|v| match v {
                Value::Undefined | Value::Null => String::new(),
                other => to_string_bounded(other, depth + 1),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Function(f) => f.to_string(),
        Value::Element(e) => format!("[element {}]", e.kind),
    }
}

// ============================================================================
// Arithmetic operations
// ============================================================================

fn add_values(left: &Value, right: &Value) -> Value {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        return Value::String(format!("{}{}", to_string_value(left), to_string_value(right)));
    }
    apply_numeric_op(
        to_number(left),
        to_number(right),
        i64::checked_add,
        |a, b| a + b,
    )
}

fn subtract_values(left: &Value, right: &Value) -> Value {
    apply_numeric_op(
        to_number(left),
        to_number(right),
        i64::checked_sub,
        |a, b| a - b,
    )
}

fn multiply_values(left: &Value, right: &Value) -> Value {
    apply_numeric_op(
        to_number(left),
        to_number(right),
        i64::checked_mul,
        |a, b| a * b,
    )
}

/// Division always runs in floats; zero divisors produce infinities or NaN
/// instead of faulting.
fn divide_values(left: &Value, right: &Value) -> Value {
    Value::float(to_number(left).as_f64() / to_number(right).as_f64())
}

fn modulo_values(left: &Value, right: &Value) -> Value {
    apply_numeric_op(
        to_number(left),
        to_number(right),
        i64::checked_rem,
        |a, b| a % b,
    )
}

/// Integer pairs stay integers while the operation fits; anything else is
/// computed in floats.
fn apply_numeric_op<I, F>(left: NumberKind, right: NumberKind, int_op: I, float_op: F) -> Value
where
    I: Fn(i64, i64) -> Option<i64>,
    F: Fn(f64, f64) -> f64,
{
    match (left, right) {
        (NumberKind::Integer(a), NumberKind::Integer(b)) => match int_op(a, b) {
            Some(i) => Value::int(i),
            None => Value::float(float_op(a as f64, b as f64)),
        },
        (a, b) => Value::float(float_op(a.as_f64(), b.as_f64())),
    }
}

// ============================================================================
// Comparison operations
// ============================================================================

fn compare_values(left: &Value, right: &Value, pred: fn(std::cmp::Ordering) -> bool) -> Value {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Value::Boolean(pred(a.as_str().cmp(b.as_str())));
    }
    let a = to_number(left).as_f64();
    let b = to_number(right).as_f64();
    match a.partial_cmp(&b) {
        Some(ordering) => Value::Boolean(pred(ordering)),
        // NaN comparisons are always false.
        None => Value::Boolean(false),
    }
}

pub fn strict_equality(left: &Value, right: &Value) -> bool {
    left == right
}

fn loose_equality(left: &Value, right: &Value) -> bool {
    if std::mem::discriminant(left) == std::mem::discriminant(right) {
        return strict_equality(left, right);
    }
    match (left, right) {
        (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => true,
        (Value::Number(_), Value::String(_)) => {
            strict_equality(left, &Value::Number(to_number(right)))
        }
        (Value::String(_), Value::Number(_)) => {
            strict_equality(&Value::Number(to_number(left)), right)
        }
        (Value::Boolean(_), _) => loose_equality(&Value::Number(to_number(left)), right),
        (_, Value::Boolean(_)) => loose_equality(left, &Value::Number(to_number(right))),
        _ => false,
    }
}
