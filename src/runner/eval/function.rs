//! Function instantiation, calls and construction.

use std::rc::Rc;

use crate::parser::ast::FunctionData;
use crate::runner::ds::error::ScriptError;
use crate::runner::ds::function::{FunctionKind, FunctionValue};
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::scope::Scope;
use crate::runner::ds::value::Value;

use super::statement::execute_body;
use super::types::{EvalContext, ValueResult};

/// Build a function value from its AST node, closing over the scope the
/// declaration or expression appears in. Every script function gets a fresh
/// `prototype` object so it can serve as a constructor.
pub fn instantiate_function(data: &FunctionData, scope: &Scope) -> Rc<FunctionValue> {
    let function = Rc::new(FunctionValue::script(
        data.name.clone(),
        data.params.clone(),
        Rc::clone(&data.body),
        scope.clone(),
    ));
    let prototype = ObjectHandle::new();
    prototype.set("constructor", Value::Function(Rc::clone(&function)));
    function.set_property("prototype", Value::Object(prototype));
    function
}

/// Call a function value with an explicit `this` and argument list.
pub fn call_function(
    function: &Value,
    this_value: Value,
    args: Vec<Value>,
    ctx: &mut EvalContext,
) -> ValueResult {
    let function = match function {
        Value::Function(f) => f,
        other => {
            return Err(ScriptError::Type(format!(
                "{} is not a function",
                other.type_of()
            )))
        }
    };
    ctx.enter_function()?;
    let result = dispatch_call(function, this_value, args, ctx);
    ctx.exit_function();
    result
}

fn dispatch_call(
    function: &Rc<FunctionValue>,
    this_value: Value,
    args: Vec<Value>,
    ctx: &mut EvalContext,
) -> ValueResult {
    match &function.kind {
        FunctionKind::Native(native) => native(&this_value, &args),
        FunctionKind::Script {
            params,
            body,
            closure,
        } => {
            let call_scope = closure.child_with_this(this_value);
            for (index, param) in params.iter().enumerate() {
                let value = args.get(index).cloned().unwrap_or(Value::Undefined);
                call_scope.declare_var(param, value);
            }
            let completion = execute_body(body, &call_scope, ctx)?;
            Ok(completion.get_value())
        }
    }
}

/// `new F(...)`: allocate an instance wired to `F.prototype`, run `F` with
/// the instance as `this`, and keep the instance unless the body returned an
/// object of its own.
pub fn construct(constructor: &Value, args: Vec<Value>, ctx: &mut EvalContext) -> ValueResult {
    let function = match constructor {
        Value::Function(f) => f,
        other => {
            return Err(ScriptError::Type(format!(
                "{} is not a constructor",
                other.type_of()
            )))
        }
    };
    let instance = match function.prototype_object() {
        Some(prototype) => ObjectHandle::with_prototype(prototype),
        None => ObjectHandle::new(),
    };
    let result = call_function(
        constructor,
        Value::Object(instance.clone()),
        args,
        ctx,
    )?;
    match result {
        Value::Object(_) => Ok(result),
        _ => Ok(Value::Object(instance)),
    }
}
