//! The inert fallback module returned for unresolved `require` names.

use std::rc::Rc;

use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::value::Value;

use super::ui::UI_PRIMITIVES;

/// Build the fallback module: every UI-primitive name is present as a stub
/// that swallows its arguments and returns `undefined`, so bundles written
/// against a richer host keep running with the affected output missing
/// instead of faulting. Any other property reads as `undefined`.
pub fn make_fallback_module() -> Value {
    let module = ObjectHandle::new();
    for name in UI_PRIMITIVES.iter() {
        module.set(
            name,
            Value::Function(Rc::new(FunctionValue::native(name, |_, _| {
                Ok(Value::Undefined)
            }))),
        );
    }
    Value::Object(module)
}
