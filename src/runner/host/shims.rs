//! `require("lang/class")` helpers.
//!
//! Compiled-class bundles arrive as constructor functions plus calls into
//! these three helpers. They mirror the downlevel emit contract: install
//! methods on the constructor's `prototype`, statics on the constructor
//! itself, and chain prototypes for `inherits`.

use std::rc::Rc;

use tracing::warn;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::value::Value;

/// Build the `lang/class` module object.
pub fn make_class_shims() -> Value {
    let module = ObjectHandle::new();
    module.set(
        "classCallCheck",
        native("classCallCheck", |_, _| Ok(Value::Undefined)),
    );
    module.set("createClass", native("createClass", create_class));
    module.set("inherits", native("inherits", inherits));
    Value::Object(module)
}

fn native(
    name: &str,
    f: impl Fn(&Value, &[Value]) -> Result<Value, ScriptError> + 'static,
) -> Value {
    Value::Function(Rc::new(FunctionValue::native(name, f)))
}

/// `createClass(ctor, protoProps?, staticProps?)`. Prototype properties may
/// be a plain map or a list of `{key, value}` descriptors; both emit shapes
/// occur in the wild. Returns the constructor.
fn create_class(_: &Value, args: &[Value]) -> Result<Value, ScriptError> {
    let constructor = match args.first() {
        Some(Value::Function(f)) => Rc::clone(f),
        _ => {
            return Err(ScriptError::Type(
                "createClass expects a constructor function".to_string(),
            ))
        }
    };
    if let Some(proto_props) = args.get(1) {
        let prototype = match constructor.prototype_object() {
            Some(p) => p,
            None => {
                let p = ObjectHandle::new();
                p.set(
                    "constructor",
                    Value::Function(Rc::clone(&constructor)),
                );
                constructor.set_property("prototype", Value::Object(p.clone()));
                p
            }
        };
        copy_props(proto_props, |key, value| prototype.set(key, value));
    }
    if let Some(static_props) = args.get(2) {
        copy_props(static_props, |key, value| {
            constructor.set_property(key, value)
        });
    }
    Ok(Value::Function(constructor))
}

fn copy_props(props: &Value, mut install: impl FnMut(&str, Value)) {
    match props {
        Value::Object(map) => {
            for key in map.borrow().own_keys() {
                install(&key, map.get(&key));
            }
        }
        Value::Array(descriptors) => {
            for descriptor in descriptors.borrow().iter() {
                match descriptor {
                    Value::Object(entry) => match entry.get("key") {
                        Value::String(key) => install(&key, entry.get("value")),
                        _ => warn!("class descriptor entry without a string 'key', skipped"),
                    },
                    _ => warn!("class descriptor entry is not an object, skipped"),
                }
            }
        }
        Value::Undefined | Value::Null => {}
        other => warn!(
            "class properties argument has unusable type {}, skipped",
            other.type_of()
        ),
    }
}

/// `inherits(subCtor, superCtor)`: point the subclass prototype at a fresh
/// object chained to the superclass prototype.
fn inherits(_: &Value, args: &[Value]) -> Result<Value, ScriptError> {
    let sub = match args.first() {
        Some(Value::Function(f)) => Rc::clone(f),
        _ => {
            return Err(ScriptError::Type(
                "inherits expects a subclass constructor".to_string(),
            ))
        }
    };
    let superclass = match args.get(1) {
        Some(Value::Function(f)) => Rc::clone(f),
        _ => {
            return Err(ScriptError::Type(
                "inherits expects a superclass constructor".to_string(),
            ))
        }
    };
    let prototype = match superclass.prototype_object() {
        Some(super_proto) => ObjectHandle::with_prototype(super_proto),
        None => ObjectHandle::new(),
    };
    prototype.set("constructor", Value::Function(Rc::clone(&sub)));
    sub.set_property("prototype", Value::Object(prototype));
    // Keep a handle on the parent for `SuperCtor.call(this, ...)` chains.
    sub.set_property("superclass", Value::Function(superclass));
    Ok(Value::Undefined)
}
