//! The `UI` primitive namespace.
//!
//! Each primitive is a native function that builds an [`Element`] node. The
//! calling convention is positional: a leading object argument becomes the
//! props map, everything after it becomes children. A single array argument
//! in child position is flattened, and `text` may be handed a bare string.

use std::rc::Rc;

use crate::runner::ds::element::Element;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::value::Value;

lazy_static! {
    /// Names shared by the `UI` namespace and the inert fallback module.
    pub static ref UI_PRIMITIVES: Vec<&'static str> =
        vec!["view", "text", "button", "image", "input", "list"];
}

/// Build the `UI` namespace object with one element builder per primitive.
pub fn make_ui_namespace() -> Value {
    let namespace = ObjectHandle::new();
    for name in UI_PRIMITIVES.iter() {
        namespace.set(name, make_element_builder(name));
    }
    Value::Object(namespace)
}

fn make_element_builder(kind: &'static str) -> Value {
    Value::Function(Rc::new(FunctionValue::native(kind, move |_, args| {
        Ok(Value::Element(Rc::new(build_element(kind, args))))
    })))
}

fn build_element(kind: &str, args: &[Value]) -> Element {
    let (props, rest) = match args.first() {
        Some(Value::Object(handle)) => (props_from_object(handle), &args[1..]),
        _ => (Vec::new(), args),
    };
    let children = collect_children(rest);
    Element::new(kind, props, children)
}

fn props_from_object(handle: &ObjectHandle) -> Vec<(String, Value)> {
    handle
        .borrow()
        .own_keys()
        .into_iter()
        .map(|key| {
            let value = handle.get(&key);
            (key, value)
        })
        .collect()
}

/// Children after the props slot. A lone array argument supplies the list;
/// `undefined` entries (inert stub results) are dropped.
fn collect_children(rest: &[Value]) -> Vec<Value> {
    let raw: Vec<Value> = match rest {
        [Value::Array(items)] => items.borrow().clone(),
        _ => rest.to_vec(),
    };
    raw.into_iter()
        .filter(|child| !matches!(child, Value::Undefined))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_primitive(namespace: &Value, name: &str, args: &[Value]) -> Value {
        let function = match namespace {
            Value::Object(handle) => handle.get(name),
            _ => panic!("namespace is not an object"),
        };
        match function {
            Value::Function(f) => match &f.kind {
                crate::runner::ds::function::FunctionKind::Native(native) => {
                    native(&Value::Undefined, args).unwrap()
                }
                _ => panic!("primitive is not native"),
            },
            _ => panic!("'{}' is not a function", name),
        }
    }

    #[test]
    fn text_accepts_a_bare_string() {
        let ns = make_ui_namespace();
        let element = call_primitive(&ns, "text", &[Value::str("hello")]);
        match element {
            Value::Element(e) => {
                assert_eq!(e.kind, "text");
                assert!(e.props.is_empty());
                assert_eq!(e.children.len(), 1);
            }
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn leading_object_becomes_props() {
        let ns = make_ui_namespace();
        let props = ObjectHandle::new();
        props.set("id", Value::str("root"));
        let element = call_primitive(
            &ns,
            "view",
            &[Value::Object(props), Value::str("a"), Value::str("b")],
        );
        match element {
            Value::Element(e) => {
                assert_eq!(e.kind, "view");
                assert_eq!(e.prop("id"), Some(&Value::str("root")));
                assert_eq!(e.children.len(), 2);
            }
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn lone_array_argument_is_the_child_list() {
        let ns = make_ui_namespace();
        let children = Value::Array(Rc::new(std::cell::RefCell::new(vec![
            Value::str("x"),
            Value::Undefined,
            Value::str("y"),
        ])));
        let element = call_primitive(&ns, "list", &[children]);
        match element {
            Value::Element(e) => {
                // The undefined entry is dropped.
                assert_eq!(e.children.len(), 2);
            }
            other => panic!("expected element, got {:?}", other),
        }
    }
}
