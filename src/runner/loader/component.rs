//! Component handles: what the registry stores and consumers render.

use std::fmt;
use std::rc::Rc;

use crate::runner::ds::element::Element;
use crate::runner::ds::error::ScriptError;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::value::Value;
use crate::runner::eval::expression::get_member;
use crate::runner::eval::function::{call_function, construct};
use crate::runner::eval::types::EvalContext;

type NativeRender = Rc<dyn Fn(&Value) -> Result<Rc<Element>, ScriptError>>;

/// A renderable component: either a host-side Rust closure or a function
/// value lifted out of a bundle. Cloning shares the implementation.
#[derive(Clone)]
pub enum ComponentHandle {
    Native(NativeRender),
    Script(Rc<FunctionValue>),
}

impl ComponentHandle {
    pub fn native(render: impl Fn(&Value) -> Result<Rc<Element>, ScriptError> + 'static) -> Self {
        ComponentHandle::Native(Rc::new(render))
    }

    pub fn from_function(function: Rc<FunctionValue>) -> Self {
        ComponentHandle::Script(function)
    }

    /// Render the component with a props value. Script components run under
    /// a fresh default evaluation budget. A plain function component is
    /// called with the props; a constructor whose prototype chain carries a
    /// `render` method is instantiated first and its `render` invoked, which
    /// is how class-shim bundles arrive.
    pub fn render(&self, props: &Value) -> Result<Rc<Element>, ScriptError> {
        match self {
            ComponentHandle::Native(render) => render(props),
            ComponentHandle::Script(function) => {
                let mut ctx = EvalContext::default();
                let value = render_script(function, props, &mut ctx)?;
                match value {
                    Value::Element(element) => Ok(element),
                    other => Err(ScriptError::Type(format!(
                        "component '{}' returned {} instead of an element",
                        function.describe(),
                        other.type_of()
                    ))),
                }
            }
        }
    }

    /// Identity comparison, for tests and diagnostics.
    pub fn same_as(&self, other: &ComponentHandle) -> bool {
        match (self, other) {
            (ComponentHandle::Native(a), ComponentHandle::Native(b)) => Rc::ptr_eq(a, b),
            (ComponentHandle::Script(a), ComponentHandle::Script(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn render_script(
    function: &Rc<FunctionValue>,
    props: &Value,
    ctx: &mut EvalContext,
) -> Result<Value, ScriptError> {
    let callee = Value::Function(Rc::clone(function));
    if let Some(prototype) = function.prototype_object() {
        // Chain walk: inherited `render` marks a constructor component.
        if prototype.get("render").is_callable() {
            let instance = construct(&callee, vec![props.clone()], ctx)?;
            let render = get_member(&instance, "render")?;
            if !render.is_callable() {
                return Err(ScriptError::Type(format!(
                    "component '{}' instance has no callable render",
                    function.describe()
                )));
            }
            return call_function(&render, instance, Vec::new(), ctx);
        }
    }
    call_function(&callee, Value::Undefined, vec![props.clone()], ctx)
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentHandle::Native(_) => write!(f, "ComponentHandle::Native"),
            ComponentHandle::Script(function) => {
                write!(f, "ComponentHandle::Script({})", function.describe())
            }
        }
    }
}

/// Tri-state lookup outcome; `get_component` collapses it to an `Option`.
#[derive(Debug, Clone)]
pub enum ComponentLookup {
    Session(ComponentHandle),
    Default(ComponentHandle),
    Missing,
}

/// One row of `list_components`: the name and whether a session entry
/// currently owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentListing {
    pub name: String,
    pub session: bool,
}
