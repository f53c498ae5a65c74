use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::parser::ast::Statement;
use crate::runner::ds::error::ScriptError;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::scope::Scope;
use crate::runner::ds::value::Value;

/// Host function implementation: `(this, args) -> value`.
pub type NativeFn = Box<dyn Fn(&Value, &[Value]) -> Result<Value, ScriptError>>;

pub enum FunctionKind {
    /// Bundle-defined function: parameter list, body and the scope it
    /// closed over.
    Script {
        params: Vec<String>,
        body: Rc<Vec<Statement>>,
        closure: Scope,
    },
    Native(NativeFn),
}

/// A callable value. Functions carry a small own-property map so that
/// constructor patterns (`F.prototype`, statics set by class shims) work.
pub struct FunctionValue {
    name: Option<String>,
    pub kind: FunctionKind,
    properties: RefCell<HashMap<String, Value>>,
}

impl FunctionValue {
    pub fn script(
        name: Option<String>,
        params: Vec<String>,
        body: Rc<Vec<Statement>>,
        closure: Scope,
    ) -> Self {
        FunctionValue {
            name,
            kind: FunctionKind::Script {
                params,
                body,
                closure,
            },
            properties: RefCell::new(HashMap::new()),
        }
    }

    pub fn native<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, ScriptError> + 'static,
    {
        FunctionValue {
            name: Some(name.to_string()),
            kind: FunctionKind::Native(Box::new(f)),
            properties: RefCell::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn describe(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    pub fn get_property(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn set_property(&self, key: &str, value: Value) {
        self.properties
            .borrow_mut()
            .insert(key.to_string(), value);
    }

    /// The object bound as `.prototype`, when one has been assigned and is
    /// object-shaped.
    pub fn prototype_object(&self) -> Option<ObjectHandle> {
        match self.properties.borrow().get("prototype") {
            Some(Value::Object(o)) => Some(o.clone()),
            _ => None,
        }
    }
}

impl Display for FunctionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FunctionKind::Script { params, .. } => {
                write!(f, "function {}({})", self.describe(), params.join(", "))
            }
            FunctionKind::Native(_) => write!(f, "function {}() [native]", self.describe()),
        }
    }
}
