use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::element::Element;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";

/// Nesting ceiling for rendering. Bundles can build cyclic or arbitrarily
/// deep value graphs; past this depth containers render as placeholders
/// instead of recursing.
pub(crate) const RENDER_DEPTH_LIMIT: usize = 8;

/// Runtime value of the bundle language. Objects, arrays, functions and
/// elements are reference types; everything else is copied.
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    String(String),
    Number(NumberKind),
    Object(ObjectHandle),
    Array(Rc<std::cell::RefCell<Vec<Value>>>),
    Function(Rc<FunctionValue>),
    Element(Rc<Element>),
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Number(NumberKind::Integer(i))
    }

    pub fn float(f: f64) -> Self {
        Value::Number(NumberKind::Float(f))
    }

    pub fn str(s: &str) -> Self {
        Value::String(s.to_string())
    }

    /// ToBoolean of the subset: undefined, null, false, 0, NaN and "" are
    /// falsy, everything else truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Number(NumberKind::Integer(i)) => *i != 0,
            Value::Number(NumberKind::Float(f)) => *f != 0.0 && !f.is_nan(),
            Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::Element(_) => true,
        }
    }

    /// The `typeof` string for this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => TYPE_STR_UNDEFINED,
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Object(_) | Value::Array(_) | Value::Element(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Rendering used by `log` and element props: like Display but without
    /// quotes around a top-level string.
    pub fn to_log_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Depth-guarded rendering backing Display. Objects render `{...}` and
    /// arrays `[...]` once `depth` hits the ceiling, which keeps cyclic
    /// graphs from recursing forever.
    pub(crate) fn fmt_depth(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            Value::Null => write!(f, "{}", TYPE_STR_NULL),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Object(o) => o.fmt_depth(f, depth),
            Value::Array(a) => {
                if depth >= RENDER_DEPTH_LIMIT {
                    return write!(f, "[...]");
                }
                write!(f, "[")?;
                for (i, v) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    v.fmt_depth(f, depth + 1)?;
                }
                write!(f, "]")
            }
            Value::Function(fv) => write!(f, "{}", fv),
            Value::Element(e) => e.fmt_guarded(f, 0, depth),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Undefined => Value::Undefined,
            Value::Null => Value::Null,
            Value::Boolean(b) => Value::Boolean(*b),
            Value::String(s) => Value::String(s.clone()),
            Value::Number(n) => Value::Number(*n),
            Value::Object(o) => Value::Object(o.clone()),
            Value::Array(a) => Value::Array(a.clone()),
            Value::Function(f) => Value::Function(f.clone()),
            Value::Element(e) => Value::Element(e.clone()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_depth(f, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Number(n) => write!(f, "Value::Number({:?})", n),
            Value::Object(_) => write!(f, "Value::Object(..)"),
            Value::Array(_) => write!(f, "Value::Array(..)"),
            Value::Function(fv) => write!(f, "Value::Function({})", fv.describe()),
            Value::Element(e) => write!(f, "Value::Element({})", e.kind),
        }
    }
}

impl PartialEq for Value {
    /// Strict (`===`) equality. Reference types compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => ObjectHandle::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Numbers keep their integer identity until an operation forces a float.
#[derive(Debug, Clone, Copy)]
pub enum NumberKind {
    Integer(i64),
    Float(f64),
}

impl NumberKind {
    pub fn as_f64(&self) -> f64 {
        match self {
            NumberKind::Integer(i) => *i as f64,
            NumberKind::Float(f) => *f,
        }
    }
}

impl PartialEq for NumberKind {
    fn eq(&self, other: &Self) -> bool {
        // NaN != NaN falls out of the f64 comparison.
        self.as_f64() == other.as_f64()
    }
}

impl Display for NumberKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Integer(i) => write!(f, "{}", i),
            NumberKind::Float(fl) => {
                if fl.is_nan() {
                    write!(f, "NaN")
                } else if fl.is_infinite() {
                    write!(f, "{}Infinity", if *fl < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{}", fl)
                }
            }
        }
    }
}
