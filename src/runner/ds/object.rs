use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::value::Value;

/// Plain object data: an own-property map plus an optional prototype link.
pub struct ObjectData {
    properties: HashMap<String, Value>,
    prototype: Option<ObjectHandle>,
}

impl ObjectData {
    pub fn new() -> Self {
        ObjectData {
            properties: HashMap::new(),
            prototype: None,
        }
    }

    pub fn with_prototype(prototype: ObjectHandle) -> Self {
        ObjectData {
            properties: HashMap::new(),
            prototype: Some(prototype),
        }
    }

    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn prototype(&self) -> Option<ObjectHandle> {
        self.prototype.clone()
    }

    pub fn set_prototype(&mut self, prototype: Option<ObjectHandle>) {
        self.prototype = prototype;
    }

    /// Own property names, sorted for stable iteration order.
    pub fn own_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.properties.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn own_len(&self) -> usize {
        self.properties.len()
    }
}

impl Default for ObjectData {
    fn default() -> Self {
        ObjectData::new()
    }
}

/// Shared handle to an object. Cloning the handle aliases the same object;
/// equality between handles is identity.
#[derive(Clone)]
pub struct ObjectHandle(Rc<RefCell<ObjectData>>);

impl ObjectHandle {
    pub fn new() -> Self {
        ObjectHandle(Rc::new(RefCell::new(ObjectData::new())))
    }

    pub fn with_prototype(prototype: ObjectHandle) -> Self {
        ObjectHandle(Rc::new(RefCell::new(ObjectData::with_prototype(prototype))))
    }

    pub fn from_entries(entries: Vec<(String, Value)>) -> Self {
        let handle = ObjectHandle::new();
        {
            let mut data = handle.borrow_mut();
            for (k, v) in entries {
                data.set(&k, v);
            }
        }
        handle
    }

    pub fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    /// Property read through the prototype chain; `undefined` when absent
    /// anywhere along it.
    pub fn get(&self, key: &str) -> Value {
        let mut current = self.clone();
        loop {
            if let Some(v) = current.borrow().get_own(key) {
                return v;
            }
            let next = current.borrow().prototype();
            match next {
                Some(p) => current = p,
                None => return Value::Undefined,
            }
        }
    }

    /// Writes always land on the receiver's own map.
    pub fn set(&self, key: &str, value: Value) {
        self.borrow_mut().set(key, value);
    }

    pub fn has(&self, key: &str) -> bool {
        let mut current = self.clone();
        loop {
            if current.borrow().has_own(key) {
                return true;
            }
            let next = current.borrow().prototype();
            match next {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    pub fn ptr_eq(a: &ObjectHandle, b: &ObjectHandle) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        ObjectHandle::new()
    }
}

impl ObjectHandle {
    /// Depth-guarded rendering; `{...}` at the ceiling so self-referential
    /// objects terminate.
    pub(crate) fn fmt_depth(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        if depth >= crate::runner::ds::value::RENDER_DEPTH_LIMIT {
            return write!(f, "{{...}}");
        }
        let data = self.borrow();
        write!(f, "{{")?;
        for (i, key) in data.own_keys().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            // Own read only; rendering must not chase shared prototypes
            // that may alias the receiver.
            write!(f, "{}: ", key)?;
            match data.get_own(key) {
                Some(v) => v.fmt_depth(f, depth + 1)?,
                None => write!(f, "undefined")?,
            }
        }
        write!(f, "}}")
    }
}

impl Display for ObjectHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_depth(f, 0)
    }
}
