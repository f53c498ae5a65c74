use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;

struct Binding {
    value: Value,
    mutable: bool,
}

struct ScopeData {
    bindings: HashMap<String, Binding>,
    this_value: Option<Value>,
    parent: Option<Scope>,
}

/// Lexical scope chain node. Cloning aliases the same scope, so closures
/// captured from a scope observe later writes to it.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<ScopeData>>);

impl Scope {
    pub fn new_root() -> Self {
        Scope(Rc::new(RefCell::new(ScopeData {
            bindings: HashMap::new(),
            this_value: None,
            parent: None,
        })))
    }

    /// Block scope: no own `this`, resolution falls through to the parent.
    pub fn child(&self) -> Self {
        Scope(Rc::new(RefCell::new(ScopeData {
            bindings: HashMap::new(),
            this_value: None,
            parent: Some(self.clone()),
        })))
    }

    /// Function scope with its own `this` binding.
    pub fn child_with_this(&self, this_value: Value) -> Self {
        Scope(Rc::new(RefCell::new(ScopeData {
            bindings: HashMap::new(),
            this_value: Some(this_value),
            parent: Some(self.clone()),
        })))
    }

    /// Mutable binding in this scope, silently replacing an earlier binding
    /// of the same name. Hoisting, parameters and host globals use this.
    pub fn declare_var(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(
            name.to_string(),
            Binding {
                value,
                mutable: true,
            },
        );
    }

    /// `let`/`const` declaration: duplicate names in the same scope are
    /// rejected.
    pub fn declare_lexical(
        &self,
        name: &str,
        value: Value,
        mutable: bool,
    ) -> Result<(), ScriptError> {
        let mut data = self.0.borrow_mut();
        if data.bindings.contains_key(name) {
            return Err(ScriptError::Syntax(format!(
                "identifier '{}' has already been declared",
                name
            )));
        }
        data.bindings
            .insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    /// Assignment walks the chain to the owning scope. Unbound names and
    /// `const` bindings are errors.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ScriptError> {
        let mut current = self.clone();
        loop {
            {
                let mut data = current.0.borrow_mut();
                if let Some(binding) = data.bindings.get_mut(name) {
                    if !binding.mutable {
                        return Err(ScriptError::Type(format!(
                            "assignment to constant '{}'",
                            name
                        )));
                    }
                    binding.value = value;
                    return Ok(());
                }
            }
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => {
                    return Err(ScriptError::Reference(format!("'{}' is not defined", name)))
                }
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            if let Some(binding) = current.0.borrow().bindings.get(name) {
                return Some(binding.value.clone());
            }
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return None,
            }
        }
    }

    /// True when this scope itself binds `name`, ignoring ancestors.
    pub fn has_own(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Nearest enclosing `this`; `undefined` outside any function scope.
    pub fn this_value(&self) -> Value {
        let mut current = self.clone();
        loop {
            if let Some(v) = &current.0.borrow().this_value {
                return v.clone();
            }
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return Value::Undefined,
            }
        }
    }
}
