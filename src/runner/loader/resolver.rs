//! `require` resolution against the host module map.

use std::rc::Rc;

use tracing::warn;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::value::Value;
use crate::runner::host::fallback::make_fallback_module;
use crate::runner::host::module_map::{HostModuleMap, ModuleMapEntry};

/// Resolves symbolic import names. Never fails: unsupported and unknown
/// names both degrade to the shared inert fallback module, with distinct
/// warnings so the two outcomes stay distinguishable in logs.
pub struct ModuleResolver {
    map: Rc<HostModuleMap>,
    fallback: Value,
}

impl ModuleResolver {
    pub fn new(map: Rc<HostModuleMap>) -> Self {
        ModuleResolver {
            map,
            fallback: make_fallback_module(),
        }
    }

    pub fn module_map(&self) -> &HostModuleMap {
        &self.map
    }

    pub fn resolve(&self, name: &str) -> Value {
        match self.map.entry(name) {
            Some(ModuleMapEntry::Provided(value)) => value.clone(),
            Some(ModuleMapEntry::Unsupported) => {
                warn!(module = name, "module is known but unsupported, serving fallback");
                self.fallback.clone()
            }
            None => {
                warn!(module = name, "module is not in the host module map, serving fallback");
                self.fallback.clone()
            }
        }
    }
}

/// The `require` function bound into bundle scope.
pub fn make_require(resolver: Rc<ModuleResolver>) -> Value {
    Value::Function(Rc::new(FunctionValue::native("require", move |_, args| {
        match args.first() {
            Some(Value::String(name)) => Ok(resolver.resolve(name)),
            Some(other) => Err(ScriptError::Type(format!(
                "require expects a module name string, got {}",
                other.type_of()
            ))),
            None => Err(ScriptError::Type(
                "require expects a module name".to_string(),
            )),
        }
    })))
}
