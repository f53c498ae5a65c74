//! The fixed table of names a bundle's `require` may resolve against.

use std::collections::HashMap;

use crate::runner::ds::value::Value;

use super::shims::make_class_shims;
use super::ui::make_ui_namespace;

/// One entry in the map. `Unsupported` marks a name the host recognizes but
/// deliberately does not back, which is a different diagnostic from a name
/// that was never considered at all.
pub enum ModuleMapEntry {
    Provided(Value),
    Unsupported,
}

/// Immutable-after-construction map from symbolic import names to host
/// implementations. Built explicitly and handed to the executor; there is
/// no process-wide instance.
pub struct HostModuleMap {
    entries: HashMap<String, ModuleMapEntry>,
}

impl HostModuleMap {
    pub fn new() -> Self {
        HostModuleMap {
            entries: HashMap::new(),
        }
    }

    /// The standard host table: the UI namespace, the class helper shims,
    /// and the sentinel entries for modules the sandbox cannot back.
    pub fn standard() -> Self {
        let mut map = HostModuleMap::new();
        map.provide("ui", make_ui_namespace());
        map.provide("lang/class", make_class_shims());
        for name in ["net", "storage", "timers"] {
            map.mark_unsupported(name);
        }
        map
    }

    pub fn provide(&mut self, name: &str, value: Value) {
        self.entries
            .insert(name.to_string(), ModuleMapEntry::Provided(value));
    }

    pub fn mark_unsupported(&mut self, name: &str) {
        self.entries
            .insert(name.to_string(), ModuleMapEntry::Unsupported);
    }

    pub fn entry(&self, name: &str) -> Option<&ModuleMapEntry> {
        self.entries.get(name)
    }

    /// All mapped names, sorted for stable display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HostModuleMap {
    fn default() -> Self {
        HostModuleMap::standard()
    }
}
