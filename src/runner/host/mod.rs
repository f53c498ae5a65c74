//! Host-provided surface bundles can see: the UI-primitive namespace, the
//! class helper shims, the fixed module map and the inert fallback module.

pub mod fallback;
pub mod module_map;
pub mod shims;
pub mod ui;

pub use fallback::make_fallback_module;
pub use module_map::{HostModuleMap, ModuleMapEntry};
pub use shims::make_class_shims;
pub use ui::{make_ui_namespace, UI_PRIMITIVES};
