//! Sandboxed execution of bundle source text.

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::parser::parse_to_ast;
use crate::runner::ds::function::FunctionValue;
use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::scope::Scope;
use crate::runner::ds::value::Value;
use crate::runner::eval::statement::execute_body;
use crate::runner::eval::types::{EvalContext, ExecLimits};
use crate::runner::host::module_map::{HostModuleMap, ModuleMapEntry};
use crate::runner::host::ui::make_ui_namespace;

use super::error::BundleError;
use super::resolver::{make_require, ModuleResolver};
use super::session::{decode_session_module, SessionModule};

/// Parses and runs bundle text as a function body in a private scope, then
/// decodes `module.exports`. The scope exposes exactly `exports`, `module`,
/// `require`, `log`, `UI` and `Error`; nothing else is ambient.
pub struct BundleExecutor {
    resolver: Rc<ModuleResolver>,
    ui_namespace: Value,
    limits: ExecLimits,
}

impl BundleExecutor {
    pub fn new(map: Rc<HostModuleMap>) -> Self {
        BundleExecutor::with_limits(map, ExecLimits::default())
    }

    pub fn with_limits(map: Rc<HostModuleMap>, limits: ExecLimits) -> Self {
        // The ambient `UI` binding aliases the mapped "ui" module when one
        // is provided, so `UI === require('ui')` holds for bundles.
        let ui_namespace = match map.entry("ui") {
            Some(ModuleMapEntry::Provided(value)) => value.clone(),
            _ => make_ui_namespace(),
        };
        BundleExecutor {
            resolver: Rc::new(ModuleResolver::new(map)),
            ui_namespace,
            limits,
        }
    }

    pub fn limits(&self) -> ExecLimits {
        self.limits
    }

    /// Run one bundle. Any parse failure, runtime fault or exports-shape
    /// violation comes back as a [`BundleError`]; a top-level `return`
    /// simply ends the body early.
    pub fn execute(&self, source: &str) -> Result<SessionModule, BundleError> {
        let program =
            parse_to_ast(source).map_err(|e| BundleError::Parse(e.to_string()))?;

        let exports = ObjectHandle::new();
        let module = ObjectHandle::new();
        module.set("exports", Value::Object(exports.clone()));

        let scope = Scope::new_root();
        scope.declare_var("exports", Value::Object(exports));
        scope.declare_var("module", Value::Object(module.clone()));
        scope.declare_var("require", make_require(Rc::clone(&self.resolver)));
        scope.declare_var("log", make_log());
        scope.declare_var("UI", self.ui_namespace.clone());
        scope.declare_var("Error", make_error_constructor());

        let mut ctx = EvalContext::new(self.limits);
        let started = Instant::now();
        execute_body(&program.body, &scope, &mut ctx)
            .map_err(|e| BundleError::Execution(e.to_string()))?;
        debug!(
            steps = ctx.steps_used(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bundle body evaluated"
        );

        // Always the live `module.exports` value: reassignment wins over
        // writes to the original `exports` object.
        decode_session_module(&module.get("exports"))
    }
}

/// The sandbox logging facility: arguments render space-separated on the
/// `bundle` target so host filtering can single them out.
fn make_log() -> Value {
    Value::Function(Rc::new(FunctionValue::native("log", |_, args| {
        let line = args
            .iter()
            .map(|v| v.to_log_string())
            .collect::<Vec<_>>()
            .join(" ");
        info!(target: "bundle", "{}", line);
        Ok(Value::Undefined)
    })))
}

/// `Error` constructor: builds `{name: "Error", message}` so thrown values
/// render as `Error: message`. Works with and without `new`.
fn make_error_constructor() -> Value {
    Value::Function(Rc::new(FunctionValue::native("Error", |_, args| {
        let message = match args.first() {
            Some(Value::Undefined) | None => String::new(),
            Some(value) => value.to_log_string(),
        };
        let error = ObjectHandle::new();
        error.set("name", Value::str("Error"));
        error.set("message", Value::String(message));
        Ok(Value::Object(error))
    })))
}
