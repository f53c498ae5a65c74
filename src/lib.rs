//! # understudy - dynamic component registry & bundle loader
//!
//! A runtime that accepts externally supplied program text ("a bundle"),
//! executes it inside a restricted scope, and splices the components it
//! exports into a live two-tier registry. Features:
//! - PEG parser for the bundle scripting subset
//! - Tree-walking evaluator with step and call-depth budgets
//! - Fixed host module map with an inert fallback for unresolved imports
//! - Session-over-default component registry with a synchronous event bus
//!
//! ## Quick Start
//!
//! ### Parsing bundle text
//!
//! ```
//! use understudy::parser::parse_to_ast;
//!
//! let code = "var x = 5 + 3;";
//! let program = parse_to_ast(code).unwrap();
//! println!("Parsed {} statements", program.body.len());
//! ```
//!
//! ### Loading a bundle into the registry
//!
//! ```
//! use understudy::runner::ds::value::Value;
//! use understudy::runner::loader::ComponentRegistry;
//!
//! let registry = ComponentRegistry::new();
//! let code = r#"
//!     exports.screens = {
//!         Home: function (props) {
//!             return UI.text('hello from the bundle');
//!         }
//!     };
//! "#;
//!
//! let summary = registry.load_session_bundle(code, "session-1").unwrap();
//! assert_eq!(summary.component_count, 1);
//!
//! let home = registry.get_component("Home").unwrap();
//! let tree = home.render(&Value::Undefined).unwrap();
//! assert_eq!(tree.kind, "text");
//! ```
//!
//! ### Watching registry events
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understudy::runner::loader::{ComponentRegistry, EventTopic};
//!
//! let registry = ComponentRegistry::new();
//! let updates = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&updates);
//! registry.events().subscribe(EventTopic::ComponentsUpdated, move |_| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! registry.load_session_bundle("exports.screens = {};", "s1").unwrap();
//! assert_eq!(updates.get(), 1);
//! ```
//!
//! ## Two-Tier Resolution
//!
//! Consumers resolve components by name. The registry keeps two layers:
//!
//! 1. **Default tier**: registered by the host at boot through
//!    [`runner::loader::ComponentRegistry::register_default_component`];
//!    never removed or overwritten by session activity.
//!
//! 2. **Session tier**: populated wholesale from one bundle's exports by
//!    [`runner::loader::ComponentRegistry::load_session_bundle`]. A session
//!    entry shadows a same-named default; clearing the session uncovers the
//!    default again. At most one session is active, and a new load replaces
//!    the previous session entirely.
//!
//! Lookup is tri-state (session, default, missing) and never faults: a miss
//! is an `Option::None` plus a log line, so a renderer can fall back
//! gracefully.
//!
//! ## The Sandbox Contract
//!
//! Bundle code runs as a function body in a private scope exposing exactly
//! `exports`, `module`, `require`, `log`, the `UI` primitive namespace and
//! the `Error` constructor. `require` resolves against a fixed
//! [`runner::host::HostModuleMap`]; names the host recognizes but does not
//! back, and names it has never heard of, both degrade to an inert fallback
//! object so bundle execution keeps going with the affected output missing.
//! The evaluator enforces a step budget and a call-depth cap, so a runaway
//! bundle terminates with a fault instead of stalling the host.
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar and AST for the bundle scripting subset
//! - **[`runner`]** - execution and loading
//!   - **[`runner::ds`]** - values, objects, scopes, elements
//!   - **[`runner::eval`]** - tree-walking evaluator with budgets
//!   - **[`runner::host`]** - UI primitives, class shims, the module map
//!   - **[`runner::loader`]** - executor, registry, event bus

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
