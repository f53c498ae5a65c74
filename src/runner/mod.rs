//! Execution side of the crate: value model, evaluator, host surface and
//! the bundle loader built on top of them.

pub mod ds;
pub mod eval;
pub mod host;
pub mod loader;
