use thiserror::Error;

/// Failure of one bundle execution, normalized to a human-readable message.
/// Loads are never retried automatically; the caller decides what to do.
#[derive(Debug, Clone, Error)]
pub enum BundleError {
    #[error("bundle parse failed: {0}")]
    Parse(String),
    #[error("bundle execution failed: {0}")]
    Execution(String),
    #[error("bundle exports malformed: {0}")]
    MalformedExports(String),
}

/// Outcome of `load_session_bundle`.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error("a bundle load is already in progress")]
    LoadInProgress,
}
