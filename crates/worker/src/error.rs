use kurve_curves::optimizer;
use thiserror::Error;

/// Errors returned synchronously by the worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("owner is not registered")]
    UnknownOwner,

    #[error("owner is already registered")]
    AlreadyRegistered,

    #[error("failed to spawn fitting thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A fit that failed on the worker thread.
///
/// Delivered through the owner's inbox in place of a [`Fit`](crate::Fit).
#[derive(Debug, Error)]
#[error("fit of generation {generation} failed: {source}")]
pub struct FitError {
    /// Generation of the submission that failed.
    pub generation: u64,

    /// What went wrong.
    pub source: FitFailure,
}

/// Why a fit produced no solution.
#[derive(Debug, Error)]
pub enum FitFailure {
    #[error("optimizer error: {0}")]
    Optimizer(#[from] optimizer::Error),

    #[error("fitter panicked: {0}")]
    Panicked(String),
}
