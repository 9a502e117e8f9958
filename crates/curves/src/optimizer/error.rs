use kurve_core::TermError;
use kurve_solvers::least_squares::levenberg_marquardt;

use crate::SpecificationError;

/// Errors that can occur while solving or normalizing a curve.
///
/// Failing to converge is not an error; see [`Solution::status`].
///
/// [`Solution::status`]: super::Solution::status
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("specification error: {0}")]
    Specification(#[from] SpecificationError),

    #[error("term error: {0}")]
    Term(#[from] TermError),

    #[error("solver config error: {0}")]
    SolverConfig(#[from] levenberg_marquardt::ConfigError),

    #[error("solver error: {0}")]
    Solver(#[from] levenberg_marquardt::Error),
}
