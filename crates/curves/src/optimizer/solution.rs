use kurve_solvers::least_squares::levenberg_marquardt::Status;

use crate::{Point, PolynomialCurve, Specification};

/// The result of solving a specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The specification with its solved parameter vector.
    pub specification: Specification,

    /// The curve the parameter vector describes.
    pub curve: PolynomialCurve,

    /// Solved position of each virtual point, by attachment index.
    pub virtual_points: Vec<(usize, Point)>,

    /// Objective at the solution.
    pub objective: f64,

    /// Objective gradient norm at the solution.
    pub gradient_norm: f64,

    /// Solver iteration count.
    pub iters: usize,

    /// Final solver status.
    pub status: Status,
}

impl Solution {
    /// Returns `true` if the solver met its gradient tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
