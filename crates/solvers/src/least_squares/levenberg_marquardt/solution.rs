/// Indicates why the solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The gradient norm fell within tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// The damping grew past its cap without finding a better point.
    Stalled,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a Levenberg–Marquardt solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best point found.
    pub x: Vec<f64>,

    /// Objective `Σ rᵢ²` at `x`.
    pub objective: f64,

    /// Euclidean norm of the objective gradient at `x`.
    pub gradient_norm: f64,

    /// Number of trial steps taken.
    pub iters: usize,
}

impl Solution {
    /// Returns `true` if the solve met the gradient tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
