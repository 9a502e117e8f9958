use kurve_core::LeastSquaresProblem;
use nalgebra::{DMatrix, DVector};

use super::{Error, Solution, Status};

/// The current point with everything needed to propose the next step.
pub(super) struct State {
    x: Vec<f64>,
    residuals: DVector<f64>,
    jacobian: DMatrix<f64>,
    objective: f64,
    gradient_norm: f64,
    damping: f64,
}

/// A trial point evaluated at the residual level.
pub(super) struct Candidate {
    x: Vec<f64>,
    residuals: Vec<f64>,
    objective: f64,
}

/// Outcome of proposing one damped step.
pub(super) enum Trial {
    /// The step lowered the objective.
    Improved(Candidate),

    /// The step failed to lower the objective or could not be computed.
    Worse { objective: f64 },
}

impl State {
    pub(super) fn new<P: LeastSquaresProblem>(
        problem: &P,
        x: Vec<f64>,
        damping: f64,
    ) -> Result<Self, Error> {
        let residuals = problem.residuals(&x).map_err(problem_error)?;
        let objective = sum_of_squares(&residuals);
        let mut state = Self {
            residuals: DVector::from_vec(residuals),
            jacobian: DMatrix::zeros(0, 0),
            x,
            objective,
            gradient_norm: f64::INFINITY,
            damping,
        };
        state.linearize(problem)?;
        Ok(state)
    }

    pub(super) fn objective(&self) -> f64 {
        self.objective
    }

    pub(super) fn gradient_norm(&self) -> f64 {
        self.gradient_norm
    }

    pub(super) fn damping(&self) -> f64 {
        self.damping
    }

    pub(super) fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }

    /// Proposes `x + δ` and evaluates its objective. Pure query on `self`.
    pub(super) fn trial<P: LeastSquaresProblem>(&self, problem: &P) -> Result<Trial, Error> {
        let Some(delta) = self.step() else {
            return Ok(Trial::Worse {
                objective: f64::NAN,
            });
        };

        let x: Vec<f64> = self.x.iter().zip(delta.iter()).map(|(x, d)| x + d).collect();
        if x.iter().any(|value| !value.is_finite()) {
            return Ok(Trial::Worse {
                objective: f64::NAN,
            });
        }

        let residuals = problem.residuals(&x).map_err(problem_error)?;
        let objective = sum_of_squares(&residuals);
        if objective.is_finite() && objective < self.objective {
            Ok(Trial::Improved(Candidate {
                x,
                residuals,
                objective,
            }))
        } else {
            Ok(Trial::Worse { objective })
        }
    }

    /// Moves to `candidate` and relinearizes there.
    pub(super) fn accept<P: LeastSquaresProblem>(
        &mut self,
        problem: &P,
        candidate: Candidate,
    ) -> Result<(), Error> {
        self.x = candidate.x;
        self.residuals = DVector::from_vec(candidate.residuals);
        self.objective = candidate.objective;
        self.linearize(problem)
    }

    pub(super) fn into_solution(self, status: Status, iters: usize) -> Solution {
        Solution {
            status,
            x: self.x,
            objective: self.objective,
            gradient_norm: self.gradient_norm,
            iters,
        }
    }

    fn linearize<P: LeastSquaresProblem>(&mut self, problem: &P) -> Result<(), Error> {
        let rows = self.residuals.len();
        let columns = self.x.len();
        let jacobian = problem.jacobian(&self.x).map_err(problem_error)?;
        self.jacobian = DMatrix::from_row_slice(rows, columns, &jacobian);

        let gradient = problem.gradient(&self.x).map_err(problem_error)?;
        self.gradient_norm = sum_of_squares(&gradient).sqrt();
        Ok(())
    }

    /// Solves `(JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr`.
    ///
    /// Zero diagonal entries are lifted to a small floor so the damped matrix
    /// stays positive definite for columns the residuals do not touch.
    fn step(&self) -> Option<DVector<f64>> {
        let transposed = self.jacobian.transpose();
        let mut normal = &transposed * &self.jacobian;
        let rhs = -(&transposed * &self.residuals);

        let largest = normal.diagonal().iter().copied().fold(0.0, f64::max);
        let floor = largest.max(1.0) * f64::EPSILON;
        for i in 0..normal.nrows() {
            let diagonal = normal[(i, i)];
            normal[(i, i)] = diagonal + self.damping * diagonal.max(floor);
        }

        normal.cholesky().map(|factor| factor.solve(&rhs))
    }
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

fn problem_error<E>(error: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::Problem(Box::new(error))
}
