//! Levenberg–Marquardt for nonlinear least squares.
//!
//! # Algorithm
//!
//! Each iteration linearizes the residuals around the current `x` and solves
//! the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr
//! ```
//!
//! by Cholesky factorization. The trial point `x + δ` is accepted when it
//! lowers the objective `Σ rᵢ²`; the damping `λ` then shrinks toward a
//! Gauss–Newton step. A trial that fails to improve, or whose objective is
//! not finite, is rejected and `λ` grows toward a short gradient step.
//!
//! # Termination
//!
//! - [`Status::Converged`]: the objective gradient norm is within
//!   [`Config::gradient_tol`]
//! - [`Status::MaxIters`]: [`Config::max_iters`] trials were made
//! - [`Status::Stalled`]: the damping exceeded [`Config::max_damping`], so
//!   no further progress is possible in floating point
//! - [`Status::StoppedByObserver`]: the observer returned [`Action::StopEarly`]
//!
//! None of these is an error. The returned [`Solution`] always holds the best
//! point found.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per trial step:
//!
//! - [`Event::Accepted`]: the step was taken
//! - [`Event::Rejected`]: the step was discarded and the damping raised

mod action;
mod config;
mod error;
mod event;
mod solution;
mod state;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use kurve_core::{LeastSquaresProblem, Observer};

use state::{State, Trial};

/// Smallest damping the solver will shrink to.
const DAMPING_FLOOR: f64 = 1e-12;

/// Factor applied to the damping after each accepted or rejected trial.
const DAMPING_FACTOR: f64 = 10.0;

/// Minimizes `Σ rᵢ(x)²` starting from `x0`.
///
/// The observer receives an [`Event`] for each trial step.
/// See the [module docs](self) for details on termination and events.
///
/// # Errors
///
/// Returns an error if `x0` has the wrong length or holds non-finite values,
/// if the objective at `x0` is not finite, or if the problem fails to compute
/// its residuals, Jacobian, or gradient.
pub fn minimize<P, Obs>(
    problem: &P,
    x0: &[f64],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    P: LeastSquaresProblem,
    Obs: Observer<Event, Action>,
{
    let expected = problem.variable_count();
    if x0.len() != expected {
        return Err(Error::InvalidStart {
            expected,
            actual: x0.len(),
        });
    }
    if x0.iter().any(|value| !value.is_finite()) {
        return Err(Error::NonFiniteStart);
    }

    let mut state = State::new(problem, x0.to_vec(), config.initial_damping())?;
    if !state.objective().is_finite() {
        return Err(Error::NonFiniteStart);
    }

    for iter in 1..=config.max_iters() {
        if state.gradient_norm() <= config.gradient_tol() {
            return Ok(state.into_solution(Status::Converged, iter - 1));
        }

        let event = match state.trial(problem)? {
            Trial::Improved(candidate) => {
                state.accept(problem, candidate)?;
                state.set_damping((state.damping() / DAMPING_FACTOR).max(DAMPING_FLOOR));
                Event::Accepted {
                    iter,
                    objective: state.objective(),
                    gradient_norm: state.gradient_norm(),
                    damping: state.damping(),
                }
            }
            Trial::Worse { objective } => {
                state.set_damping(state.damping() * DAMPING_FACTOR);
                Event::Rejected {
                    iter,
                    objective: state.objective(),
                    trial_objective: objective,
                    damping: state.damping(),
                }
            }
        };

        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(state.into_solution(Status::StoppedByObserver, iter));
        }

        if state.damping() > config.max_damping() {
            return Ok(state.into_solution(Status::Stalled, iter));
        }
    }

    let status = if state.gradient_norm() <= config.gradient_tol() {
        Status::Converged
    } else {
        Status::MaxIters
    };
    Ok(state.into_solution(status, config.max_iters()))
}

/// Minimizes `Σ rᵢ(x)²` without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error under the same conditions as [`minimize`].
pub fn minimize_unobserved<P>(problem: &P, x0: &[f64], config: &Config) -> Result<Solution, Error>
where
    P: LeastSquaresProblem,
{
    minimize(problem, x0, config, ())
}
