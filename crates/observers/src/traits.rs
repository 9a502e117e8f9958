//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer written against them works with any solver that implements them.
//!
//! # Example
//!
//! ```rust
//! use kurve_core::Observer;
//! use kurve_observers::traits::{CanStopEarly, HasObjective};
//!
//! struct GoodEnough {
//!     objective_tol: f64,
//! }
//!
//! impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.objective() < self.objective_tol).then(A::stop_early)
//!     }
//! }
//! ```

use kurve_solvers::least_squares::levenberg_marquardt;

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when no objective is available.
    fn objective(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasObjective for levenberg_marquardt::Event {
    fn objective(&self) -> f64 {
        levenberg_marquardt::Event::objective(self)
    }
}

impl CanStopEarly for levenberg_marquardt::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
