use std::fmt::Debug;

use kurve_core::Observer;
use log::Level;

use crate::traits::{CanStopEarly, HasObjective};

/// An observer that writes every solver event to the `log` facade.
///
/// Events are logged at the configured level under the `kurve::solver`
/// target. With a budget set, the observer asks the solver to stop once that
/// many events have been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogObserver {
    level: Level,
    budget: Option<usize>,
    seen: usize,
}

impl LogObserver {
    /// Creates an observer that logs at `level` and never stops the solver.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            budget: None,
            seen: 0,
        }
    }

    /// Stops the solver after `events` events.
    #[must_use]
    pub fn with_budget(self, events: usize) -> Self {
        Self {
            budget: Some(events),
            ..self
        }
    }

    /// Returns the number of events observed so far.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl<E, A> Observer<E, A> for LogObserver
where
    E: HasObjective + Debug,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.seen += 1;
        log::log!(
            target: "kurve::solver",
            self.level,
            "event {}: objective {:.6e} {:?}",
            self.seen,
            event.objective(),
            event
        );

        match self.budget {
            Some(budget) if self.seen >= budget => {
                log::log!(target: "kurve::solver", self.level, "event budget {budget} spent");
                Some(A::stop_early())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurve_core::LeastSquaresProblem;
    use kurve_solvers::least_squares::levenberg_marquardt::{self, Config, Status};

    use super::*;

    /// r = [x₀ − 1, x₀·x₁ − 2]
    struct Pair;

    impl LeastSquaresProblem for Pair {
        type Error = std::convert::Infallible;

        fn variable_count(&self) -> usize {
            2
        }

        fn residual_count(&self) -> usize {
            2
        }

        fn residuals(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
            Ok(vec![x[0] - 1.0, x[0] * x[1] - 2.0])
        }

        fn jacobian(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
            Ok(vec![1.0, 0.0, x[1], x[0]])
        }
    }

    #[test]
    fn budget_stops_the_solver() {
        let mut observer = LogObserver::new(Level::Debug).with_budget(1);

        let solution = levenberg_marquardt::minimize(
            &Pair,
            &[5.0, 5.0],
            &Config::default(),
            |event: &levenberg_marquardt::Event| -> Option<levenberg_marquardt::Action> {
                observer.observe(event)
            },
        )
        .unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 1);
        assert_eq!(observer.seen(), 1);
    }

    #[test]
    fn without_budget_the_solver_runs_to_completion() {
        let solution = levenberg_marquardt::minimize(
            &Pair,
            &[5.0, 5.0],
            &Config::default(),
            LogObserver::default(),
        )
        .unwrap();

        assert!(solution.is_converged());
        approx::assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-8);
        approx::assert_relative_eq!(solution.x[1], 2.0, epsilon = 1e-8);
    }
}
