use kurve_curves::optimizer::{self, Config, Solution};
use kurve_curves::{BasicSpecification, PolynomialCurve, Specification};
use kurve_observers::LogObserver;
use log::Level;

use crate::FitError;

/// What the worker delivers to an owner.
pub type Delivery = Result<Fit, FitError>;

/// A finished fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// Generation of the submission this fit answers.
    pub generation: u64,

    /// The basic specification as submitted.
    pub basic: BasicSpecification,

    /// The fitted specification, which is also the owner's next warm start.
    pub specification: Specification,

    /// The fitted curve.
    pub curve: PolynomialCurve,

    /// Whether the final solve met its tolerance.
    pub converged: bool,
}

/// Turns a warm-started specification into a solution.
///
/// The worker calls this on its own threads, once per fit that is not
/// superseded before it starts.
pub trait Fitter: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns an error if the specification cannot be solved.
    fn fit(&self, specification: &Specification) -> Result<Solution, optimizer::Error>;
}

/// The default fitter: solve, then normalize.
///
/// Every solver event of a fit is logged through a [`LogObserver`] at the
/// fitter's log level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFitter {
    config: Config,
    log_level: Level,
}

impl CurveFitter {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            log_level: Level::Trace,
        }
    }

    /// Logs solver events at `log_level` instead of `trace`.
    #[must_use]
    pub fn with_log_level(self, log_level: Level) -> Self {
        Self { log_level, ..self }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Fitter for CurveFitter {
    fn fit(&self, specification: &Specification) -> Result<Solution, optimizer::Error> {
        optimizer::fit(specification, &self.config, LogObserver::new(self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use kurve_curves::{PointCurveSpecification, SegmentTemplate};

    use super::*;

    #[test]
    fn logs_at_trace_unless_told_otherwise() {
        let fitter = CurveFitter::default();
        assert_eq!(fitter.log_level(), Level::Trace);

        let quiet = fitter.with_log_level(Level::Debug);
        assert_eq!(quiet.log_level(), Level::Debug);
        assert_eq!(quiet.config(), fitter.config());
    }

    #[test]
    fn observed_fit_converges() {
        let specs = vec![
            PointCurveSpecification::new(0.0, (0.0, 0.0)).unwrap().into(),
            PointCurveSpecification::new(1.0, (80.0, 20.0)).unwrap().into(),
        ];
        let basic = BasicSpecification::new(100.0, 1, SegmentTemplate::CUBIC, specs).unwrap();

        let solution = CurveFitter::default()
            .with_log_level(Level::Debug)
            .fit(&Specification::initial(basic))
            .unwrap();

        assert!(solution.is_converged(), "status: {:?}", solution.status);
    }
}
