use kurve_solvers::least_squares::levenberg_marquardt;
use thiserror::Error;

/// Configuration for solving and normalizing curves.
///
/// Objectives grow with the square of the curve length, so the convergence
/// tolerance is given per unit of length and scaled for each solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    solver: levenberg_marquardt::Config,
    gradient_tol: f64,
    uniformity_weight: f64,
}

/// Errors that can occur when validating an optimizer config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gradient_tol must be finite and non-negative")]
    GradientTol,

    #[error("uniformity_weight must be finite and non-negative")]
    UniformityWeight,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solver: levenberg_marquardt::Config::default(),
            gradient_tol: 1e-12,
            uniformity_weight: 1e-8,
        }
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// The gradient tolerance of `solver` is replaced by
    /// `gradient_tol · L` for a curve of length `L`.
    ///
    /// # Errors
    ///
    /// Returns an error if `gradient_tol` or `uniformity_weight` is negative
    /// or non-finite.
    pub fn new(
        solver: levenberg_marquardt::Config,
        gradient_tol: f64,
        uniformity_weight: f64,
    ) -> Result<Self, ConfigError> {
        if !gradient_tol.is_finite() || gradient_tol < 0.0 {
            return Err(ConfigError::GradientTol);
        }
        if !uniformity_weight.is_finite() || uniformity_weight < 0.0 {
            return Err(ConfigError::UniformityWeight);
        }

        Ok(Self {
            solver,
            gradient_tol,
            uniformity_weight,
        })
    }

    /// Returns the Levenberg–Marquardt config used for every solve.
    #[must_use]
    pub fn solver(&self) -> &levenberg_marquardt::Config {
        &self.solver
    }

    /// Returns the gradient tolerance per unit of curve length.
    #[must_use]
    pub fn gradient_tol(&self) -> f64 {
        self.gradient_tol
    }

    /// Returns the weight of the uniform-speed term used by normalization.
    #[must_use]
    pub fn uniformity_weight(&self) -> f64 {
        self.uniformity_weight
    }

    /// Solver config for a curve of length `curve_length`.
    pub(crate) fn solver_for(
        &self,
        curve_length: f64,
    ) -> Result<levenberg_marquardt::Config, levenberg_marquardt::ConfigError> {
        self.solver.with_gradient_tol(self.gradient_tol * curve_length)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn tolerance_scales_with_length() {
        let config = Config::default();

        assert_relative_eq!(config.solver_for(1000.0).unwrap().gradient_tol(), 1e-9);
        assert_eq!(
            config.solver_for(1000.0).unwrap().max_iters(),
            config.solver().max_iters()
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let solver = levenberg_marquardt::Config::default();

        assert_eq!(
            Config::new(solver, -1.0, 1e-8),
            Err(ConfigError::GradientTol)
        );
        assert_eq!(
            Config::new(solver, 1e-12, f64::INFINITY),
            Err(ConfigError::UniformityWeight)
        );
        assert!(Config::new(solver, 0.0, 0.0).is_ok());
    }
}
