use thiserror::Error;

/// Configuration for the Levenberg–Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    gradient_tol: f64,
    initial_damping: f64,
    max_damping: f64,
}

/// Errors that can occur when validating a Levenberg–Marquardt config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gradient_tol must be finite and non-negative")]
    GradientTol,

    #[error("initial_damping must be finite and positive")]
    InitialDamping,

    #[error("max_damping must be finite and at least initial_damping")]
    MaxDamping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 200,
            gradient_tol: 1e-9,
            initial_damping: 1e-3,
            max_damping: 1e12,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerance and damping bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `gradient_tol` is negative or non-finite, if
    /// `initial_damping` is not strictly positive and finite, or if
    /// `max_damping` is non-finite or below `initial_damping`.
    pub fn new(
        max_iters: usize,
        gradient_tol: f64,
        initial_damping: f64,
        max_damping: f64,
    ) -> Result<Self, ConfigError> {
        if !gradient_tol.is_finite() || gradient_tol < 0.0 {
            return Err(ConfigError::GradientTol);
        }
        if !initial_damping.is_finite() || initial_damping <= 0.0 {
            return Err(ConfigError::InitialDamping);
        }
        if !max_damping.is_finite() || max_damping < initial_damping {
            return Err(ConfigError::MaxDamping);
        }

        Ok(Self {
            max_iters,
            gradient_tol,
            initial_damping,
            max_damping,
        })
    }

    /// Returns a copy with a different gradient tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GradientTol`] if `gradient_tol` is negative or
    /// non-finite.
    pub fn with_gradient_tol(self, gradient_tol: f64) -> Result<Self, ConfigError> {
        Self::new(
            self.max_iters,
            gradient_tol,
            self.initial_damping,
            self.max_damping,
        )
    }

    /// Returns the maximum number of trial steps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the gradient norm at which the solve counts as converged.
    #[must_use]
    pub fn gradient_tol(&self) -> f64 {
        self.gradient_tol
    }

    /// Returns the damping used for the first trial step.
    #[must_use]
    pub fn initial_damping(&self) -> f64 {
        self.initial_damping
    }

    /// Returns the damping above which the solve is declared stalled.
    #[must_use]
    pub fn max_damping(&self) -> f64 {
        self.max_damping
    }
}
