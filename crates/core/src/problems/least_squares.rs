/// Defines a nonlinear least-squares problem.
///
/// The problem maps solver variables `x` to a residual vector `r(x)` and its
/// Jacobian. Solvers search for the `x` that minimizes the objective
/// `Σ rᵢ(x)²`.
///
/// The number of variables is a runtime property of the assembled problem.
pub trait LeastSquaresProblem {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the number of solver variables.
    fn variable_count(&self) -> usize;

    /// Returns the number of residuals.
    fn residual_count(&self) -> usize;

    /// Computes the residual vector at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the residuals cannot be computed.
    fn residuals(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error>;

    /// Computes the Jacobian `∂rᵢ/∂xⱼ` at `x` in row-major order
    /// (`residual_count` rows of `variable_count` entries).
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the Jacobian cannot be computed.
    fn jacobian(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error>;

    /// Computes the objective `Σ rᵢ²` at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the residuals cannot be computed.
    fn objective(&self, x: &[f64]) -> Result<f64, Self::Error> {
        Ok(self.residuals(x)?.iter().map(|r| r * r).sum())
    }

    /// Computes the objective gradient at `x`.
    ///
    /// The default forms `2 Jᵀ r` from [`Self::jacobian`] and
    /// [`Self::residuals`].
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the residuals or Jacobian cannot be computed.
    fn gradient(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
        let n = self.variable_count();
        let residuals = self.residuals(x)?;
        let jacobian = self.jacobian(x)?;

        let mut gradient = vec![0.0; n];
        for (row, residual) in jacobian.chunks_exact(n.max(1)).zip(&residuals) {
            for (g, j) in gradient.iter_mut().zip(row) {
                *g += 2.0 * j * residual;
            }
        }
        Ok(gradient)
    }
}
