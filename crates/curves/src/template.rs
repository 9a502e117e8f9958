use kurve_core::{Term, TermGraph};

use crate::SpecificationError;

/// Highest polynomial degree a segment may use.
pub const MAX_DEGREE: usize = 7;

/// The parametric family instantiated once per curve segment.
///
/// Each segment is parameterized by a local `u ∈ [0, 1]`. A polynomial
/// segment of degree `d` is `x(u) = Σ aₖ uᵏ`, `y(u) = Σ bₖ uᵏ` for
/// `k = 0..=d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentTemplate {
    /// A polynomial of the given degree in each coordinate.
    Polynomial { degree: usize },
}

impl SegmentTemplate {
    /// Creates a polynomial template.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::UnsupportedDegree`] unless
    /// `1 <= degree <= 7`.
    pub fn polynomial(degree: usize) -> Result<Self, SpecificationError> {
        let template = Self::Polynomial { degree };
        template.validate()?;
        Ok(template)
    }

    /// A cubic polynomial template.
    pub const CUBIC: Self = Self::Polynomial { degree: 3 };

    pub(crate) fn validate(self) -> Result<(), SpecificationError> {
        match self {
            Self::Polynomial { degree } if (1..=MAX_DEGREE).contains(&degree) => Ok(()),
            Self::Polynomial { degree } => Err(SpecificationError::UnsupportedDegree(degree)),
        }
    }

    /// Number of coefficients per coordinate.
    #[must_use]
    pub fn coefficient_count(self) -> usize {
        match self {
            Self::Polynomial { degree } => degree + 1,
        }
    }

    /// Number of parameters one segment contributes (both coordinates).
    #[must_use]
    pub fn parameter_count(self) -> usize {
        2 * self.coefficient_count()
    }

    /// Highest derivative order matched across knots.
    ///
    /// Degree 1 matches position only, degree 2 adds the first derivative,
    /// and higher degrees add the second derivative as well.
    #[must_use]
    pub fn continuity_order(self) -> usize {
        match self {
            Self::Polynomial { degree } => degree.min(3) - 1,
        }
    }

    /// Evaluates the `order`-th derivative of every basis function at `u`.
    ///
    /// Entry `k` is `dᵒʳᵈᵉʳ/duᵒʳᵈᵉʳ uᵏ`.
    #[must_use]
    pub fn basis(self, order: usize, u: f64) -> Vec<f64> {
        (0..self.coefficient_count())
            .map(|k| power_derivative(k, order, u))
            .collect()
    }

    /// Evaluates one coordinate from its coefficients.
    #[must_use]
    pub fn evaluate(self, coefficients: &[f64], order: usize, u: f64) -> f64 {
        self.basis(order, u)
            .iter()
            .zip(coefficients)
            .map(|(b, c)| b * c)
            .sum()
    }

    /// Builds the symbolic `order`-th derivative of one coordinate at `u`.
    ///
    /// The result is linear in the coefficient terms.
    pub fn instantiate(
        self,
        graph: &mut TermGraph,
        coefficients: &[Term],
        order: usize,
        u: f64,
    ) -> Term {
        let summands: Vec<Term> = self
            .basis(order, u)
            .into_iter()
            .zip(coefficients)
            .map(|(weight, &coefficient)| {
                let weight = graph.constant(weight);
                graph.product([weight, coefficient])
            })
            .collect();
        graph.sum(summands)
    }
}

/// `dᵐ/duᵐ uᵏ = k!/(k−m)! · uᵏ⁻ᵐ`, zero when `m > k`.
fn power_derivative(k: usize, m: usize, u: f64) -> f64 {
    if m > k {
        return 0.0;
    }
    let falling: f64 = ((k - m + 1)..=k).map(|j| j as f64).product();
    falling * u.powi((k - m) as i32)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kurve_core::{Assignment, Variable};

    use super::*;

    #[test]
    fn degree_bounds() {
        assert!(SegmentTemplate::polynomial(1).is_ok());
        assert!(SegmentTemplate::polynomial(7).is_ok());
        assert_eq!(
            SegmentTemplate::polynomial(0),
            Err(SpecificationError::UnsupportedDegree(0))
        );
        assert_eq!(
            SegmentTemplate::polynomial(8),
            Err(SpecificationError::UnsupportedDegree(8))
        );
    }

    #[test]
    fn continuity_order_follows_degree() {
        let order = |d| SegmentTemplate::polynomial(d).unwrap().continuity_order();
        assert_eq!(order(1), 0);
        assert_eq!(order(2), 1);
        assert_eq!(order(3), 2);
        assert_eq!(order(6), 2);
    }

    #[test]
    fn basis_derivatives() {
        let cubic = SegmentTemplate::CUBIC;

        assert_eq!(cubic.basis(0, 2.0), [1.0, 2.0, 4.0, 8.0]);
        assert_eq!(cubic.basis(1, 2.0), [0.0, 1.0, 4.0, 12.0]);
        assert_eq!(cubic.basis(2, 2.0), [0.0, 0.0, 2.0, 12.0]);
        assert_eq!(cubic.basis(4, 2.0), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn symbolic_instantiation_matches_numeric() {
        let cubic = SegmentTemplate::CUBIC;
        let names = ["a0", "a1", "a2", "a3"];
        let values = [1.0, -2.0, 0.5, 3.0];

        let mut graph = TermGraph::new();
        let coefficients: Vec<Term> = names
            .iter()
            .map(|name| graph.variable(Variable::new(*name)))
            .collect();
        let assignment: Assignment = names
            .iter()
            .zip(values)
            .map(|(name, value)| (Variable::new(*name), value))
            .collect();

        for order in 0..3 {
            let term = cubic.instantiate(&mut graph, &coefficients, order, 0.75);
            assert_relative_eq!(
                graph.evaluate(term, &assignment).unwrap(),
                cubic.evaluate(&values, order, 0.75),
                epsilon = 1e-12
            );
        }
    }
}
