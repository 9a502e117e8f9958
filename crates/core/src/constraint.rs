use crate::{Term, TermGraph, Variable};

/// A soft equality between two terms.
///
/// A constraint is never solved exactly. Its residual `lhs − rhs` is folded
/// into a least-squares objective and driven toward zero with everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    lhs: Term,
    rhs: Term,
}

impl Constraint {
    /// Creates the constraint `lhs = rhs`.
    #[must_use]
    pub fn equality(lhs: Term, rhs: Term) -> Self {
        Self { lhs, rhs }
    }

    /// Returns the left-hand side.
    #[must_use]
    pub fn lhs(&self) -> Term {
        self.lhs
    }

    /// Returns the right-hand side.
    #[must_use]
    pub fn rhs(&self) -> Term {
        self.rhs
    }

    /// Builds the residual `lhs − rhs`.
    pub fn residual(&self, graph: &mut TermGraph) -> Term {
        graph.difference(self.lhs, self.rhs)
    }

    /// Builds the squared error `(lhs − rhs)²`.
    pub fn error_term(&self, graph: &mut TermGraph) -> Term {
        let residual = self.residual(graph);
        graph.square(residual)
    }
}

/// An entity that contributes unknowns and constraints to a problem without
/// being part of the curve itself, such as a point shared by several curve
/// positions.
pub trait VirtualObject {
    /// The unknowns this object introduces.
    fn variables(&self) -> &[Variable];

    /// The constraints tying the object to the rest of the problem.
    fn constraints(&self) -> &[Constraint];
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::Assignment;

    use super::*;

    #[test]
    fn residual_and_error_term() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let five = graph.constant(5.0);
        let constraint = Constraint::equality(x, five);

        let residual = constraint.residual(&mut graph);
        let error = constraint.error_term(&mut graph);
        let at = Assignment::new().with(Variable::new("x"), 2.0);

        assert_relative_eq!(graph.evaluate(residual, &at).unwrap(), -3.0);
        assert_relative_eq!(graph.evaluate(error, &at).unwrap(), 9.0);
    }

    #[test]
    fn satisfied_constraint_has_zero_error() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let constraint = Constraint::equality(x, x);

        let error = constraint.error_term(&mut graph);

        assert_eq!(graph.constant_value(error), Some(0.0));
    }
}
