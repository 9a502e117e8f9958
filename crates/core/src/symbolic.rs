use std::collections::HashMap;

use crate::{LeastSquaresProblem, Term, TermError, TermGraph, Variable};

/// A least-squares problem whose residuals, objective, gradient, and Jacobian
/// are all symbolic terms of one graph.
///
/// Construction differentiates the objective with respect to every variable
/// and each residual with respect to the variables it mentions. Afterwards the
/// graph is never modified, so evaluation only borrows it.
#[derive(Debug, Clone)]
pub struct SymbolicProblem {
    graph: TermGraph,
    variables: Vec<Variable>,
    positions: HashMap<Variable, usize>,
    objective: Term,
    residuals: Vec<Term>,
    gradient: Vec<Term>,
    jacobian: Vec<JacobianEntry>,
}

/// A structurally nonzero Jacobian entry.
#[derive(Debug, Clone, Copy)]
struct JacobianEntry {
    row: usize,
    column: usize,
    term: Term,
}

impl SymbolicProblem {
    /// Builds the problem and its derivatives.
    ///
    /// `variables` fixes the order of the solver vector `x`.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::UnboundVariable`] if the objective or a residual
    /// mentions a variable missing from `variables`.
    pub fn new(
        mut graph: TermGraph,
        objective: Term,
        residuals: Vec<Term>,
        variables: Vec<Variable>,
    ) -> Result<Self, TermError> {
        let positions: HashMap<Variable, usize> = variables
            .iter()
            .enumerate()
            .map(|(i, variable)| (variable.clone(), i))
            .collect();

        for &root in residuals.iter().chain([&objective]) {
            if let Some(unbound) = graph
                .variables(root)
                .into_iter()
                .find(|variable| !positions.contains_key(variable))
            {
                return Err(TermError::UnboundVariable(unbound));
            }
        }

        let gradient = variables
            .iter()
            .map(|variable| graph.differentiate(objective, variable))
            .collect();

        let mut jacobian = Vec::new();
        for (row, &residual) in residuals.iter().enumerate() {
            for variable in graph.variables(residual) {
                let term = graph.differentiate(residual, &variable);
                if graph.constant_value(term) != Some(0.0) {
                    jacobian.push(JacobianEntry {
                        row,
                        column: positions[&variable],
                        term,
                    });
                }
            }
        }

        Ok(Self {
            graph,
            variables,
            positions,
            objective,
            residuals,
            gradient,
            jacobian,
        })
    }

    /// Returns the graph holding every term of the problem.
    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        &self.graph
    }

    /// Returns the variables in solver-vector order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the position of `variable` in the solver vector.
    #[must_use]
    pub fn position_of(&self, variable: &Variable) -> Option<usize> {
        self.positions.get(variable).copied()
    }

    /// Returns the scalar objective term.
    #[must_use]
    pub fn objective_term(&self) -> Term {
        self.objective
    }

    /// Returns the residual terms.
    #[must_use]
    pub fn residual_terms(&self) -> &[Term] {
        &self.residuals
    }

    /// Returns the gradient terms, one per variable.
    #[must_use]
    pub fn gradient_terms(&self) -> &[Term] {
        &self.gradient
    }

    fn eval(&self, terms: &[Term], x: &[f64]) -> Result<Vec<f64>, TermError> {
        self.graph.evaluate_many(terms, |variable| {
            self.positions.get(variable).and_then(|&i| x.get(i).copied())
        })
    }
}

impl LeastSquaresProblem for SymbolicProblem {
    type Error = TermError;

    fn variable_count(&self) -> usize {
        self.variables.len()
    }

    fn residual_count(&self) -> usize {
        self.residuals.len()
    }

    fn residuals(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
        self.eval(&self.residuals, x)
    }

    fn jacobian(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
        let terms: Vec<Term> = self.jacobian.iter().map(|entry| entry.term).collect();
        let values = self.eval(&terms, x)?;

        let columns = self.variables.len();
        let mut dense = vec![0.0; self.residuals.len() * columns];
        for (entry, value) in self.jacobian.iter().zip(values) {
            dense[entry.row * columns + entry.column] = value;
        }
        Ok(dense)
    }

    fn objective(&self, x: &[f64]) -> Result<f64, Self::Error> {
        Ok(self.eval(&[self.objective], x)?[0])
    }

    fn gradient(&self, x: &[f64]) -> Result<Vec<f64>, Self::Error> {
        self.eval(&self.gradient, x)
    }
}
