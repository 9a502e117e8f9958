use crate::{Assignment, Variable};

use super::{Node, Term, TermError, TermGraph};

impl TermGraph {
    /// Evaluates `term` under `assignment`.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::UnboundVariable`] if a reachable variable has no
    /// binding.
    pub fn evaluate(&self, term: Term, assignment: &Assignment) -> Result<f64, TermError> {
        self.evaluate_with(term, |variable| assignment.get(variable))
    }

    /// Evaluates `term`, looking variable values up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::UnboundVariable`] if `lookup` returns `None` for a
    /// reachable variable.
    pub fn evaluate_with<F>(&self, term: Term, lookup: F) -> Result<f64, TermError>
    where
        F: Fn(&Variable) -> Option<f64>,
    {
        Evaluator::new(self, lookup).eval(term)
    }

    /// Evaluates several terms, sharing the work on common subterms.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::UnboundVariable`] if `lookup` returns `None` for a
    /// variable reachable from any of `terms`.
    pub fn evaluate_many<F>(&self, terms: &[Term], lookup: F) -> Result<Vec<f64>, TermError>
    where
        F: Fn(&Variable) -> Option<f64>,
    {
        let mut evaluator = Evaluator::new(self, lookup);
        terms.iter().map(|&term| evaluator.eval(term)).collect()
    }
}

/// Memoized recursive fold over the graph.
struct Evaluator<'g, F> {
    graph: &'g TermGraph,
    lookup: F,
    memo: Vec<Option<f64>>,
}

impl<'g, F> Evaluator<'g, F>
where
    F: Fn(&Variable) -> Option<f64>,
{
    fn new(graph: &'g TermGraph, lookup: F) -> Self {
        Self {
            graph,
            lookup,
            memo: vec![None; graph.len()],
        }
    }

    fn eval(&mut self, term: Term) -> Result<f64, TermError> {
        if let Some(value) = self.memo[term.index()] {
            return Ok(value);
        }

        let graph = self.graph;
        let value = match graph.node(term) {
            Node::Constant(constant) => constant.value(),
            Node::Variable(variable) => (self.lookup)(variable)
                .ok_or_else(|| TermError::UnboundVariable(variable.clone()))?,
            Node::Sum(children) => {
                let mut total = 0.0;
                for &child in children.iter() {
                    total += self.eval(child)?;
                }
                total
            }
            Node::Difference(lhs, rhs) => self.eval(*lhs)? - self.eval(*rhs)?,
            Node::Negation(operand) => -self.eval(*operand)?,
            Node::Product(factors) => {
                let mut total = 1.0;
                for &factor in factors.iter() {
                    total *= self.eval(factor)?;
                }
                total
            }
            Node::NormSquared(components) => {
                let mut total = 0.0;
                for &component in components.iter() {
                    let value = self.eval(component)?;
                    total += value * value;
                }
                total
            }
            Node::Apply(function, argument) => function.value(self.eval(*argument)?),
        };

        self.memo[term.index()] = Some(value);
        Ok(value)
    }
}
