use std::collections::HashMap;

use crate::Variable;

use super::{Node, Term, TermGraph};

impl TermGraph {
    /// Returns the partial derivative of `term` with respect to `variable`.
    ///
    /// The derivative is built from the same smart constructors as any other
    /// term, so it is constant-folded and shares nodes with `term` where the
    /// rules allow (e.g. the chain rule reuses `f(a)` for `exp` and `sqrt`).
    ///
    /// | Node | Rule |
    /// |---|---|
    /// | constant | `0` |
    /// | variable | `1` for `variable`, else `0` |
    /// | `Σ cᵢ`, `a − b`, `−a` | linear |
    /// | `Π cᵢ` | `Σᵢ cᵢ' Πⱼ≠ᵢ cⱼ` |
    /// | `Σ cᵢ²` | `Σ 2 cᵢ cᵢ'` |
    /// | `f(a)` | `f'(a) a'` |
    pub fn differentiate(&mut self, term: Term, variable: &Variable) -> Term {
        let mut memo = HashMap::new();
        self.derive(term, variable, &mut memo)
    }

    fn derive(&mut self, term: Term, variable: &Variable, memo: &mut HashMap<Term, Term>) -> Term {
        if let Some(&derivative) = memo.get(&term) {
            return derivative;
        }

        let derivative = match self.node(term).clone() {
            Node::Constant(_) => self.zero(),
            Node::Variable(v) => {
                if &v == variable {
                    self.one()
                } else {
                    self.zero()
                }
            }
            Node::Sum(children) => {
                let derivatives: Vec<Term> = children
                    .iter()
                    .map(|&child| self.derive(child, variable, memo))
                    .collect();
                self.sum(derivatives)
            }
            Node::Difference(lhs, rhs) => {
                let lhs = self.derive(lhs, variable, memo);
                let rhs = self.derive(rhs, variable, memo);
                self.difference(lhs, rhs)
            }
            Node::Negation(operand) => {
                let operand = self.derive(operand, variable, memo);
                self.negation(operand)
            }
            Node::Product(factors) => {
                let mut summands = Vec::with_capacity(factors.len());
                for (i, &factor) in factors.iter().enumerate() {
                    let derivative = self.derive(factor, variable, memo);
                    if self.is_constant(derivative, 0.0) {
                        continue;
                    }
                    let others = factors
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, &other)| other);
                    let summand = self.product(others.chain([derivative]).collect::<Vec<_>>());
                    summands.push(summand);
                }
                self.sum(summands)
            }
            Node::NormSquared(components) => {
                let two = self.constant(2.0);
                let mut summands = Vec::with_capacity(components.len());
                for &component in components.iter() {
                    let derivative = self.derive(component, variable, memo);
                    if self.is_constant(derivative, 0.0) {
                        continue;
                    }
                    summands.push(self.product([two, component, derivative]));
                }
                self.sum(summands)
            }
            Node::Apply(function, argument) => {
                let inner = self.derive(argument, variable, memo);
                if self.is_constant(inner, 0.0) {
                    self.zero()
                } else {
                    let outer = function.derivative(self, argument, term);
                    self.product([outer, inner])
                }
            }
        };

        memo.insert(term, derivative);
        derivative
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{Assignment, Function, Variable};

    use super::*;

    fn assignment(values: &[(&str, f64)]) -> Assignment {
        values
            .iter()
            .map(|&(name, value)| (Variable::new(name), value))
            .collect()
    }

    #[test]
    fn constants_and_variables() {
        let mut graph = TermGraph::new();
        let x = Variable::new("x");
        let c = graph.constant(4.0);
        let x_term = graph.variable(x.clone());
        let y_term = graph.variable(Variable::new("y"));

        let dc = graph.differentiate(c, &x);
        let dx = graph.differentiate(x_term, &x);
        let dy = graph.differentiate(y_term, &x);

        assert_eq!(graph.constant_value(dc), Some(0.0));
        assert_eq!(graph.constant_value(dx), Some(1.0));
        assert_eq!(graph.constant_value(dy), Some(0.0));
    }

    #[test]
    fn product_rule() {
        // d/dx (3 · x · y · x) = 6 x y
        let mut graph = TermGraph::new();
        let x = Variable::new("x");
        let x_term = graph.variable(x.clone());
        let y_term = graph.variable(Variable::new("y"));
        let three = graph.constant(3.0);
        let term = graph.product([three, x_term, y_term, x_term]);

        let derivative = graph.differentiate(term, &x);
        let value = graph
            .evaluate(derivative, &assignment(&[("x", 2.0), ("y", 5.0)]))
            .unwrap();

        assert_relative_eq!(value, 60.0);
    }

    #[test]
    fn norm_squared_of_a_difference() {
        // d/dx ((x − 1)² + (y − 2)²) = 2 (x − 1)
        let mut graph = TermGraph::new();
        let x = Variable::new("x");
        let x_term = graph.variable(x.clone());
        let y_term = graph.variable(Variable::new("y"));
        let one = graph.constant(1.0);
        let two = graph.constant(2.0);
        let dx = graph.difference(x_term, one);
        let dy = graph.difference(y_term, two);
        let term = graph.norm_squared([dx, dy]);

        let derivative = graph.differentiate(term, &x);
        let value = graph
            .evaluate(derivative, &assignment(&[("x", 4.0), ("y", -3.0)]))
            .unwrap();

        assert_relative_eq!(value, 6.0);
        assert!(!graph.variables(derivative).contains(&Variable::new("y")));
    }

    #[test]
    fn chain_rule_for_functions() {
        let x = Variable::new("x");
        let at = assignment(&[("x", 0.7)]);

        let cases: [(Function, fn(f64) -> f64); 6] = [
            (Function::Sqrt, |v| 0.5 / v.sqrt()),
            (Function::Exp, f64::exp),
            (Function::Ln, |v| 1.0 / v),
            (Function::Sin, f64::cos),
            (Function::Cos, |v| -v.sin()),
            (Function::Reciprocal, |v| -1.0 / (v * v)),
        ];

        for (function, expected) in cases {
            let mut graph = TermGraph::new();
            let x_term = graph.variable(x.clone());
            let term = graph.apply(function, x_term);
            let derivative = graph.differentiate(term, &x);
            let value = graph.evaluate(derivative, &at).unwrap();

            assert_relative_eq!(value, expected(0.7), epsilon = 1e-12);
        }
    }

    #[test]
    fn chain_rule_composes_with_inner_derivative() {
        // d/dx sqrt(x² + 9) = x / sqrt(x² + 9)
        let mut graph = TermGraph::new();
        let x = Variable::new("x");
        let x_term = graph.variable(x.clone());
        let nine = graph.constant(9.0);
        let squared = graph.square(x_term);
        let inner = graph.sum([squared, nine]);
        let term = graph.apply(Function::Sqrt, inner);

        let derivative = graph.differentiate(term, &x);
        let value = graph
            .evaluate(derivative, &assignment(&[("x", 4.0)]))
            .unwrap();

        assert_relative_eq!(value, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn derivative_of_unrelated_term_folds_to_zero() {
        let mut graph = TermGraph::new();
        let y_term = graph.variable(Variable::new("y"));
        let sin = graph.apply(Function::Sin, y_term);
        let term = graph.norm_squared([sin, y_term]);

        let derivative = graph.differentiate(term, &Variable::new("x"));

        assert_eq!(graph.constant_value(derivative), Some(0.0));
    }
}
