//! Immutable symbolic expressions stored in an interning arena.
//!
//! A [`TermGraph`] owns every node; a [`Term`] is a cheap copyable index into
//! it. Nodes are appended, never modified, so a `Term` stays valid and keeps
//! its meaning for the lifetime of its graph. Structurally equal nodes are
//! interned to a single index, which lets large objectives share their
//! repeated subexpressions.
//!
//! The smart constructors fold constants as they build:
//!
//! - `x + 0` and `x · 1` collapse to `x`
//! - `x · 0` collapses to `0`
//! - operators whose operands are all constants collapse to a constant
//!
//! Folding never changes the value a term evaluates to; it only keeps
//! derivative graphs small.

mod differentiate;
mod error;
mod evaluate;
mod function;

pub use error::TermError;
pub use function::Function;

use std::collections::{BTreeSet, HashMap};

use crate::Variable;

/// A handle to a node in a [`TermGraph`].
///
/// A `Term` is only meaningful together with the graph that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term(usize);

impl Term {
    /// Returns the arena index of this term.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A constant stored by bit pattern so that nodes can be hashed.
///
/// Negative zero is normalized to positive zero on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant(u64);

impl Constant {
    /// Creates a constant node payload.
    #[must_use]
    pub fn new(value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        Self(value.to_bits())
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// A node of the expression graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A numeric constant.
    Constant(Constant),

    /// A reference to a free variable.
    Variable(Variable),

    /// The sum of all children.
    Sum(Box<[Term]>),

    /// `lhs − rhs`.
    Difference(Term, Term),

    /// `−operand`.
    Negation(Term),

    /// The product of all children.
    Product(Box<[Term]>),

    /// The sum of the squares of all children, i.e. the squared Euclidean
    /// norm of the vector they form.
    NormSquared(Box<[Term]>),

    /// An elementary function applied to one argument.
    Apply(Function, Term),
}

/// An append-only arena of interned expression nodes.
#[derive(Debug, Clone, Default)]
pub struct TermGraph {
    nodes: Vec<Node>,
    interned: HashMap<Node, Term>,
}

impl TermGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind `term`.
    ///
    /// # Panics
    ///
    /// Panics if `term` was created by a different graph with more nodes.
    #[must_use]
    pub fn node(&self, term: Term) -> &Node {
        &self.nodes[term.0]
    }

    /// Returns the value of `term` if it is a constant node.
    #[must_use]
    pub fn constant_value(&self, term: Term) -> Option<f64> {
        match self.node(term) {
            Node::Constant(constant) => Some(constant.value()),
            _ => None,
        }
    }

    fn is_constant(&self, term: Term, value: f64) -> bool {
        self.constant_value(term) == Some(value)
    }

    fn intern(&mut self, node: Node) -> Term {
        if let Some(&term) = self.interned.get(&node) {
            return term;
        }
        let term = Term(self.nodes.len());
        self.nodes.push(node.clone());
        self.interned.insert(node, term);
        term
    }

    /// Creates a constant term.
    pub fn constant(&mut self, value: f64) -> Term {
        self.intern(Node::Constant(Constant::new(value)))
    }

    /// Creates the constant `0`.
    pub fn zero(&mut self) -> Term {
        self.constant(0.0)
    }

    /// Creates the constant `1`.
    pub fn one(&mut self) -> Term {
        self.constant(1.0)
    }

    /// Creates a reference to `variable`.
    pub fn variable(&mut self, variable: Variable) -> Term {
        self.intern(Node::Variable(variable))
    }

    /// Creates the sum of `terms`.
    ///
    /// Nested sums are flattened and constant summands are combined. An empty
    /// sum is `0`.
    pub fn sum(&mut self, terms: impl IntoIterator<Item = Term>) -> Term {
        let mut offset = 0.0;
        let mut summands = Vec::new();
        for term in terms {
            match self.node(term) {
                Node::Constant(constant) => offset += constant.value(),
                Node::Sum(children) => {
                    for &child in children.iter() {
                        match self.node(child) {
                            Node::Constant(constant) => offset += constant.value(),
                            _ => summands.push(child),
                        }
                    }
                }
                _ => summands.push(term),
            }
        }

        if offset != 0.0 || summands.is_empty() {
            let constant = self.constant(offset);
            if summands.is_empty() {
                return constant;
            }
            summands.push(constant);
        }
        if summands.len() == 1 {
            return summands[0];
        }
        self.intern(Node::Sum(summands.into_boxed_slice()))
    }

    /// Creates `lhs − rhs`.
    pub fn difference(&mut self, lhs: Term, rhs: Term) -> Term {
        if lhs == rhs {
            return self.zero();
        }
        match (self.constant_value(lhs), self.constant_value(rhs)) {
            (Some(a), Some(b)) => self.constant(a - b),
            (_, Some(b)) if b == 0.0 => lhs,
            (Some(a), _) if a == 0.0 => self.negation(rhs),
            _ => self.intern(Node::Difference(lhs, rhs)),
        }
    }

    /// Creates `−operand`.
    pub fn negation(&mut self, operand: Term) -> Term {
        match self.node(operand) {
            Node::Constant(constant) => {
                let value = constant.value();
                self.constant(-value)
            }
            Node::Negation(inner) => *inner,
            _ => self.intern(Node::Negation(operand)),
        }
    }

    /// Creates the product of `terms`.
    ///
    /// Nested products are flattened and constant factors are combined. A
    /// zero factor makes the whole product `0`; an empty product is `1`.
    pub fn product(&mut self, terms: impl IntoIterator<Item = Term>) -> Term {
        let mut scale = 1.0;
        let mut factors = Vec::new();
        for term in terms {
            match self.node(term) {
                Node::Constant(constant) => scale *= constant.value(),
                Node::Product(children) => {
                    for &child in children.iter() {
                        match self.node(child) {
                            Node::Constant(constant) => scale *= constant.value(),
                            _ => factors.push(child),
                        }
                    }
                }
                _ => factors.push(term),
            }
        }

        if scale == 0.0 || factors.is_empty() {
            return self.constant(scale);
        }
        if scale != 1.0 {
            let constant = self.constant(scale);
            factors.insert(0, constant);
        }
        if factors.len() == 1 {
            return factors[0];
        }
        self.intern(Node::Product(factors.into_boxed_slice()))
    }

    /// Creates `Σ cᵢ²` over `components`.
    ///
    /// Zero components are dropped; an all-constant vector collapses to its
    /// numeric squared norm.
    pub fn norm_squared(&mut self, components: impl IntoIterator<Item = Term>) -> Term {
        let components: Vec<Term> = components
            .into_iter()
            .filter(|&term| !self.is_constant(term, 0.0))
            .collect();

        let constants: Option<Vec<f64>> = components
            .iter()
            .map(|&term| self.constant_value(term))
            .collect();
        if let Some(values) = constants {
            return self.constant(values.iter().map(|v| v * v).sum());
        }
        self.intern(Node::NormSquared(components.into_boxed_slice()))
    }

    /// Creates `operand²`.
    pub fn square(&mut self, operand: Term) -> Term {
        self.norm_squared([operand])
    }

    /// Applies `function` to `argument`.
    pub fn apply(&mut self, function: Function, argument: Term) -> Term {
        match self.constant_value(argument) {
            Some(value) => self.constant(function.value(value)),
            None => self.intern(Node::Apply(function, argument)),
        }
    }

    /// Returns the free variables appearing in `term`.
    #[must_use]
    pub fn variables(&self, term: Term) -> BTreeSet<Variable> {
        let mut found = BTreeSet::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![term];
        while let Some(current) = stack.pop() {
            if std::mem::replace(&mut visited[current.0], true) {
                continue;
            }
            match self.node(current) {
                Node::Constant(_) => {}
                Node::Variable(variable) => {
                    found.insert(variable.clone());
                }
                Node::Sum(children) | Node::Product(children) | Node::NormSquared(children) => {
                    stack.extend(children.iter().copied());
                }
                Node::Difference(lhs, rhs) => stack.extend([*lhs, *rhs]),
                Node::Negation(operand) | Node::Apply(_, operand) => stack.push(*operand),
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_equal_nodes_are_interned() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let y = graph.variable(Variable::new("y"));

        let a = graph.product([x, y]);
        let b = graph.product([x, y]);
        let x_again = graph.variable(Variable::new("x"));

        assert_eq!(a, b);
        assert_eq!(x, x_again);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn negative_zero_is_the_same_constant_as_zero() {
        let mut graph = TermGraph::new();
        assert_eq!(graph.constant(-0.0), graph.constant(0.0));
    }

    #[test]
    fn sums_fold_constants_and_flatten() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let two = graph.constant(2.0);
        let three = graph.constant(3.0);
        let zero = graph.zero();

        assert_eq!(graph.sum([x, zero]), x);
        let five = graph.sum([two, three]);
        assert_eq!(graph.constant_value(five), Some(5.0));

        let inner = graph.sum([x, two]);
        let outer = graph.sum([inner, three]);
        match graph.node(outer) {
            Node::Sum(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(children[0], x);
                assert_eq!(graph.constant_value(children[1]), Some(5.0));
            }
            other => panic!("expected a flattened sum, got {other:?}"),
        }
    }

    #[test]
    fn products_fold_identity_and_zero() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let one = graph.one();
        let zero = graph.zero();

        assert_eq!(graph.product([x, one]), x);
        assert_eq!(graph.product([x, zero]), zero);
        assert_eq!(graph.product(std::iter::empty()), one);
    }

    #[test]
    fn difference_and_negation_simplify() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let zero = graph.zero();

        assert_eq!(graph.difference(x, x), zero);
        assert_eq!(graph.difference(x, zero), x);

        let negated = graph.negation(x);
        assert_eq!(graph.difference(zero, x), negated);
        assert_eq!(graph.negation(negated), x);
    }

    #[test]
    fn collects_free_variables() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let y = graph.variable(Variable::new("y"));
        let sqrt = graph.apply(Function::Sqrt, y);
        let term = graph.norm_squared([x, sqrt]);

        let names: Vec<String> = graph
            .variables(term)
            .into_iter()
            .map(|v| v.name().to_owned())
            .collect();
        assert_eq!(names, ["x", "y"]);
    }
}
