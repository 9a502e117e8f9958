use super::{Term, TermGraph};

/// Elementary functions that can be applied to a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// `√x`.
    Sqrt,

    /// `eˣ`.
    Exp,

    /// Natural logarithm.
    Ln,

    /// `sin x`.
    Sin,

    /// `cos x`.
    Cos,

    /// `1 / x`.
    Reciprocal,
}

impl Function {
    /// Evaluates the function at `x`.
    #[must_use]
    pub fn value(self, x: f64) -> f64 {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Exp => x.exp(),
            Self::Ln => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Reciprocal => x.recip(),
        }
    }

    /// Builds `f'(argument)`, where `application` is the existing term for
    /// `f(argument)`.
    pub(super) fn derivative(self, graph: &mut TermGraph, argument: Term, application: Term) -> Term {
        match self {
            Self::Sqrt => {
                let reciprocal = graph.apply(Self::Reciprocal, application);
                let half = graph.constant(0.5);
                graph.product([half, reciprocal])
            }
            Self::Exp => application,
            Self::Ln => graph.apply(Self::Reciprocal, argument),
            Self::Sin => graph.apply(Self::Cos, argument),
            Self::Cos => {
                let sin = graph.apply(Self::Sin, argument);
                graph.negation(sin)
            }
            Self::Reciprocal => {
                let squared = graph.product([application, application]);
                graph.negation(squared)
            }
        }
    }
}
