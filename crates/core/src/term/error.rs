use thiserror::Error;

use crate::Variable;

/// Errors that can occur when evaluating a term.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TermError {
    /// A variable reachable from the evaluated term has no value.
    #[error("unbound variable `{0}`")]
    UnboundVariable(Variable),
}
