/// Errors that can occur during a Levenberg–Marquardt solve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("start vector has {actual} values, problem has {expected} variables")]
    InvalidStart { expected: usize, actual: usize },

    #[error("start vector or its objective is not finite")]
    NonFiniteStart,

    #[error("problem error: {0}")]
    Problem(Box<dyn std::error::Error + Send + Sync>),
}
