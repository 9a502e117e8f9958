use thiserror::Error;

/// Errors raised when building or editing a specification.
///
/// These are reported synchronously, before any solve starts.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SpecificationError {
    #[error("curve length must be finite and positive, got {0}")]
    InvalidCurveLength(f64),

    #[error("segment count must be at least 1")]
    ZeroSegmentCount,

    #[error("position must lie in [0, 1], got {0}")]
    PositionOutOfRange(f64),

    #[error("polynomial degree must lie in 1..=7, got {0}")]
    UnsupportedDegree(usize),

    #[error("at least {minimum} samples are required, got {actual}")]
    TooFewSamples { minimum: usize, actual: usize },

    #[error("parameter vector has {actual} values, specification needs {expected}")]
    ParameterCount { expected: usize, actual: usize },
}
