//! Curve specifications and their solved parameter vectors.
//!
//! A [`BasicSpecification`] describes the desired curve: its length, how many
//! segments it has, the template each segment follows, and the
//! [`CurveSpecification`]s it should satisfy. A [`Specification`] pairs it
//! with the parameter vector the optimizer works on.

mod basic;
mod curve;

pub use basic::BasicSpecification;
pub use curve::{AttachmentCurveSpecification, CurveSpecification, PointCurveSpecification};

use crate::{PolynomialCurve, SpecificationError};

/// A basic specification together with its curve coefficients.
///
/// The parameter vector is laid out segment-major; within a segment the x
/// coefficients come first, then the y coefficients, each in ascending power.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    basic: BasicSpecification,
    position: Vec<f64>,
}

impl Specification {
    /// Pairs `basic` with an explicit parameter vector.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::ParameterCount`] if the vector length
    /// does not match the segment count and template.
    pub fn new(basic: BasicSpecification, position: Vec<f64>) -> Result<Self, SpecificationError> {
        let expected = basic.parameter_count();
        if position.len() != expected {
            return Err(SpecificationError::ParameterCount {
                expected,
                actual: position.len(),
            });
        }
        Ok(Self { basic, position })
    }

    /// Starts `basic` from the straight line `x = L·t, y = 0`.
    #[must_use]
    pub fn initial(basic: BasicSpecification) -> Self {
        let segments = basic.segment_count();
        let width = basic.template().coefficient_count();
        let step = basic.curve_length() / segments as f64;

        let mut position = vec![0.0; basic.parameter_count()];
        for (segment, block) in position.chunks_exact_mut(2 * width).enumerate() {
            block[0] = step * segment as f64;
            block[1] = step;
        }
        Self { basic, position }
    }

    #[must_use]
    pub fn basic(&self) -> &BasicSpecification {
        &self.basic
    }

    #[must_use]
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Replaces the basic specification, keeping the parameter vector as a
    /// warm start when the segment count and template are unchanged.
    ///
    /// Otherwise the stale vector is discarded and the straight-line start is
    /// used.
    #[must_use]
    pub fn rebase(&self, basic: BasicSpecification) -> Self {
        if basic.segment_count() == self.basic.segment_count()
            && basic.template() == self.basic.template()
        {
            Self {
                basic,
                position: self.position.clone(),
            }
        } else {
            Self::initial(basic)
        }
    }

    /// Builds the curve described by the parameter vector.
    #[must_use]
    pub fn curve(&self) -> PolynomialCurve {
        PolynomialCurve::from_parts(
            self.basic.template(),
            self.basic.segment_count(),
            self.position.clone(),
        )
    }
}
