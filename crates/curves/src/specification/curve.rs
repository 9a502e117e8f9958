use kurve_core::{Term, TermGraph};

use crate::{CurvePoint, Point, SpecificationError};

/// A constraint on the curve at a fixed position in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSpecification {
    /// The curve should pass through a target point.
    Point(PointCurveSpecification),

    /// The curve should meet a shared logical point.
    Attachment(AttachmentCurveSpecification),
}

impl CurveSpecification {
    /// Returns the position the specification applies to.
    #[must_use]
    pub fn position(&self) -> f64 {
        match self {
            Self::Point(point) => point.position,
            Self::Attachment(attachment) => attachment.position,
        }
    }

    /// Returns a copy moved to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::PositionOutOfRange`] unless
    /// `0 <= position <= 1`.
    pub fn with_position(&self, position: f64) -> Result<Self, SpecificationError> {
        validate_position(position)?;
        Ok(match *self {
            Self::Point(point) => Self::Point(PointCurveSpecification { position, ..point }),
            Self::Attachment(attachment) => {
                Self::Attachment(AttachmentCurveSpecification {
                    position,
                    ..attachment
                })
            }
        })
    }
}

impl From<PointCurveSpecification> for CurveSpecification {
    fn from(point: PointCurveSpecification) -> Self {
        Self::Point(point)
    }
}

impl From<AttachmentCurveSpecification> for CurveSpecification {
    fn from(attachment: AttachmentCurveSpecification) -> Self {
        Self::Attachment(attachment)
    }
}

/// Penalizes the squared distance between the curve and `point` at
/// `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCurveSpecification {
    position: f64,
    point: Point,
}

impl PointCurveSpecification {
    /// # Errors
    ///
    /// Returns [`SpecificationError::PositionOutOfRange`] unless
    /// `0 <= position <= 1`.
    pub fn new(position: f64, point: impl Into<Point>) -> Result<Self, SpecificationError> {
        validate_position(position)?;
        Ok(Self {
            position,
            point: point.into(),
        })
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    /// Builds the residuals `curve − target` for both coordinates.
    pub fn residuals(&self, graph: &mut TermGraph, curve_point: &CurvePoint) -> [Term; 2] {
        let x = graph.constant(self.point.x);
        let y = graph.constant(self.point.y);
        [
            graph.difference(curve_point.x(), x),
            graph.difference(curve_point.y(), y),
        ]
    }

    /// Builds the squared distance between the curve and the target.
    pub fn error_term(&self, graph: &mut TermGraph, curve_point: &CurvePoint) -> Term {
        let residuals = self.residuals(graph, curve_point);
        graph.norm_squared(residuals)
    }
}

/// Ties the curve at `position` to the shared logical point `index`.
///
/// Every attachment with the same index meets the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentCurveSpecification {
    position: f64,
    index: usize,
}

impl AttachmentCurveSpecification {
    /// # Errors
    ///
    /// Returns [`SpecificationError::PositionOutOfRange`] unless
    /// `0 <= position <= 1`.
    pub fn new(position: f64, index: usize) -> Result<Self, SpecificationError> {
        validate_position(position)?;
        Ok(Self { position, index })
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

pub(crate) fn validate_position(position: f64) -> Result<(), SpecificationError> {
    if (0.0..=1.0).contains(&position) {
        Ok(())
    } else {
        Err(SpecificationError::PositionOutOfRange(position))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kurve_core::{Assignment, Variable};

    use super::*;

    #[test]
    fn rejects_positions_outside_unit_interval() {
        assert_eq!(
            PointCurveSpecification::new(1.5, (0.0, 0.0)),
            Err(SpecificationError::PositionOutOfRange(1.5))
        );
        assert!(AttachmentCurveSpecification::new(-0.1, 0).is_err());
        assert!(AttachmentCurveSpecification::new(f64::NAN, 0).is_err());
        assert!(PointCurveSpecification::new(0.0, (0.0, 0.0)).is_ok());
        assert!(PointCurveSpecification::new(1.0, (0.0, 0.0)).is_ok());
    }

    #[test]
    fn error_term_vanishes_on_the_target() {
        let mut graph = TermGraph::new();
        let x = graph.variable(Variable::new("x"));
        let y = graph.variable(Variable::new("y"));
        let curve_point = CurvePoint::new(0.3, x, y);
        let spec = PointCurveSpecification::new(0.3, (2.0, -1.0)).unwrap();

        let error = spec.error_term(&mut graph, &curve_point);

        let on_target = Assignment::new()
            .with(Variable::new("x"), 2.0)
            .with(Variable::new("y"), -1.0);
        let off_target = Assignment::new()
            .with(Variable::new("x"), 5.0)
            .with(Variable::new("y"), 3.0);
        assert_relative_eq!(graph.evaluate(error, &on_target).unwrap(), 0.0);
        assert_relative_eq!(graph.evaluate(error, &off_target).unwrap(), 25.0);
    }

    #[test]
    fn with_position_keeps_the_payload() {
        let spec = CurveSpecification::from(AttachmentCurveSpecification::new(0.2, 4).unwrap());

        let moved = spec.with_position(0.7).unwrap();

        assert_eq!(moved.position(), 0.7);
        match moved {
            CurveSpecification::Attachment(attachment) => assert_eq!(attachment.index(), 4),
            CurveSpecification::Point(_) => panic!("variant changed"),
        }
        assert!(spec.with_position(2.0).is_err());
    }
}
