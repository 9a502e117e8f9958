use crate::{CurveSpecification, SegmentTemplate, SpecificationError};

/// Shortest curve that length edits will produce.
const MIN_CURVE_LENGTH: f64 = 1.0;

/// The desired shape of a curve, independent of any solved parameters.
///
/// A `BasicSpecification` is an immutable value. Every editor returns a new
/// instance and validates it the same way the constructor does.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicSpecification {
    curve_length: f64,
    segment_count: usize,
    template: SegmentTemplate,
    curve_specifications: Vec<CurveSpecification>,
}

impl BasicSpecification {
    /// Creates a validated specification.
    ///
    /// Curve specifications validate their own positions on construction.
    ///
    /// # Errors
    ///
    /// Returns an error if `curve_length` is not finite and positive, if
    /// `segment_count` is zero, or if the template degree is unsupported.
    pub fn new(
        curve_length: f64,
        segment_count: usize,
        template: SegmentTemplate,
        curve_specifications: Vec<CurveSpecification>,
    ) -> Result<Self, SpecificationError> {
        if !curve_length.is_finite() || curve_length <= 0.0 {
            return Err(SpecificationError::InvalidCurveLength(curve_length));
        }
        if segment_count == 0 {
            return Err(SpecificationError::ZeroSegmentCount);
        }
        template.validate()?;

        Ok(Self {
            curve_length,
            segment_count,
            template,
            curve_specifications,
        })
    }

    #[must_use]
    pub fn curve_length(&self) -> f64 {
        self.curve_length
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[must_use]
    pub fn template(&self) -> SegmentTemplate {
        self.template
    }

    #[must_use]
    pub fn curve_specifications(&self) -> &[CurveSpecification] {
        &self.curve_specifications
    }

    /// Number of curve coefficients across all segments.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.segment_count * self.template.parameter_count()
    }

    /// # Errors
    ///
    /// Returns [`SpecificationError::InvalidCurveLength`] unless the length
    /// is finite and positive.
    pub fn with_curve_length(&self, curve_length: f64) -> Result<Self, SpecificationError> {
        Self::new(
            curve_length,
            self.segment_count,
            self.template,
            self.curve_specifications.clone(),
        )
    }

    /// # Errors
    ///
    /// Returns [`SpecificationError::ZeroSegmentCount`] for zero.
    pub fn with_segment_count(&self, segment_count: usize) -> Result<Self, SpecificationError> {
        Self::new(
            self.curve_length,
            segment_count,
            self.template,
            self.curve_specifications.clone(),
        )
    }

    /// # Errors
    ///
    /// Returns [`SpecificationError::UnsupportedDegree`] for an unsupported
    /// template.
    pub fn with_template(&self, template: SegmentTemplate) -> Result<Self, SpecificationError> {
        Self::new(
            self.curve_length,
            self.segment_count,
            template,
            self.curve_specifications.clone(),
        )
    }

    #[must_use]
    pub fn with_curve_specifications(&self, curve_specifications: Vec<CurveSpecification>) -> Self {
        Self {
            curve_specifications,
            ..self.clone()
        }
    }

    /// Grows (or for negative `delta`, shrinks) the curve length.
    ///
    /// The result is never shorter than one unit. Positions are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::InvalidCurveLength`] if the new length
    /// is not finite.
    pub fn insert_length(&self, delta: f64) -> Result<Self, SpecificationError> {
        self.with_curve_length(self.lengthened(delta))
    }

    /// Grows the curve length at `position`, keeping every specification at
    /// the same arc-length distance from its nearer curve end.
    ///
    /// With `r = old / new`, a specification at `p < position` moves to
    /// `p·r` and one at `p > position` moves to `1 − (1 − p)·r`. A
    /// specification exactly at `position` stays put. Shifted positions are
    /// clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is outside `[0, 1]` or the new length
    /// is not finite.
    pub fn insert_length_at(&self, position: f64, delta: f64) -> Result<Self, SpecificationError> {
        super::curve::validate_position(position)?;

        let length = self.lengthened(delta);
        let ratio = self.curve_length / length;
        let shifted = self
            .curve_specifications
            .iter()
            .map(|spec| {
                let p = spec.position();
                let moved = if p < position {
                    p * ratio
                } else if p > position {
                    1.0 - (1.0 - p) * ratio
                } else {
                    p
                };
                spec.with_position(moved.clamp(0.0, 1.0))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.with_curve_length(length)
            .map(|basic| basic.with_curve_specifications(shifted))
    }

    /// Groups the curve specifications by position, in ascending order.
    #[must_use]
    pub fn positions(&self) -> Vec<(f64, Vec<&CurveSpecification>)> {
        let mut sorted: Vec<&CurveSpecification> = self.curve_specifications.iter().collect();
        sorted.sort_by(|a, b| a.position().total_cmp(&b.position()));

        let mut groups: Vec<(f64, Vec<&CurveSpecification>)> = Vec::new();
        for spec in sorted {
            match groups.last_mut() {
                Some((position, group)) if *position == spec.position() => group.push(spec),
                _ => groups.push((spec.position(), vec![spec])),
            }
        }
        groups
    }

    fn lengthened(&self, delta: f64) -> f64 {
        let length = self.curve_length + delta;
        if length.is_nan() {
            length
        } else {
            length.max(MIN_CURVE_LENGTH)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{AttachmentCurveSpecification, PointCurveSpecification};

    use super::*;

    fn point(position: f64) -> CurveSpecification {
        PointCurveSpecification::new(position, (0.0, 0.0)).unwrap().into()
    }

    fn basic(specs: Vec<CurveSpecification>) -> BasicSpecification {
        BasicSpecification::new(100.0, 2, SegmentTemplate::CUBIC, specs).unwrap()
    }

    #[test]
    fn validates_on_construction() {
        let cubic = SegmentTemplate::CUBIC;

        assert_eq!(
            BasicSpecification::new(0.0, 1, cubic, Vec::new()),
            Err(SpecificationError::InvalidCurveLength(0.0))
        );
        assert_eq!(
            BasicSpecification::new(10.0, 0, cubic, Vec::new()),
            Err(SpecificationError::ZeroSegmentCount)
        );
        assert_eq!(
            BasicSpecification::new(10.0, 1, SegmentTemplate::Polynomial { degree: 9 }, Vec::new()),
            Err(SpecificationError::UnsupportedDegree(9))
        );
        assert!(BasicSpecification::new(f64::INFINITY, 1, cubic, Vec::new()).is_err());
    }

    #[test]
    fn editors_return_new_values() {
        let original = basic(vec![point(0.5)]);

        let longer = original.with_curve_length(250.0).unwrap();
        let finer = original.with_segment_count(5).unwrap();

        assert_eq!(original.curve_length(), 100.0);
        assert_eq!(longer.curve_length(), 250.0);
        assert_eq!(finer.segment_count(), 5);
        assert_eq!(finer.curve_specifications(), original.curve_specifications());
        assert_eq!(
            original.with_segment_count(0),
            Err(SpecificationError::ZeroSegmentCount)
        );
        assert_eq!(finer.parameter_count(), 40);
    }

    #[test]
    fn insert_length_clamps_to_one_unit() {
        let original = basic(Vec::new());

        assert_eq!(original.insert_length(50.0).unwrap().curve_length(), 150.0);
        assert_eq!(original.insert_length(-500.0).unwrap().curve_length(), 1.0);
        assert!(original.insert_length(f64::NAN).is_err());
    }

    #[test]
    fn insert_length_at_preserves_end_distances() {
        let original = basic(vec![point(0.2), point(0.5), point(0.9)]);

        let edited = original.insert_length_at(0.5, 100.0).unwrap();

        let positions: Vec<f64> = edited
            .curve_specifications()
            .iter()
            .map(CurveSpecification::position)
            .collect();
        assert_eq!(edited.curve_length(), 200.0);
        // Distance from the start: 0.2 · 100 = 0.1 · 200.
        assert_relative_eq!(positions[0], 0.1);
        assert_relative_eq!(positions[1], 0.5);
        // Distance from the end: 0.1 · 100 = 0.05 · 200.
        assert_relative_eq!(positions[2], 0.95);
    }

    #[test]
    fn positions_are_grouped_in_order() {
        let attachment = AttachmentCurveSpecification::new(0.3, 0).unwrap().into();
        let original = basic(vec![point(0.8), point(0.3), attachment]);

        let groups = original.positions();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 0.3);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, 0.8);
        assert_eq!(groups[1].1.len(), 1);
    }
}
