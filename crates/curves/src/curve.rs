use crate::quadrature;
use crate::{Point, SegmentTemplate, SpecificationError};

/// Positions this close to a knot are treated as lying on it.
const KNOT_SNAP: f64 = 1e-9;

/// A planar curve parameterized over `[0, 1]`.
pub trait Curve {
    /// Returns the point at `position`.
    fn point(&self, position: f64) -> Point;

    /// Returns the first derivative with respect to `position`.
    fn velocity(&self, position: f64) -> Point;

    /// Returns the second derivative with respect to `position`.
    fn acceleration(&self, position: f64) -> Point;

    /// Returns the parametric speed `|C'(t)|`.
    fn speed(&self, position: f64) -> f64 {
        self.velocity(position).hypot()
    }

    /// Returns the heading angle of the tangent in radians.
    fn direction(&self, position: f64) -> f64 {
        let velocity = self.velocity(position);
        velocity.y.atan2(velocity.x)
    }

    /// Returns the signed curvature, positive when turning counterclockwise.
    ///
    /// Returns `0` where the speed vanishes.
    fn curvature(&self, position: f64) -> f64 {
        let velocity = self.velocity(position);
        let speed = velocity.hypot();
        if speed == 0.0 {
            return 0.0;
        }
        velocity.cross(self.acceleration(position)) / speed.powi(3)
    }
}

/// Maps a global `position` to `(segment, local u)`.
///
/// Segments are left-closed: a position exactly on an internal knot belongs
/// to the segment that starts there. Position `1` belongs to the last
/// segment. Positions outside `[0, 1]` are clamped.
#[must_use]
pub fn locate(position: f64, segment_count: usize) -> (usize, f64) {
    let count = segment_count.max(1);
    let scaled = position.clamp(0.0, 1.0) * count as f64;
    let nearest = scaled.round();
    let scaled = if (scaled - nearest).abs() <= KNOT_SNAP {
        nearest
    } else {
        scaled
    };

    let segment = (scaled.floor() as usize).min(count - 1);
    (segment, scaled - segment as f64)
}

/// A solved piecewise-polynomial curve.
///
/// Coefficients are laid out segment-major; within a segment the x
/// coefficients come first, then the y coefficients, each in ascending
/// power of the local parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCurve {
    template: SegmentTemplate,
    segment_count: usize,
    coefficients: Vec<f64>,
}

impl PolynomialCurve {
    /// Creates a curve from its coefficient vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unsupported, `segment_count` is
    /// zero, or the vector length does not match.
    pub fn new(
        template: SegmentTemplate,
        segment_count: usize,
        coefficients: Vec<f64>,
    ) -> Result<Self, SpecificationError> {
        template.validate()?;
        if segment_count == 0 {
            return Err(SpecificationError::ZeroSegmentCount);
        }
        let expected = segment_count * template.parameter_count();
        if coefficients.len() != expected {
            return Err(SpecificationError::ParameterCount {
                expected,
                actual: coefficients.len(),
            });
        }

        Ok(Self {
            template,
            segment_count,
            coefficients,
        })
    }

    /// Assembles a curve from parts already validated by a specification.
    pub(crate) fn from_parts(
        template: SegmentTemplate,
        segment_count: usize,
        coefficients: Vec<f64>,
    ) -> Self {
        Self {
            template,
            segment_count,
            coefficients,
        }
    }

    #[must_use]
    pub fn template(&self) -> SegmentTemplate {
        self.template
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns the x and y coefficients of `segment`.
    fn segment(&self, segment: usize) -> (&[f64], &[f64]) {
        let width = self.template.coefficient_count();
        let start = segment * 2 * width;
        let block = &self.coefficients[start..start + 2 * width];
        block.split_at(width)
    }

    /// Returns the `order`-th derivative of `segment` with respect to its
    /// local parameter `u ∈ [0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `segment >= segment_count`.
    #[must_use]
    pub fn segment_derivative(&self, segment: usize, order: usize, u: f64) -> Point {
        let (xs, ys) = self.segment(segment);
        Point::new(
            self.template.evaluate(xs, order, u),
            self.template.evaluate(ys, order, u),
        )
    }

    /// Derivative with respect to the global position.
    fn derivative(&self, order: usize, position: f64) -> Point {
        let (segment, u) = locate(position, self.segment_count);
        let scale = (self.segment_count as f64).powi(order as i32);
        self.segment_derivative(segment, order, u) * scale
    }

    /// Arc length of one segment.
    #[must_use]
    pub fn segment_length(&self, segment: usize) -> f64 {
        quadrature::integrate(0.0, 1.0, |u| {
            self.segment_derivative(segment, 1, u).hypot()
        })
    }

    /// Arc length of the whole curve.
    #[must_use]
    pub fn length(&self) -> f64 {
        (0..self.segment_count)
            .map(|segment| self.segment_length(segment))
            .sum()
    }
}

impl Curve for PolynomialCurve {
    fn point(&self, position: f64) -> Point {
        self.derivative(0, position)
    }

    fn velocity(&self, position: f64) -> Point {
        self.derivative(1, position)
    }

    fn acceleration(&self, position: f64) -> Point {
        self.derivative(2, position)
    }
}
