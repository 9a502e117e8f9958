use crate::{Curve, Point, SpecificationError};

/// A finite, ordered set of `(position, point)` samples of a curve.
///
/// Samples are taken once at construction; iterating is cheap and can be
/// repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteCurve {
    samples: Vec<(f64, Point)>,
}

impl DiscreteCurve {
    /// Samples `curve` at `count` evenly spaced positions, both ends included.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::TooFewSamples`] if `count < 2`.
    pub fn sample(curve: &impl Curve, count: usize) -> Result<Self, SpecificationError> {
        if count < 2 {
            return Err(SpecificationError::TooFewSamples {
                minimum: 2,
                actual: count,
            });
        }

        let last = (count - 1) as f64;
        let samples = (0..count)
            .map(|i| {
                let position = i as f64 / last;
                (position, curve.point(position))
            })
            .collect();
        Ok(Self { samples })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over the samples in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, (f64, Point)> {
        self.samples.iter()
    }

    /// Iterates over the sampled points only.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.samples.iter().map(|&(_, point)| point)
    }

    /// Length of the polyline through the samples.
    #[must_use]
    pub fn polyline_length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|pair| pair[0].1.distance(pair[1].1))
            .sum()
    }
}

impl<'a> IntoIterator for &'a DiscreteCurve {
    type Item = &'a (f64, Point);
    type IntoIter = std::slice::Iter<'a, (f64, Point)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{BasicSpecification, SegmentTemplate, Specification};

    use super::*;

    fn line() -> impl Curve {
        let basic = BasicSpecification::new(40.0, 2, SegmentTemplate::CUBIC, Vec::new()).unwrap();
        Specification::initial(basic).curve()
    }

    #[test]
    fn samples_evenly_including_both_ends() {
        let discrete = DiscreteCurve::sample(&line(), 5).unwrap();

        let positions: Vec<f64> = discrete.iter().map(|&(t, _)| t).collect();
        assert_eq!(positions, [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(discrete.points().last(), Some(Point::new(40.0, 0.0)));
        assert_relative_eq!(discrete.polyline_length(), 40.0);
    }

    #[test]
    fn iteration_restarts() {
        let discrete = DiscreteCurve::sample(&line(), 3).unwrap();

        assert_eq!((&discrete).into_iter().count(), 3);
        assert_eq!(discrete.iter().count(), 3);
    }

    #[test]
    fn needs_two_samples() {
        assert_eq!(
            DiscreteCurve::sample(&line(), 1),
            Err(SpecificationError::TooFewSamples {
                minimum: 2,
                actual: 1
            })
        );
    }
}
