//! Piecewise-polynomial planar curves fit to sparse specifications.
//!
//! A [`BasicSpecification`] describes the curve to build: its length, its
//! number of equal segments, the [`SegmentTemplate`] every segment follows,
//! and the [`CurveSpecification`]s it should satisfy. The [`assembly`]
//! module turns it into a symbolic least-squares problem, and the
//! [`optimizer`] solves that problem and normalizes the result toward
//! constant speed.
//!
//! Solved curves implement [`Curve`] and can be sampled into a
//! [`DiscreteCurve`].
//!
//! ```
//! use kurve_curves::{
//!     BasicSpecification, Curve, PointCurveSpecification, SegmentTemplate, Specification,
//!     optimizer,
//! };
//!
//! let specs = vec![
//!     PointCurveSpecification::new(0.0, (0.0, 0.0))?.into(),
//!     PointCurveSpecification::new(1.0, (100.0, 100.0))?.into(),
//! ];
//! let basic = BasicSpecification::new(200.0, 1, SegmentTemplate::CUBIC, specs)?;
//!
//! let solution = optimizer::solve_unobserved(
//!     &Specification::initial(basic),
//!     &optimizer::Config::default(),
//! )?;
//! let end = solution.curve.point(1.0);
//! assert!((end.x - 100.0).abs() < 1e-4 && (end.y - 100.0).abs() < 1e-4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembly;
mod curve;
mod curve_point;
mod discrete;
mod error;
pub mod optimizer;
mod point;
mod quadrature;
mod specification;
mod template;
mod virtual_point;

pub use curve::{Curve, PolynomialCurve, locate};
pub use curve_point::CurvePoint;
pub use discrete::DiscreteCurve;
pub use error::SpecificationError;
pub use point::Point;
pub use specification::{
    AttachmentCurveSpecification, BasicSpecification, CurveSpecification,
    PointCurveSpecification, Specification,
};
pub use template::{MAX_DEGREE, SegmentTemplate};
pub use virtual_point::VirtualPoint;
