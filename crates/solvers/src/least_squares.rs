//! Solvers for nonlinear least-squares problems.
//!
//! A [`LeastSquaresProblem`] maps solver variables `x` to a residual vector
//! `r(x)` and its Jacobian. Solvers in this module search for the `x` that
//! minimizes `Σ rᵢ(x)²`.
//!
//! # Solvers
//!
//! - [`levenberg_marquardt`]: damped Gauss–Newton with Marquardt scaling
//!
//! [`LeastSquaresProblem`]: kurve_core::LeastSquaresProblem

pub mod levenberg_marquardt;
