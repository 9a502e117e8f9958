//! Numerical solvers for the Kurve curve optimizer.
//!
//! # Modules
//!
//! - [`least_squares`]: solvers for [`LeastSquaresProblem`]s
//!
//! [`LeastSquaresProblem`]: kurve_core::LeastSquaresProblem

pub mod least_squares;
