//! Core types for the Kurve curve optimizer.
//!
//! This crate defines the symbolic layer that the curve and solver crates
//! build on:
//!
//! - [`TermGraph`] and [`Term`]: an interning arena of symbolic expressions
//!   with constant folding, differentiation, and memoized evaluation
//! - [`Variable`] and [`Assignment`]: named unknowns and their values
//! - [`Constraint`] and [`VirtualObject`]: soft equalities and entities that
//!   contribute extra unknowns
//! - [`LeastSquaresProblem`]: the residual-vector problem trait solvers consume
//! - [`SymbolicProblem`]: a least-squares problem built from terms
//! - [`Observer`]: receives solver events and optionally returns control actions

mod constraint;
mod observer;
mod problems;
mod symbolic;
mod term;
mod variable;

pub use constraint::{Constraint, VirtualObject};
pub use observer::Observer;
pub use problems::LeastSquaresProblem;
pub use symbolic::SymbolicProblem;
pub use term::{Constant, Function, Node, Term, TermError, TermGraph};
pub use variable::{Assignment, Variable};
