//! Reusable observers for the Kurve solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across solvers.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasObjective`], [`CanStopEarly`])
//! - [`LogObserver`]: forwards solver events to the `log` facade
//!
//! [`Observer`]: kurve_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`CanStopEarly`]: traits::CanStopEarly

mod logging;
pub mod traits;

pub use logging::LogObserver;
