//! Solving specifications for their curve coefficients.
//!
//! [`solve`] assembles a specification into a symbolic least-squares problem
//! and minimizes it with Levenberg–Marquardt, starting from the
//! specification's current parameter vector. [`normalize`] solves the same
//! problem with an added uniform-speed term, so that among the curves that
//! meet the specifications it picks the one closest to arc-length
//! parameterization. [`fit`] runs both in sequence.
//!
//! Virtual points start at the current curve's point at their first
//! attachment, so a warm-started solve begins near its previous answer.
//!
//! The solver's gradient tolerance is [`Config::gradient_tol`] times the
//! curve length, so a curve and its scaled copy converge alike.

mod config;
mod error;
mod normalize;
mod solution;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use normalize::normalize;
pub use solution::Solution;

use kurve_core::Observer;
use kurve_solvers::least_squares::levenberg_marquardt::{self, Action, Event, Status};

use crate::assembly::{SpeedTerm, assemble};
use crate::{Curve, Point, Specification, VirtualPoint};

/// Solves `specification`, warm-starting from its parameter vector.
///
/// The observer receives every solver [`Event`].
///
/// # Errors
///
/// Returns an error if the assembled problem is malformed or the solver
/// rejects the starting point. Failing to converge is reported through
/// [`Solution::status`] instead.
pub fn solve<Obs>(
    specification: &Specification,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    minimize(specification, SpeedTerm::Free, config, observer)
}

/// Solves `specification` without observer support.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved(specification: &Specification, config: &Config) -> Result<Solution, Error> {
    solve(specification, config, ())
}

/// Solves `specification` and normalizes the result.
///
/// The observer follows both solves. The returned solution describes the
/// normalized curve, including its status. If the observer stops the first
/// solve, its solution is returned without normalizing.
///
/// # Errors
///
/// Returns an error if either solve fails.
pub fn fit<Obs>(
    specification: &Specification,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    let solved = solve(specification, config, |event: &Event| observer.observe(event))?;
    if solved.status == Status::StoppedByObserver {
        return Ok(solved);
    }
    normalize::normalize_observed(&solved.specification, config, observer)
}

/// Solves and normalizes `specification` without observer support.
///
/// # Errors
///
/// Returns an error under the same conditions as [`fit`].
pub fn fit_unobserved(specification: &Specification, config: &Config) -> Result<Solution, Error> {
    fit(specification, config, ())
}

fn minimize<Obs>(
    specification: &Specification,
    speed: SpeedTerm,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    let basic = specification.basic();
    let start = specification.curve();
    let assembly = assemble(basic, speed);

    let mut x0 = specification.position().to_vec();
    for &anchor in assembly.anchors() {
        let seed = start.point(anchor);
        x0.extend([seed.x, seed.y]);
    }
    let indices: Vec<usize> = assembly
        .virtual_points()
        .iter()
        .map(VirtualPoint::index)
        .collect();
    let coefficient_count = assembly.coefficient_count();

    let problem = assembly.into_problem()?;
    let solver = config.solver_for(basic.curve_length())?;
    let solved = levenberg_marquardt::minimize(&problem, &x0, &solver, observer)?;
    log::debug!(
        "solved {} segments ({speed:?}) in {} iterations: {:?}, objective {:.3e}",
        basic.segment_count(),
        solved.iters,
        solved.status,
        solved.objective,
    );

    let (coefficients, coordinates) = solved.x.split_at(coefficient_count);
    let virtual_points = indices
        .into_iter()
        .zip(coordinates.chunks_exact(2))
        .map(|(index, xy)| (index, Point::new(xy[0], xy[1])))
        .collect();

    let specification = Specification::new(basic.clone(), coefficients.to_vec())?;
    Ok(Solution {
        curve: specification.curve(),
        specification,
        virtual_points,
        objective: solved.objective,
        gradient_norm: solved.gradient_norm,
        iters: solved.iters,
        status: solved.status,
    })
}
