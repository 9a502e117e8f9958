use kurve_core::Observer;
use kurve_solvers::least_squares::levenberg_marquardt::{Action, Event};

use crate::Specification;
use crate::assembly::SpeedTerm;

use super::{Config, Error, Solution, minimize};

/// Reparameterizes a curve toward constant speed.
///
/// Solves the specification's problem with an added penalty on the squared
/// difference between the curve's speed and its length, weighted by
/// [`Config::uniformity_weight`]. The point, attachment, and length
/// residuals are kept, so the normalized curve meets the same
/// specifications as a plain solve.
///
/// The problem depends only on the basic specification, so a converged
/// result is a fixed point: normalizing it again takes no iterations and
/// returns it unchanged. A result that did not converge is reported through
/// [`Solution::status`].
///
/// # Errors
///
/// Returns an error if the problem fails to assemble or the solver rejects
/// the starting point.
pub fn normalize(specification: &Specification, config: &Config) -> Result<Solution, Error> {
    normalize_observed(specification, config, ())
}

pub(super) fn normalize_observed<Obs>(
    specification: &Specification,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    let speed = SpeedTerm::Uniform {
        weight: config.uniformity_weight(),
    };
    minimize(specification, speed, config, observer)
}
