//! Gauss–Legendre quadrature.

/// Weights and abscissae of the 8-point Gauss–Legendre rule on `[-1, 1]`.
const GAUSS_LEGENDRE_8: [(f64, f64); 8] = [
    (0.362_683_783_378_362, -0.183_434_642_495_649_8),
    (0.362_683_783_378_362, 0.183_434_642_495_649_8),
    (0.313_706_645_877_887_3, -0.525_532_409_916_329),
    (0.313_706_645_877_887_3, 0.525_532_409_916_329),
    (0.222_381_034_453_374_5, -0.796_666_477_413_626_7),
    (0.222_381_034_453_374_5, 0.796_666_477_413_626_7),
    (0.101_228_536_290_376_3, -0.960_289_856_497_536_3),
    (0.101_228_536_290_376_3, 0.960_289_856_497_536_3),
];

/// Returns `(weight, abscissa)` pairs for integrating over `[a, b]`.
pub(crate) fn nodes(a: f64, b: f64) -> impl Iterator<Item = (f64, f64)> {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    GAUSS_LEGENDRE_8
        .iter()
        .map(move |&(weight, abscissa)| (weight * half, mid + abscissa * half))
}

/// Integrates `f` over `[a, b]`.
pub(crate) fn integrate(a: f64, b: f64, f: impl Fn(f64) -> f64) -> f64 {
    nodes(a, b).map(|(weight, t)| weight * f(t)).sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn exact_for_polynomials_up_to_degree_fifteen() {
        assert_relative_eq!(
            integrate(0.0, 2.0, |t| t.powi(15)),
            4096.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(integrate(-1.0, 1.0, |_| 1.0), 2.0, epsilon = 1e-14);
    }
}
