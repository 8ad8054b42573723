//! Arcsine effect size between two proportions (Cohen's h).

use crate::error::Result;
use crate::params::check_proportion;

/// `2·asin(√p1) − 2·asin(√p2)`.
///
/// Antisymmetric in its arguments and finite on the closed interval [0, 1].
pub fn proportion_effect_size(p1: f64, p2: f64) -> Result<f64> {
    check_proportion("p1", p1)?;
    check_proportion("p2", p2)?;
    Ok(2.0 * p1.sqrt().asin() - 2.0 * p2.sqrt().asin())
}
