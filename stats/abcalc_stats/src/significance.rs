//! Pooled two-sample z-test for a difference in proportions.

use log::debug;
use statrs::distribution::ContinuousCDF;

use crate::error::Result;
use crate::params::{ExperimentParameters, ProportionSample, Tail};
use crate::power::standard_normal;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignificanceResult {
    pub treatment_rate: f64,
    pub control_rate: f64,
    /// Treatment rate minus control rate.
    pub difference: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    /// `p_value < alpha`; single comparison, no correction.
    pub significant: bool,
}

/// Tests whether the treatment rate differs from the control rate in the
/// direction given by `params.tail()` at level `params.alpha()`.
///
/// The variance is estimated from the pooled proportion, as under the null
/// hypothesis of equal rates. When both arms are all failures or all
/// successes the pooled variance vanishes and the result is `z = 0`, `p = 1`.
pub fn test_significance(
    treatment: &ProportionSample,
    control: &ProportionSample,
    params: &ExperimentParameters,
) -> Result<SignificanceResult> {
    let treatment_rate = treatment.rate();
    let control_rate = control.rate();
    let difference = treatment_rate - control_rate;

    let n_t = treatment.trials() as f64;
    let n_c = control.trials() as f64;
    let pooled = (treatment.successes() as f64 + control.successes() as f64) / (n_t + n_c);
    let variance = pooled * (1.0 - pooled) * (1.0 / n_t + 1.0 / n_c);

    let (z_statistic, p_value) = if variance > 0.0 {
        let z = difference / variance.sqrt();
        let normal = standard_normal()?;
        let p = match params.tail() {
            Tail::TwoSided => (2.0 * normal.sf(z.abs())).min(1.0),
            Tail::Greater => normal.sf(z),
            Tail::Less => normal.cdf(z),
        };
        (z, p)
    } else {
        (0.0, 1.0)
    };

    let significant = p_value < params.alpha();
    debug!(
        "z-test ({}): diff {difference:.6}, z {z_statistic:.4}, p {p_value:.6}",
        params.tail()
    );

    Ok(SignificanceResult {
        treatment_rate,
        control_rate,
        difference,
        z_statistic,
        p_value,
        significant,
    })
}
