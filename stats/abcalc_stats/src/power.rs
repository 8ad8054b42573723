//! Power of the two-independent-sample proportion z-test under the normal
//! approximation, and its inverse: the treatment-arm size reaching a target power.
//!
//! Both directions work on the effective sample size
//! `nobs = 1 / (1/n1 + 1/n2)` with `n2 = ratio · n1`, so the standardized
//! shift of the alternative is `effect_size · √nobs`.

use log::{debug, trace};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, StatsError};
use crate::params::{check_alpha, check_ratio, Tail};

/// Bracketing gives up beyond this effective sample size.
const MAX_NOBS: f64 = 1e15;
const MAX_BISECTIONS: usize = 200;
const REL_TOLERANCE: f64 = 1e-12;

pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))
}

/// z such that P(Z > z) = q.
fn upper_quantile(normal: &Normal, q: f64) -> f64 {
    -normal.inverse_cdf(q)
}

fn effective_nobs(n1: f64, ratio: f64) -> f64 {
    n1 * ratio / (1.0 + ratio)
}

fn power_at_nobs(normal: &Normal, effect_size: f64, nobs: f64, alpha: f64, tail: Tail) -> f64 {
    let shift = effect_size * nobs.sqrt();
    let power = match tail {
        Tail::TwoSided => {
            let crit = upper_quantile(normal, alpha / 2.0);
            normal.sf(crit - shift) + normal.cdf(-crit - shift)
        }
        Tail::Greater => normal.sf(upper_quantile(normal, alpha) - shift),
        Tail::Less => normal.cdf(-upper_quantile(normal, alpha) - shift),
    };
    power.clamp(0.0, 1.0)
}

/// Probability of rejecting the null with `n1` treatment observations and
/// `ratio · n1` control observations when the true effect is `effect_size`.
pub fn compute_power(effect_size: f64, n1: f64, alpha: f64, ratio: f64, tail: Tail) -> Result<f64> {
    if !effect_size.is_finite() {
        return Err(StatsError::invalid(format!(
            "effect size must be finite, got {effect_size}"
        )));
    }
    if !(n1.is_finite() && n1 > 0.0) {
        return Err(StatsError::invalid(format!(
            "treatment sample size must be positive, got {n1}"
        )));
    }
    check_alpha(alpha)?;
    check_ratio(ratio)?;

    let normal = standard_normal()?;
    Ok(power_at_nobs(
        &normal,
        effect_size,
        effective_nobs(n1, ratio),
        alpha,
        tail,
    ))
}

/// Real-valued treatment-arm size at which [`compute_power`] reaches `power`.
///
/// Callers round the result up; the returned value is the upper end of the
/// final bisection bracket, so its power is never below the target.
pub fn solve_sample_size(
    effect_size: f64,
    alpha: f64,
    power: f64,
    ratio: f64,
    tail: Tail,
) -> Result<f64> {
    if !effect_size.is_finite() {
        return Err(StatsError::invalid(format!(
            "effect size must be finite, got {effect_size}"
        )));
    }
    if effect_size == 0.0 {
        return Err(StatsError::invalid(
            "effect size is zero; no finite sample size can detect it",
        ));
    }
    check_alpha(alpha)?;
    check_ratio(ratio)?;
    if power.is_nan() || power <= 0.0 {
        return Err(StatsError::invalid(format!(
            "target power must be in (0, 1), got {power}"
        )));
    }
    if power >= 1.0 {
        return Err(StatsError::no_convergence(format!(
            "target power {power} is only approached as the sample size grows without bound"
        )));
    }
    // At nobs -> 0 every tail rejects with probability alpha.
    if power <= alpha {
        return Err(StatsError::no_convergence(format!(
            "target power {power} does not exceed the significance level {alpha}"
        )));
    }

    let normal = standard_normal()?;
    let shortfall = |nobs: f64| power_at_nobs(&normal, effect_size, nobs, alpha, tail) - power;

    let mut lo = 0.0;
    let mut hi = 1.0;
    while shortfall(hi) < 0.0 {
        lo = hi;
        hi *= 2.0;
        if hi > MAX_NOBS {
            return Err(StatsError::no_convergence(format!(
                "no sample size reaches power {power} for effect size {effect_size} \
                 under a {tail} alternative"
            )));
        }
    }
    debug!("power solver bracket: nobs in [{lo}, {hi}]");

    for step in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if shortfall(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        trace!("bisection step {step}: [{lo}, {hi}]");
        if hi - lo <= REL_TOLERANCE * hi {
            let n1 = hi * (1.0 + ratio) / ratio;
            if !n1.is_finite() {
                return Err(StatsError::no_convergence(format!(
                    "treatment size overflows for allocation ratio {ratio}"
                )));
            }
            debug!("solved treatment size n1 = {n1} (effective nobs {hi})");
            return Ok(n1);
        }
    }

    Err(StatsError::no_convergence(format!(
        "bisection did not settle within {MAX_BISECTIONS} steps"
    )))
}
