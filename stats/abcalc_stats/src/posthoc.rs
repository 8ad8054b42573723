//! Post-hoc power: how likely the observed sample was to detect the
//! observed effect.
//!
//! This answers "was the experiment large enough for what we saw", not the
//! design question handled by [`crate::calculate_sample_size`]. The effect
//! size here is measured, not hypothesized, and the allocation ratio comes
//! from the realized arm sizes.

use log::debug;

use crate::effect_size::proportion_effect_size;
use crate::error::Result;
use crate::params::{ExperimentParameters, ProportionSample};
use crate::power::compute_power;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PowerResult {
    pub power: f64,
}

pub fn achieved_power(
    treatment: &ProportionSample,
    control: &ProportionSample,
    params: &ExperimentParameters,
) -> Result<PowerResult> {
    let effect_size = proportion_effect_size(treatment.rate(), control.rate())?;
    let n_t = treatment.trials() as f64;
    let ratio = control.trials() as f64 / n_t;
    let power = compute_power(effect_size, n_t, params.alpha(), ratio, params.tail())?;
    debug!("post-hoc power: h {effect_size:.6}, ratio {ratio:.4}, power {power:.6}");
    Ok(PowerResult { power })
}
