//! Pre-experiment design: minimum arm sizes for a hypothesized difference.

use log::debug;

use crate::effect_size::proportion_effect_size;
use crate::error::{Result, StatsError};
use crate::params::{check_proportion, ExperimentParameters};
use crate::power::solve_sample_size;

/// Largest arm size that survives the round-up into `u64`.
const MAX_ARM_SIZE: f64 = u64::MAX as f64;

/// Required arm sizes, both rounded up from the same real-valued solution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SampleSizeResult {
    pub treatment: u64,
    pub control: u64,
    /// `|p_treatment - p_control|` as actually used by the solver.
    pub min_detectable_difference: f64,
    pub effect_size: f64,
}

impl SampleSizeResult {
    pub fn total(&self) -> u64 {
        self.treatment.saturating_add(self.control)
    }
}

/// Minimum treatment and control sizes to detect the move from `p_control`
/// to the treatment rate with the configured power.
///
/// The treatment rate is `p_control + min_detectable_effect` when an MDE is
/// given, otherwise `p_treatment`. Supplying neither is an error.
pub fn calculate_sample_size(
    p_control: f64,
    min_detectable_effect: Option<f64>,
    p_treatment: Option<f64>,
    params: &ExperimentParameters,
) -> Result<SampleSizeResult> {
    check_proportion("control rate", p_control)?;
    let p_treatment = match (min_detectable_effect, p_treatment) {
        (Some(mde), _) => p_control + mde,
        (None, Some(p)) => p,
        (None, None) => {
            return Err(StatsError::invalid(
                "either a minimum detectable effect or a treatment rate is required",
            ))
        }
    };
    check_proportion("treatment rate", p_treatment)?;

    let effect_size = proportion_effect_size(p_treatment, p_control)?;
    let n1 = solve_sample_size(
        effect_size,
        params.alpha(),
        params.power(),
        params.ratio(),
        params.tail(),
    )?;

    let n_control = params.ratio() * n1;
    if n1 >= MAX_ARM_SIZE || n_control >= MAX_ARM_SIZE {
        return Err(StatsError::no_convergence(format!(
            "required arm sizes ({n1:e} treatment, {n_control:e} control) exceed the representable range"
        )));
    }

    // Both arms round up independently from the unrounded solution.
    let treatment = n1.ceil() as u64;
    let control = n_control.ceil() as u64;
    debug!(
        "sample size for {p_control} -> {p_treatment}: treatment {treatment}, control {control}"
    );

    Ok(SampleSizeResult {
        treatment,
        control,
        min_detectable_difference: (p_treatment - p_control).abs(),
        effect_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Tail;
    use approx::assert_abs_diff_eq;

    fn params(alpha: f64, power: f64, ratio: f64) -> ExperimentParameters {
        ExperimentParameters::new(alpha, power, ratio, Tail::TwoSided).unwrap()
    }

    #[test]
    fn mde_and_target_rate_agree() {
        let p = params(0.05, 0.8, 1.0);
        let by_mde = calculate_sample_size(0.10, Some(0.02), None, &p).unwrap();
        let by_target = calculate_sample_size(0.10, None, Some(0.12), &p).unwrap();
        assert_eq!(by_mde.treatment, by_target.treatment);
        assert_eq!(by_mde.control, by_target.control);
    }

    #[test]
    fn mde_takes_precedence_over_target_rate() {
        let p = params(0.05, 0.8, 1.0);
        let r = calculate_sample_size(0.10, Some(0.02), Some(0.5), &p).unwrap();
        assert_abs_diff_eq!(r.min_detectable_difference, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn missing_target_is_invalid() {
        let err = calculate_sample_size(0.2, None, None, &params(0.05, 0.8, 1.0)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn zero_difference_is_invalid() {
        let err = calculate_sample_size(0.2, Some(0.0), None, &params(0.05, 0.8, 1.0)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn treatment_rate_outside_unit_interval_is_invalid() {
        let err = calculate_sample_size(0.95, Some(0.1), None, &params(0.05, 0.8, 1.0)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn tiny_ratio_reports_unrepresentable_sizes() {
        let p = params(0.05, 0.8, 1e-300);
        let err = calculate_sample_size(0.25, Some(-0.01), None, &p).unwrap_err();
        assert!(matches!(err, StatsError::NumericNonConvergence(_)));
    }

    #[test]
    fn control_is_rounded_from_unrounded_treatment_size() {
        let p = params(0.05, 0.8, 2.5);
        let r = calculate_sample_size(0.3, Some(0.05), None, &p).unwrap();
        let n1 = solve_sample_size(r.effect_size, 0.05, 0.8, 2.5, Tail::TwoSided).unwrap();
        assert_eq!(r.treatment, n1.ceil() as u64);
        assert_eq!(r.control, (2.5 * n1).ceil() as u64);
    }
}
