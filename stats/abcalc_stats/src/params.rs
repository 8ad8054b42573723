//! Input records: test parameters and observed per-arm counts.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatsError};

/// Direction of the alternative hypothesis.
///
/// `Greater` means the treatment proportion exceeds the control proportion,
/// `Less` the opposite. Aliases used by other statistics packages
/// (`larger`, `smaller`, `2s`) are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Tail {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "two_sided", alias = "2s"))]
    TwoSided,
    #[cfg_attr(feature = "serde", serde(alias = "larger"))]
    Greater,
    #[cfg_attr(feature = "serde", serde(alias = "smaller"))]
    Less,
}

impl Tail {
    pub fn as_str(self) -> &'static str {
        match self {
            Tail::TwoSided => "two-sided",
            Tail::Greater => "greater",
            Tail::Less => "less",
        }
    }

    pub fn is_two_sided(self) -> bool {
        self == Tail::TwoSided
    }
}

impl fmt::Display for Tail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tail {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-sided" | "two_sided" | "2s" => Ok(Tail::TwoSided),
            "greater" | "larger" => Ok(Tail::Greater),
            "less" | "smaller" => Ok(Tail::Less),
            other => Err(StatsError::invalid(format!(
                "unknown tail '{other}' (expected two-sided, greater or less)"
            ))),
        }
    }
}

pub const DEFAULT_ALPHA: f64 = 0.1;
pub const DEFAULT_POWER: f64 = 0.6;
pub const DEFAULT_RATIO: f64 = 1.0;

/// Design parameters of a two-arm proportion test.
///
/// Only constructible through [`ExperimentParameters::new`] or `Default`,
/// so every value in circulation satisfies:
/// - `alpha` in (0, 1)
/// - `power` in (0, 1)
/// - `ratio` (control size / treatment size) finite and > 0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExperimentParameters {
    alpha: f64,
    power: f64,
    ratio: f64,
    tail: Tail,
}

impl ExperimentParameters {
    pub fn new(alpha: f64, power: f64, ratio: f64, tail: Tail) -> Result<Self> {
        check_alpha(alpha)?;
        if !(power > 0.0 && power < 1.0) {
            return Err(StatsError::invalid(format!(
                "power must be in (0, 1), got {power}"
            )));
        }
        check_ratio(ratio)?;
        Ok(Self {
            alpha,
            power,
            ratio,
            tail,
        })
    }

    /// Parameters for the analysis-side calculators, which only read
    /// `alpha` and `tail`.
    pub fn for_analysis(alpha: f64, tail: Tail) -> Result<Self> {
        Self::new(alpha, DEFAULT_POWER, DEFAULT_RATIO, tail)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn tail(&self) -> Tail {
        self.tail
    }
}

impl Default for ExperimentParameters {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            power: DEFAULT_POWER,
            ratio: DEFAULT_RATIO,
            tail: Tail::TwoSided,
        }
    }
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::invalid(format!(
            "significance level must be in (0, 1), got {alpha}"
        )))
    }
}

pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(StatsError::invalid(format!(
            "allocation ratio must be positive and finite, got {ratio}"
        )))
    }
}

pub(crate) fn check_proportion(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(StatsError::invalid(format!(
            "{name} must be a proportion in [0, 1], got {p}"
        )))
    }
}

/// Observed successes out of trials for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProportionSample {
    successes: u64,
    trials: u64,
}

impl ProportionSample {
    pub fn new(successes: u64, trials: u64) -> Result<Self> {
        if trials == 0 {
            return Err(StatsError::invalid("trial count must be positive"));
        }
        if successes > trials {
            return Err(StatsError::invalid(format!(
                "success count {successes} exceeds trial count {trials}"
            )));
        }
        Ok(Self { successes, trials })
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn rate(&self) -> f64 {
        self.successes as f64 / self.trials as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_parses_canonical_names_and_aliases() {
        assert_eq!("two-sided".parse::<Tail>().unwrap(), Tail::TwoSided);
        assert_eq!("2s".parse::<Tail>().unwrap(), Tail::TwoSided);
        assert_eq!("Larger".parse::<Tail>().unwrap(), Tail::Greater);
        assert_eq!("smaller".parse::<Tail>().unwrap(), Tail::Less);
        assert!("upward".parse::<Tail>().is_err());
        assert_eq!(Tail::Less.to_string(), "less");
    }

    #[test]
    fn default_parameters_match_documented_values() {
        let p = ExperimentParameters::default();
        assert_eq!(p.alpha(), 0.1);
        assert_eq!(p.power(), 0.6);
        assert_eq!(p.ratio(), 1.0);
        assert_eq!(p.tail(), Tail::TwoSided);
    }

    #[test]
    fn parameters_reject_out_of_range_values() {
        assert!(ExperimentParameters::new(0.0, 0.8, 1.0, Tail::TwoSided).is_err());
        assert!(ExperimentParameters::new(1.0, 0.8, 1.0, Tail::TwoSided).is_err());
        assert!(ExperimentParameters::new(0.05, 1.0, 1.0, Tail::TwoSided).is_err());
        assert!(ExperimentParameters::new(0.05, 0.8, 0.0, Tail::TwoSided).is_err());
        assert!(ExperimentParameters::new(0.05, 0.8, f64::INFINITY, Tail::Less).is_err());
        assert!(ExperimentParameters::new(f64::NAN, 0.8, 1.0, Tail::Less).is_err());
        assert!(ExperimentParameters::new(0.05, 0.8, 2.0, Tail::Greater).is_ok());
    }

    #[test]
    fn sample_requires_positive_trials_and_bounded_successes() {
        let err = ProportionSample::new(0, 0).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(ProportionSample::new(6, 5).unwrap_err().is_invalid_input());

        let s = ProportionSample::new(0, 1).unwrap();
        assert_eq!(s.rate(), 0.0);
        let s = ProportionSample::new(3, 4).unwrap();
        assert_eq!(s.rate(), 0.75);
    }
}
