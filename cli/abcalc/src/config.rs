//! `abcalc.toml`: per-project defaults for the experiment parameters.

use std::fs;
use std::path::{Path, PathBuf};

use abcalc_stats::{ExperimentParameters, StatsError, Tail};
use abcalc_stats::{DEFAULT_ALPHA, DEFAULT_POWER, DEFAULT_RATIO};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

pub const CONFIG_FILE: &str = "abcalc.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<Tail>,
}

/// Values given on the command line; these win over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub alpha: Option<f64>,
    pub power: Option<f64>,
    pub ratio: Option<f64>,
    pub tail: Option<Tail>,
}

impl Config {
    /// Merge flag > config > built-in default, then validate.
    pub fn parameters(&self, overrides: &Overrides) -> Result<ExperimentParameters, StatsError> {
        let d = &self.defaults;
        ExperimentParameters::new(
            overrides.alpha.or(d.alpha).unwrap_or(DEFAULT_ALPHA),
            overrides.power.or(d.power).unwrap_or(DEFAULT_POWER),
            overrides.ratio.or(d.ratio).unwrap_or(DEFAULT_RATIO),
            overrides.tail.or(d.tail).unwrap_or_default(),
        )
    }

    /// Parameters for `significance` and `power`, which read only alpha and
    /// tail; the design-side `power` and `ratio` entries are not checked here.
    pub fn analysis_parameters(
        &self,
        overrides: &Overrides,
    ) -> Result<ExperimentParameters, StatsError> {
        let d = &self.defaults;
        ExperimentParameters::for_analysis(
            overrides.alpha.or(d.alpha).unwrap_or(DEFAULT_ALPHA),
            overrides.tail.or(d.tail).unwrap_or_default(),
        )
    }
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(text)
}

/// Load the config at `explicit`, or `abcalc.toml` in the working directory
/// when it exists. Returns the path actually read, if any.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), CliError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if !default.exists() {
                return Ok((Config::default(), None));
            }
            default
        }
    };
    let text = fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| CliError::Config {
        path: path.clone(),
        source,
    })?;
    Ok((config, Some(path)))
}

pub fn generate_config() -> String {
    let mut out = String::new();
    out.push_str("# abcalc defaults; command-line flags override these values.\n");
    out.push_str("[defaults]\n");
    out.push_str("\n# Significance level, in (0, 1)\n");
    out.push_str(&format!("alpha = {DEFAULT_ALPHA}\n"));
    out.push_str("\n# Target power for sample-size calculations, in (0, 1)\n");
    out.push_str(&format!("power = {DEFAULT_POWER}\n"));
    out.push_str("\n# Control size / treatment size\n");
    out.push_str(&format!("ratio = {DEFAULT_RATIO:.1}\n"));
    out.push_str("\n# two-sided, greater or less\n");
    out.push_str(&format!("tail = \"{}\"\n", Tail::TwoSided));
    out
}
