//! Error types shared by every calculator in the crate.

use thiserror::Error;

/// Errors returned by the statistical calculators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A parameter is missing, out of its domain, or inconsistent with another.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The power solver could not find a sample size reaching the target.
    #[error("numeric solver did not converge: {0}")]
    NumericNonConvergence(String),
    /// The reference normal distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StatsError::InvalidInput(msg.into())
    }

    pub(crate) fn no_convergence(msg: impl Into<String>) -> Self {
        StatsError::NumericNonConvergence(msg.into())
    }

    /// True for errors caused by the caller's arguments rather than the solver.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StatsError::InvalidInput(_))
    }
}
