//! Two-proportion A/B test calculators.
//!
//! Sample size example (treatment expected one point below a 25% baseline):
//! ```
//! use abcalc_stats::{calculate_sample_size, ExperimentParameters, Tail};
//! let params = ExperimentParameters::new(0.05, 0.8, 1.0, Tail::TwoSided).unwrap();
//! let res = calculate_sample_size(0.25, Some(-0.01), None, &params).unwrap();
//! assert_eq!(res.treatment, res.control);
//! println!("need {} per arm", res.treatment);
//! ```
//!
//! Significance and post-hoc power on observed counts:
//! ```
//! use abcalc_stats::{achieved_power, test_significance, ExperimentParameters, ProportionSample, Tail};
//! let t = ProportionSample::new(1393, 5805).unwrap();
//! let c = ProportionSample::new(6436, 24757).unwrap();
//! let params = ExperimentParameters::for_analysis(0.05, Tail::TwoSided).unwrap();
//! let sig = test_significance(&t, &c, &params).unwrap();
//! let pow = achieved_power(&t, &c, &params).unwrap();
//! println!("p={:.4} significant={} power={:.3}", sig.p_value, sig.significant, pow.power);
//! ```
mod effect_size;
mod error;
mod params;
mod posthoc;
mod power;
mod sample_size;
mod significance;

pub use effect_size::*;
pub use error::*;
pub use params::*;
pub use posthoc::*;
pub use power::{compute_power, solve_sample_size};
pub use sample_size::*;
pub use significance::*;

#[cfg(test)]
mod test_support {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Route solver debug output to the test harness once per process.
    pub fn init_test_logger() {
        INIT.call_once(|| {
            Builder::new()
                .filter_level(LevelFilter::Debug)
                .is_test(true)
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "[{}] {}: {}",
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .init();
            log::info!("Test logger initialized");
        });
    }

    #[test]
    fn solver_logs_without_panicking() {
        init_test_logger();
        let params = crate::ExperimentParameters::default();
        let res = crate::calculate_sample_size(0.5, Some(0.1), None, &params);
        assert!(res.is_ok());
    }
}
