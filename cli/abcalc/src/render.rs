//! Human-readable output for each calculator.

use abcalc_stats::{ExperimentParameters, PowerResult, SampleSizeResult, SignificanceResult};

fn pct(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}

pub fn sum(x: f64, y: f64, total: f64) -> String {
    format!("{x} + {y} = {total}")
}

pub fn sample_size(res: &SampleSizeResult, params: &ExperimentParameters) -> String {
    let mut out = format!(
        "Sample size ({}, alpha {}, power {}, ratio {})\n",
        params.tail(),
        params.alpha(),
        params.power(),
        params.ratio()
    );
    out.push_str(&format!("  treatment: {}\n", res.treatment));
    out.push_str(&format!("  control:   {}\n", res.control));
    out.push_str(&format!("  total:     {}\n", res.total()));
    out.push_str(&format!(
        "  detectable difference: {} (effect size h = {:.4})",
        pct(res.min_detectable_difference),
        res.effect_size
    ));
    out
}

pub fn significance(res: &SignificanceResult, params: &ExperimentParameters) -> String {
    let mut out = String::from("Two-proportion z-test\n");
    out.push_str(&format!("  treatment rate: {}\n", pct(res.treatment_rate)));
    out.push_str(&format!("  control rate:   {}\n", pct(res.control_rate)));
    out.push_str(&format!("  difference:     {}\n", pct(res.difference)));
    out.push_str(&format!("  z statistic:    {:.4}\n", res.z_statistic));
    out.push_str(&format!("  p-value:        {:.4}\n", res.p_value));
    if res.significant {
        out.push_str(&format!(
            "✓ significant at alpha {} ({})",
            params.alpha(),
            params.tail()
        ));
    } else {
        out.push_str(&format!(
            "✗ not significant at alpha {} ({})",
            params.alpha(),
            params.tail()
        ));
    }
    out
}

pub fn power(res: &PowerResult, params: &ExperimentParameters) -> String {
    format!(
        "achieved power: {} (alpha {}, {})",
        pct(res.power),
        params.alpha(),
        params.tail()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcalc_stats::Tail;

    #[test]
    fn sum_prints_plain_numbers() {
        assert_eq!(sum(2.0, 3.0, 5.0), "2 + 3 = 5");
        assert_eq!(sum(-1.5, 0.25, -1.25), "-1.5 + 0.25 = -1.25");
    }

    #[test]
    fn significance_banner_reflects_flag() {
        let params = ExperimentParameters::for_analysis(0.05, Tail::TwoSided).unwrap();
        let mut res = SignificanceResult {
            treatment_rate: 0.24,
            control_rate: 0.26,
            difference: -0.02,
            z_statistic: -3.14,
            p_value: 0.0017,
            significant: true,
        };
        let text = significance(&res, &params);
        assert!(text.contains("24.00%"));
        assert!(text.contains("-2.00%"));
        assert!(text.ends_with("✓ significant at alpha 0.05 (two-sided)"));

        res.significant = false;
        assert!(significance(&res, &params).contains("✗ not significant"));
    }

    #[test]
    fn power_is_a_percentage() {
        let params = ExperimentParameters::default();
        let text = power(&PowerResult { power: 0.8865 }, &params);
        assert!(text.starts_with("achieved power: 88.65%"));
    }
}
