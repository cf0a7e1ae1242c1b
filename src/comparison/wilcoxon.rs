// Wilcoxon signed-rank test for paired samples
//
// Non-parametric alternative to the paired t-test, used for the
// neighborhood-operator comparisons where fitness distributions are
// skewed and normality cannot be assumed.
//
// Procedure (two-sided):
// 1. differences d_i = x_i - y_i; zero differences are dropped
// 2. |d_i| ranked ascending, tied values receive their average rank
// 3. statistic W = min(W+, W-), the smaller signed rank sum
// 4. p-value from the normal approximation of W's null distribution,
//    variance reduced by the standard tie correction
//
// The approximation is the appropriate regime here: the campaign runs 30
// trials per configuration, past the usual exact-enumeration cutoff.

use statrs::distribution::{ContinuousCDF, Normal};

/// Result of a Wilcoxon signed-rank test.
#[derive(Debug, Clone)]
pub struct WilcoxonTest {
    /// min(W+, W-), the smaller of the signed rank sums
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Number of non-zero differences that entered the ranking
    pub n: usize,
}

/// Run the test on two aligned value vectors.
///
/// Degenerate inputs (fewer than two values, or all differences zero)
/// return statistic 0 with p = 1 rather than an error: there is no
/// evidence of a difference, which is exactly what p = 1 states.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> WilcoxonTest {
    debug_assert_eq!(x.len(), y.len());

    let differences: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();

    let n = differences.len();
    if n < 2 {
        return WilcoxonTest {
            statistic: 0.0,
            p_value: 1.0,
            n,
        };
    }

    let ranks = average_ranks(&differences);

    let mut w_plus = 0.0;
    let mut w_minus = 0.0;
    for (diff, rank) in differences.iter().zip(ranks.iter()) {
        if *diff > 0.0 {
            w_plus += rank;
        } else {
            w_minus += rank;
        }
    }
    let statistic = w_plus.min(w_minus);

    let nf = n as f64;
    let mean_w = nf * (nf + 1.0) / 4.0;
    let mut variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0;
    variance -= tie_correction(&ranks) / 48.0;

    if variance <= 0.0 {
        return WilcoxonTest {
            statistic,
            p_value: 1.0,
            n,
        };
    }

    let z = (statistic - mean_w) / variance.sqrt();
    let normal = match Normal::new(0.0, 1.0) {
        Ok(dist) => dist,
        Err(_) => {
            return WilcoxonTest {
                statistic,
                p_value: 1.0,
                n,
            }
        }
    };
    // statistic = min(W+, W-) <= mean under H0, so z <= 0 and the
    // two-sided p-value is twice the lower tail
    let p_value = (2.0 * normal.cdf(z)).min(1.0);

    WilcoxonTest {
        statistic,
        p_value,
        n,
    }
}

/// Ranks of |values| ascending, average rank assigned within tie groups.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| {
        values[i]
            .abs()
            .partial_cmp(&values[j].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut pos = 0;
    while pos < order.len() {
        let mut end = pos;
        while end + 1 < order.len()
            && values[order[end + 1]].abs() == values[order[pos]].abs()
        {
            end += 1;
        }
        // ranks are 1-based; ties share the mean of their rank range
        let average = (pos + end) as f64 / 2.0 + 1.0;
        for &index in &order[pos..=end] {
            ranks[index] = average;
        }
        pos = end + 1;
    }
    ranks
}

/// Sum of t^3 - t over tie groups, for the variance correction.
fn tie_correction(ranks: &[f64]) -> f64 {
    let mut sorted = ranks.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut correction = 0.0;
    let mut pos = 0;
    while pos < sorted.len() {
        let mut end = pos;
        while end + 1 < sorted.len() && sorted[end + 1] == sorted[pos] {
            end += 1;
        }
        let t = (end - pos + 1) as f64;
        correction += t * t * t - t;
        pos = end + 1;
    }
    correction
}
