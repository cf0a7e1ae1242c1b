// Paired t-test, Cohen's d, and the warmup efficiency ratio
//
// The parametric arm of the warmup ablation: the t statistic is taken on
// first-minus-second differences (so it agrees in sign with the reference
// tables), while Cohen's d is taken on second-minus-first so that a
// positive effect size reads "second group worse" under the
// lower-is-better objective. The d denominator is the SAMPLE standard
// deviation (N-1) per the effect-size convention, unlike the population
// deviation used by the descriptive summaries; both conventions are load
// bearing for reproducing the reference outputs.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::summary::mean;

use super::pairing::PairedSamples;

/// Result of a paired t-test.
#[derive(Debug, Clone)]
pub struct PairedTTest {
    /// t statistic on first-minus-second differences
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Degrees of freedom (n - 1)
    pub df: f64,
    /// Number of pairs
    pub n: usize,
}

const NEUTRAL_P: f64 = 1.0;

/// Sample standard deviation (divide by N-1). Zero when fewer than two
/// values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Paired t-test on two aligned value vectors.
///
/// Zero-variance differences (or fewer than two pairs) return t = 0 with
/// p = 1: constant differences carry no evidence against the null in the
/// t framework, and a hard error here would abort batches over degenerate
/// but harmless inputs.
pub fn paired_t_test(x: &[f64], y: &[f64]) -> PairedTTest {
    debug_assert_eq!(x.len(), y.len());

    let differences: Vec<f64> = x.iter().zip(y.iter()).map(|(a, b)| a - b).collect();
    let n = differences.len();
    if n < 2 {
        return PairedTTest {
            statistic: 0.0,
            p_value: NEUTRAL_P,
            df: 0.0,
            n,
        };
    }

    let sd = sample_std(&differences);
    if sd <= 0.0 {
        return PairedTTest {
            statistic: 0.0,
            p_value: NEUTRAL_P,
            df: (n - 1) as f64,
            n,
        };
    }

    let df = (n - 1) as f64;
    let statistic = mean(&differences) / (sd / (n as f64).sqrt());

    let distribution = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist,
        Err(_) => {
            return PairedTTest {
                statistic,
                p_value: NEUTRAL_P,
                df,
                n,
            }
        }
    };
    let p_value = (2.0 * (1.0 - distribution.cdf(statistic.abs()))).min(1.0);

    PairedTTest {
        statistic,
        p_value,
        df,
        n,
    }
}

/// Cohen's d for paired differences, second minus first.
///
/// `mean(d) / sd(d)` with the sample (N-1) standard deviation; defined as
/// 0 when the differences have zero variance. Positive = second group
/// worse (higher fitness under a lower-is-better objective).
pub fn cohens_d_paired(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    let differences: Vec<f64> = y.iter().zip(x.iter()).map(|(b, a)| b - a).collect();
    let sd = sample_std(&differences);
    if sd > 0.0 {
        mean(&differences) / sd
    } else {
        0.0
    }
}

/// Warmup efficiency: mean fitness improvement bought per millisecond of
/// extra runtime.
///
/// With A = warmup group and B = cold group: improvement is
/// `mean(fitness_B) - mean(fitness_A)` and overhead is
/// `mean(time_A) - mean(time_B)`. Defined as 0 when the overhead is not
/// positive (warmup that costs nothing has no ratio to report, and a
/// negative denominator would flip the sign meaninglessly).
pub fn warmup_efficiency(pairs: &PairedSamples) -> f64 {
    let time_overhead = mean(&pairs.time_a) - mean(&pairs.time_b);
    if time_overhead <= 0.0 {
        return 0.0;
    }
    let fitness_improvement = mean(&pairs.fitness_b) - mean(&pairs.fitness_a);
    fitness_improvement / time_overhead
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(fitness_a: &[f64], fitness_b: &[f64], time_a: &[f64], time_b: &[f64]) -> PairedSamples {
        PairedSamples {
            run_ids: (0..fitness_a.len() as u64).collect(),
            fitness_a: fitness_a.to_vec(),
            fitness_b: fitness_b.to_vec(),
            time_a: time_a.to_vec(),
            time_b: time_b.to_vec(),
        }
    }

    #[test]
    fn test_paired_t_no_difference() {
        let x = [100.0, 120.0];
        let y = [90.0, 130.0];
        // differences +10, -10: mean 0
        let result = paired_t_test(&x, &y);
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_paired_t_constant_differences_neutral() {
        let x = [100.0, 110.0, 120.0];
        let y = [105.0, 115.0, 125.0];
        let result = paired_t_test(&x, &y);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_paired_t_known_value() {
        // d = [-4, -6, -5, -5]: mean -5, sd = sqrt(2/3),
        // t = -5 / (sqrt(2/3)/2) = -12.247...
        let x = [10.0, 10.0, 10.0, 10.0];
        let y = [14.0, 16.0, 15.0, 15.0];
        let result = paired_t_test(&x, &y);
        assert!((result.statistic - (-12.247448713915896)).abs() < 1e-9);
        assert_eq!(result.df, 3.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_paired_t_sign_follows_first_group() {
        let better = [100.0, 101.0, 99.0, 100.5];
        let worse = [110.0, 112.0, 109.0, 111.0];
        // First group lower -> negative differences -> negative t
        let result = paired_t_test(&better, &worse);
        assert!(result.statistic < 0.0);
    }

    #[test]
    fn test_cohens_d_zero_variance() {
        let x = [10.0, 20.0, 30.0];
        let y = [15.0, 25.0, 35.0];
        assert_eq!(cohens_d_paired(&x, &y), 0.0);
    }

    #[test]
    fn test_cohens_d_positive_when_second_worse() {
        let x = [100.0, 102.0, 98.0, 101.0];
        let y = [108.0, 112.0, 107.0, 113.0];
        assert!(cohens_d_paired(&x, &y) > 0.0);
    }

    #[test]
    fn test_cohens_d_antisymmetric() {
        let x = [100.0, 102.0, 98.0, 101.0];
        let y = [108.0, 112.0, 107.0, 113.0];
        let d_xy = cohens_d_paired(&x, &y);
        let d_yx = cohens_d_paired(&y, &x);
        assert!((d_xy + d_yx).abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_positive_overhead() {
        // warmup 200ms slower on average, buys 10 fitness
        let p = pairs(
            &[100.0, 100.0],
            &[110.0, 110.0],
            &[1200.0, 1200.0],
            &[1000.0, 1000.0],
        );
        assert!((warmup_efficiency(&p) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_zero_when_no_overhead() {
        let p = pairs(
            &[100.0, 100.0],
            &[110.0, 110.0],
            &[1000.0, 1000.0],
            &[1000.0, 1000.0],
        );
        assert_eq!(warmup_efficiency(&p), 0.0);
    }

    #[test]
    fn test_efficiency_zero_when_warmup_faster() {
        let p = pairs(
            &[100.0, 100.0],
            &[110.0, 110.0],
            &[900.0, 900.0],
            &[1000.0, 1000.0],
        );
        assert_eq!(warmup_efficiency(&p), 0.0);
    }
}
