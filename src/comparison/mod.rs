// Paired statistical comparison of experiment configurations
//
// Matches trials across two configurations by run id (the shared seed),
// then runs both required procedures over the aligned vectors:
// - Wilcoxon signed-rank for the neighborhood-operator comparisons,
//   where normality of the fitness distributions is not assumed
// - paired t-test plus Cohen's d (and the warmup efficiency ratio) for
//   the warmup-vs-cold-start ablation
//
// Sign convention throughout: fitness is lower-is-better, differences are
// taken second-minus-first for the effect size, so a positive Cohen's d
// means the second group is worse.

mod pairing;
mod significance;
mod ttest;
mod wilcoxon;

pub use pairing::{pair_by_run_id, PairedSamples};
pub use significance::SignificanceTier;
pub use ttest::{cohens_d_paired, paired_t_test, warmup_efficiency, PairedTTest};
pub use wilcoxon::{wilcoxon_signed_rank, WilcoxonTest};

use crate::error::Result;
use crate::run_store::TrialOutcome;
use crate::summary::mean;

/// Full paired comparison of two result groups.
#[derive(Debug, Clone)]
pub struct PairedComparisonRecord {
    /// Number of matched run ids
    pub pairs: usize,
    /// Mean best_fitness of the first group over the matched pairs
    pub mean_a: f64,
    /// Mean best_fitness of the second group over the matched pairs
    pub mean_b: f64,
    pub wilcoxon: WilcoxonTest,
    pub t_test: PairedTTest,
    /// Cohen's d for paired differences (second minus first);
    /// positive = second group worse, 0 when the differences are constant
    pub effect_size: f64,
    /// Fitness improvement per unit of extra runtime spent by the first
    /// group; 0 when the first group is not slower
    pub efficiency: f64,
    pub wilcoxon_tier: SignificanceTier,
    pub t_tier: SignificanceTier,
}

/// Compare two result groups pairwise.
///
/// `label_a`/`label_b` only feed error reporting (which comparison had
/// too few overlapping runs).
///
/// # Errors
/// `InsufficientPairs` when fewer than 2 run ids overlap. Callers skip
/// that comparison; the rest of the batch proceeds.
pub fn compare(
    a: &[TrialOutcome],
    b: &[TrialOutcome],
    label_a: &str,
    label_b: &str,
) -> Result<PairedComparisonRecord> {
    let pairs = pair_by_run_id(a, b, label_a, label_b)?;

    let wilcoxon = wilcoxon_signed_rank(&pairs.fitness_a, &pairs.fitness_b);
    let t_test = paired_t_test(&pairs.fitness_a, &pairs.fitness_b);
    let effect_size = cohens_d_paired(&pairs.fitness_a, &pairs.fitness_b);
    let efficiency = warmup_efficiency(&pairs);

    Ok(PairedComparisonRecord {
        pairs: pairs.len(),
        mean_a: mean(&pairs.fitness_a),
        mean_b: mean(&pairs.fitness_b),
        wilcoxon_tier: SignificanceTier::from_p_value(wilcoxon.p_value),
        t_tier: SignificanceTier::from_p_value(t_test.p_value),
        wilcoxon,
        t_test,
        effect_size,
        efficiency,
    })
}
