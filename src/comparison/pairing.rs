// Matched-pair extraction for paired tests
//
// Trials are paired by run id: runs of two configurations that share an id
// used the same seed, so their outcomes are dependent samples. Ids present
// in only one group are dropped; the intersection is processed in sorted
// order so downstream vectors are deterministic.

use crate::error::{PipelineError, Result};
use crate::run_store::{index_by_run, TrialOutcome};

/// Aligned per-pair value vectors for two result groups.
///
/// All four vectors share the ordering of `run_ids`.
#[derive(Debug, Clone)]
pub struct PairedSamples {
    /// Sorted intersection of run ids present in both groups
    pub run_ids: Vec<u64>,
    pub fitness_a: Vec<f64>,
    pub fitness_b: Vec<f64>,
    pub time_a: Vec<f64>,
    pub time_b: Vec<f64>,
}

impl PairedSamples {
    pub fn len(&self) -> usize {
        self.run_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_ids.is_empty()
    }
}

/// Build aligned sample vectors from two result groups.
///
/// # Errors
/// `InsufficientPairs` when fewer than 2 run ids are shared; a paired test
/// on 0 or 1 pairs is degenerate and must not be executed.
pub fn pair_by_run_id(
    a: &[TrialOutcome],
    b: &[TrialOutcome],
    label_a: &str,
    label_b: &str,
) -> Result<PairedSamples> {
    let by_run_a = index_by_run(a);
    let by_run_b = index_by_run(b);

    let mut run_ids: Vec<u64> = by_run_a
        .keys()
        .filter(|id| by_run_b.contains_key(id))
        .copied()
        .collect();
    run_ids.sort_unstable();

    if run_ids.len() < 2 {
        return Err(PipelineError::InsufficientPairs {
            left: label_a.to_string(),
            right: label_b.to_string(),
            found: run_ids.len(),
        });
    }

    let mut fitness_a = Vec::with_capacity(run_ids.len());
    let mut fitness_b = Vec::with_capacity(run_ids.len());
    let mut time_a = Vec::with_capacity(run_ids.len());
    let mut time_b = Vec::with_capacity(run_ids.len());

    for id in &run_ids {
        let left = by_run_a[id];
        let right = by_run_b[id];
        fitness_a.push(left.best_fitness);
        fitness_b.push(right.best_fitness);
        time_a.push(left.execution_time_ms);
        time_b.push(right.execution_time_ms);
    }

    Ok(PairedSamples {
        run_ids,
        fitness_a,
        fitness_b,
        time_a,
        time_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(run_id: u64, best_fitness: f64, time_ms: f64) -> TrialOutcome {
        TrialOutcome {
            run_id,
            best_fitness,
            execution_time_ms: time_ms,
            feasible: true,
        }
    }

    #[test]
    fn test_pairing_intersects_and_sorts() {
        let a = vec![
            outcome(3, 30.0, 300.0),
            outcome(1, 10.0, 100.0),
            outcome(2, 20.0, 200.0),
        ];
        let b = vec![
            outcome(2, 25.0, 250.0),
            outcome(3, 35.0, 350.0),
            outcome(9, 90.0, 900.0),
        ];

        let pairs = pair_by_run_id(&a, &b, "A", "B").unwrap();
        assert_eq!(pairs.run_ids, vec![2, 3]);
        assert_eq!(pairs.fitness_a, vec![20.0, 30.0]);
        assert_eq!(pairs.fitness_b, vec![25.0, 35.0]);
        assert_eq!(pairs.time_b, vec![250.0, 350.0]);
    }

    #[test]
    fn test_pairing_single_overlap_rejected() {
        let a = vec![outcome(1, 10.0, 100.0), outcome(2, 20.0, 200.0)];
        let b = vec![outcome(2, 25.0, 250.0), outcome(7, 70.0, 700.0)];

        let err = pair_by_run_id(&a, &b, "EXP-04A", "EXP-04B").unwrap_err();
        match err {
            PipelineError::InsufficientPairs { left, right, found } => {
                assert_eq!(left, "EXP-04A");
                assert_eq!(right, "EXP-04B");
                assert_eq!(found, 1);
            }
            other => panic!("expected InsufficientPairs, got {other:?}"),
        }
    }

    #[test]
    fn test_pairing_duplicate_ids_last_write_wins() {
        let a = vec![
            outcome(1, 10.0, 100.0),
            outcome(1, 11.0, 110.0),
            outcome(2, 20.0, 200.0),
        ];
        let b = vec![outcome(1, 15.0, 150.0), outcome(2, 25.0, 250.0)];

        let pairs = pair_by_run_id(&a, &b, "A", "B").unwrap();
        assert_eq!(pairs.fitness_a, vec![11.0, 20.0]);
    }
}
