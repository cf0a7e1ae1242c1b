//! LaTeX table generation for the experiment report
//!
//! Thin formatting glue over the statistical core: every number printed
//! here comes from `summary`, `comparison`, or `calibration`. Table layout
//! mirrors the report's conventions (booktabs tabulars, star significance
//! labels, `--` for missing cells).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::calibration::{self, CalibrationRecord};
use crate::catalog::{self, convergence_path, runs_path, short_label, Catalog};
use crate::comparison;
use crate::driver;
use crate::error::PipelineError;
use crate::run_store::{self, TrialOutcome};
use crate::summary::{mean, population_std};

/// Phase-1 paired comparisons: Swap vs 2-opt under each initialization.
const PHASE1_PAIRINGS: [(&str, &str, &str); 2] = [
    ("Warmup", "EXP-01A", "EXP-01C"),
    ("Cold", "EXP-01B", "EXP-01D"),
];

const PHASE1_CONFIGS: [&str; 4] = ["EXP-01A", "EXP-01B", "EXP-01C", "EXP-01D"];

/// Phase-3 weight configurations and their display labels.
const PHASE3_CONFIGS: [(&str, &str); 4] = [
    ("EXP-03A", "Baseline"),
    ("EXP-03B", "Hard"),
    ("EXP-03C", "Relaxed"),
    ("EXP-03D", "Distance"),
];

/// One row of a convergence table; columns beyond the median are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvergenceRow {
    pub step: u64,
    pub median_fitness: f64,
}

/// Generate every report table into `output_dir`.
pub fn generate_all(results_dir: &Path, output_dir: &Path, catalog: &Catalog) -> Result<()> {
    println!("Phase 0: Calibration Summary Table");
    generate_phase0_table(results_dir, output_dir, catalog)?;

    println!("\nPhase 1: Statistical Analysis Tables");
    generate_phase1_table(results_dir, output_dir, catalog)?;

    println!("\nPhase 3: Feasibility Rate Table");
    generate_phase3_table(results_dir, output_dir, catalog)?;

    println!("\nPhase 4: Warmup Ablation Statistics");
    generate_phase4_table(results_dir, output_dir, catalog)?;

    println!("\nMaster Results Table");
    generate_master_table(results_dir, output_dir, catalog)?;

    Ok(())
}

fn write_tex(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("  Saved {}", path.display());
    Ok(())
}

/// Load a runs table, treating a missing file as "cell absent".
fn load_optional_runs(path: &Path) -> Option<Vec<TrialOutcome>> {
    match run_store::load_runs(path) {
        Ok(outcomes) => Some(outcomes),
        Err(PipelineError::MissingFile { .. }) => None,
        Err(error) => {
            tracing::warn!("skipping {}: {}", path.display(), error);
            None
        }
    }
}

/// Statistical summary of warmup temperatures per instance.
pub fn generate_phase0_table(
    results_dir: &Path,
    output_dir: &Path,
    catalog: &Catalog,
) -> Result<()> {
    if !results_dir.join("phase0").is_dir() {
        println!("Skipping Phase 0 table: directory not found");
        return Ok(());
    }

    let mut rows = Vec::new();
    for instance in &catalog.instances {
        let path = catalog::warmup_stats_path(results_dir, instance, "phase0-Swap");
        let Ok(stats) = calibration::load_warmup_stats(&path) else {
            continue;
        };
        let record = CalibrationRecord::from_stats(instance, &stats);
        rows.push(phase0_row(&record));
    }

    let content = format!(
        "\\begin{{tabular}}{{lccccc}}\n\
         \\toprule\n\
         Instance & $\\mu(T)$ & $\\sigma(T)$ & Median & IQR & CV \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n",
        rows.join("\n")
    );

    write_tex(&output_dir.join("phase0_calibration.tex"), &content)
}

fn phase0_row(record: &CalibrationRecord) -> String {
    let flag = if record.high_variance {
        " $\\dagger$"
    } else {
        ""
    };
    format!(
        "  {} & {:.1} & {:.1} & {:.1} & [{:.1}, {:.1}] & {:.3}{} \\\\",
        short_label(&record.instance),
        record.mean,
        record.std,
        record.median,
        record.q1,
        record.q3,
        record.cv,
        flag
    )
}

/// Wilcoxon signed-rank tests, robustness CV, and convergence speed.
pub fn generate_phase1_table(
    results_dir: &Path,
    output_dir: &Path,
    catalog: &Catalog,
) -> Result<()> {
    let phase_dir = "exp01";
    if !results_dir.join(phase_dir).is_dir() {
        println!("Skipping Phase 1 table: directory not found");
        return Ok(());
    }

    // Wilcoxon: Swap vs 2-opt, paired by run seed
    let mut wilcoxon_rows = Vec::new();
    for instance in &catalog.instances {
        for (label, swap_id, twoopt_id) in PHASE1_PAIRINGS {
            let swap = load_optional_runs(&runs_path(results_dir, phase_dir, instance, swap_id));
            let twoopt =
                load_optional_runs(&runs_path(results_dir, phase_dir, instance, twoopt_id));
            let (Some(swap), Some(twoopt)) = (swap, twoopt) else {
                continue;
            };

            let record = match comparison::compare(&swap, &twoopt, swap_id, twoopt_id) {
                Ok(record) => record,
                Err(error) => {
                    tracing::warn!("skipping {}/{}: {}", instance, label, error);
                    continue;
                }
            };

            wilcoxon_rows.push(format!(
                "  {} & {} & {:.1} & {:.1} & {:.0} & {:.4} & {} \\\\",
                short_label(instance),
                label,
                record.mean_a,
                record.mean_b,
                record.wilcoxon.statistic,
                record.wilcoxon.p_value,
                record.wilcoxon_tier
            ));
        }
    }

    // Robustness: CV of best fitness per configuration
    let mut cv_rows = Vec::new();
    for instance in &catalog.instances {
        let mut cv_data = Vec::new();
        for config in PHASE1_CONFIGS {
            let Some(outcomes) =
                load_optional_runs(&runs_path(results_dir, phase_dir, instance, config))
            else {
                continue;
            };
            let fitnesses: Vec<f64> = outcomes.iter().map(|o| o.best_fitness).collect();
            let mean_f = mean(&fitnesses);
            let cv = if mean_f > 0.0 {
                population_std(&fitnesses) / mean_f
            } else {
                0.0
            };
            cv_data.push(format!("{cv:.3}"));
        }
        if !cv_data.is_empty() {
            cv_rows.push(format!(
                "  {} & {} \\\\",
                short_label(instance),
                cv_data.join(" & ")
            ));
        }
    }

    // Convergence speed: step to reach 90% of total improvement
    let mut speed_rows = Vec::new();
    for instance in &catalog.instances {
        let mut speed_data = Vec::new();
        for config in PHASE1_CONFIGS {
            let path = convergence_path(results_dir, phase_dir, instance, config);
            let step = load_convergence(&path)
                .as_deref()
                .and_then(convergence_speed);
            speed_data.push(step.map_or_else(|| "--".to_string(), thousands));
        }
        speed_rows.push(format!(
            "  {} & {} \\\\",
            short_label(instance),
            speed_data.join(" & ")
        ));
    }

    let content = format!(
        "% --- Wilcoxon Signed-Rank Test: Swap vs 2-opt ---\n\
         \\begin{{tabular}}{{llccccl}}\n\
         \\toprule\n\
         Instance & Init & $\\bar{{F}}_{{\\text{{Swap}}}}$ & $\\bar{{F}}_{{\\text{{2-opt}}}}$ & $W$ & $p$ & Sig. \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n\
         \n\
         \\vspace{{1em}}\n\
         \n\
         % --- Robustness: Coefficient of Variation ---\n\
         \\begin{{tabular}}{{lcccc}}\n\
         \\toprule\n\
         Instance & EXP-01A & EXP-01B & EXP-01C & EXP-01D \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n\
         \n\
         \\vspace{{1em}}\n\
         \n\
         % --- Convergence Speed: Step to 90\\% of best ---\n\
         \\begin{{tabular}}{{lcccc}}\n\
         \\toprule\n\
         Instance & EXP-01A & EXP-01B & EXP-01C & EXP-01D \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n",
        wilcoxon_rows.join("\n"),
        cv_rows.join("\n"),
        speed_rows.join("\n")
    );

    write_tex(&output_dir.join("exp01_statistics.tex"), &content)
}

fn load_convergence(path: &Path) -> Option<Vec<ConvergenceRow>> {
    if !path.is_file() {
        return None;
    }
    let mut reader = csv::Reader::from_path(path).ok()?;
    let rows: Vec<ConvergenceRow> = reader.deserialize().filter_map(|r| r.ok()).collect();
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

/// First step at which the median fitness reaches 90% of the total
/// improvement over the trace. None when the trace never gets there.
pub fn convergence_speed(rows: &[ConvergenceRow]) -> Option<u64> {
    let initial = rows.first()?.median_fitness;
    let final_fitness = rows.last()?.median_fitness;
    let threshold = initial - 0.9 * (initial - final_fitness);

    rows.iter()
        .find(|row| row.median_fitness <= threshold)
        .map(|row| row.step)
}

/// Format an integer with thousands separators, `12,345`.
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Feasibility rate per weight configuration and instance.
pub fn generate_phase3_table(
    results_dir: &Path,
    output_dir: &Path,
    catalog: &Catalog,
) -> Result<()> {
    let phase_dir = "exp03";
    if !results_dir.join(phase_dir).is_dir() {
        println!("Skipping Phase 3 table: directory not found");
        return Ok(());
    }

    let mut rows = Vec::new();
    for (config, label) in PHASE3_CONFIGS {
        let mut rates = Vec::new();
        for instance in &catalog.instances {
            let cell = match load_optional_runs(&runs_path(
                results_dir,
                phase_dir,
                instance,
                config,
            )) {
                None => "--".to_string(),
                Some(outcomes) if outcomes.is_empty() => "0.00".to_string(),
                Some(outcomes) => {
                    let feasible = outcomes.iter().filter(|o| o.feasible).count();
                    format!("{:.2}", feasible as f64 / outcomes.len() as f64)
                }
            };
            rates.push(cell);
        }
        rows.push(format!("  {} & {} \\\\", label, rates.join(" & ")));
    }

    let content = format!(
        "\\begin{{tabular}}{{lcccc}}\n\
         \\toprule\n\
         Config & inst1 $F_r$ & inst2 $F_r$ & inst3 $F_r$ & concours $F_r$ \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n",
        rows.join("\n")
    );

    write_tex(&output_dir.join("exp03_feasibility.tex"), &content)
}

/// Paired t-test, Cohen's d, and warmup efficiency for the ablation.
pub fn generate_phase4_table(
    results_dir: &Path,
    output_dir: &Path,
    catalog: &Catalog,
) -> Result<()> {
    let phase_dir = "exp04";
    if !results_dir.join(phase_dir).is_dir() {
        println!("Skipping Phase 4 table: directory not found");
        return Ok(());
    }

    let mut rows = Vec::new();
    for instance in &catalog.instances {
        let warmup = load_optional_runs(&runs_path(results_dir, phase_dir, instance, "EXP-04A"));
        let cold = load_optional_runs(&runs_path(results_dir, phase_dir, instance, "EXP-04B"));
        let (Some(warmup), Some(cold)) = (warmup, cold) else {
            continue;
        };

        let record = match comparison::compare(&warmup, &cold, "EXP-04A", "EXP-04B") {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!("skipping {}: {}", instance, error);
                continue;
            }
        };

        rows.push(format!(
            "  {} & {:.1} & {:.1} & {:.2} & {:.4} & {} & {:.3} & {:.4} \\\\",
            short_label(instance),
            record.mean_a,
            record.mean_b,
            record.t_test.statistic,
            record.t_test.p_value,
            record.t_tier,
            record.effect_size,
            record.efficiency
        ));
    }

    let content = format!(
        "\\begin{{tabular}}{{lcccclcc}}\n\
         \\toprule\n\
         Instance & $\\bar{{F}}_{{\\text{{warmup}}}}$ & $\\bar{{F}}_{{\\text{{cold}}}}$ & $t$ & $p$ & Sig. & Cohen's $d$ & $\\eta_{{\\text{{warmup}}}}$ \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n",
        rows.join("\n")
    );

    write_tex(&output_dir.join("exp04_warmup.tex"), &content)
}

/// Consolidated summary table across all phases.
///
/// Phase-0 rows dash out the fitness columns: calibration runs never cool,
/// so their fitness numbers say nothing comparable.
pub fn generate_master_table(
    results_dir: &Path,
    output_dir: &Path,
    catalog: &Catalog,
) -> Result<()> {
    let outcome = driver::aggregate(results_dir, catalog);

    let mut rows = Vec::new();
    for row in &outcome.rows {
        let r = &row.record;
        if row.phase == "0" {
            rows.push(format!(
                "  {} & {} & {} & -- & -- & -- & -- & {:.1} \\\\",
                row.phase,
                row.config,
                short_label(&row.instance),
                r.mean_time_s
            ));
        } else {
            rows.push(format!(
                "  {} & {} & {} & {:.1} & {:.1} & {:.1} & {:.2} & {:.1} \\\\",
                row.phase,
                row.config,
                short_label(&row.instance),
                r.best,
                r.mean,
                r.std,
                r.feasible_rate,
                r.mean_time_s
            ));
        }
    }

    let content = format!(
        "\\begin{{tabular}}{{llcccccr}}\n\
         \\toprule\n\
         Phase & Config & Instance & Best & Mean & Std & $F_r$ & Time (s) \\\\\n\
         \\midrule\n\
         {}\n\
         \\bottomrule\n\
         \\end{{tabular}}\n",
        rows.join("\n")
    );

    write_tex(&output_dir.join("master_results.tex"), &content)
}
