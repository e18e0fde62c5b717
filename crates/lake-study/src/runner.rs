//! Seed loop and persistence
//!
//! Run `j` is seeded with `j` and its approximation set lands in
//! `{output_dir}/{j+1}.set`. The JSON summary is written once all runs finish.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use lake_common::Result;
use lake_model::Problem;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::StudyConfig;
use crate::optimizer::{Optimizer, RunOutcome};
use crate::result_set::write_result_set;

/// Per-run statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSummary {
    pub seed: u64,
    pub evaluations: usize,
    pub failures: usize,
    pub archive_size: usize,
    pub feasible: usize,
    pub result_file: PathBuf,
}

/// Whole-study statistics, written as `summary.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySummary {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub nvars: usize,
    pub nobjs: usize,
    pub nconstrs: usize,
    pub runs: Vec<SeedSummary>,
}

impl StudySummary {
    pub fn total_evaluations(&self) -> usize {
        self.runs.iter().map(|r| r.evaluations).sum()
    }
}

/// Drives one optimizer run per seed against an injected problem
pub struct StudyRunner<'a> {
    config: &'a StudyConfig,
    problem: &'a dyn Problem,
}

impl<'a> StudyRunner<'a> {
    pub fn new(config: &'a StudyConfig, problem: &'a dyn Problem) -> Self {
        Self { config, problem }
    }

    /// Run every seed, persisting each result set as it completes
    pub fn run<O: Optimizer>(&self, optimizer: &mut O) -> Result<StudySummary> {
        fs::create_dir_all(&self.config.output_dir)?;
        info!(
            seeds = self.config.n_seeds,
            output_dir = %self.config.output_dir.display(),
            "starting study"
        );

        let mut runs = Vec::with_capacity(self.config.n_seeds as usize);
        for seed in 0..self.config.n_seeds {
            runs.push(self.run_seed(optimizer, seed)?);
        }

        let summary = StudySummary {
            generated_at: Utc::now(),
            version: crate::STUDY_VERSION.to_string(),
            nvars: self.problem.nvars(),
            nobjs: self.problem.nobjs(),
            nconstrs: self.problem.nconstrs(),
            runs,
        };
        let summary_path = self.config.summary_path();
        if let Some(parent) = summary_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

        info!(
            total_evaluations = summary.total_evaluations(),
            summary = %summary_path.display(),
            "study complete"
        );
        Ok(summary)
    }

    #[instrument(skip(self, optimizer))]
    fn run_seed<O: Optimizer>(&self, optimizer: &mut O, seed: u64) -> Result<SeedSummary> {
        let RunOutcome {
            solutions,
            evaluations,
            failures,
        } = optimizer.solve(self.problem, seed)?;

        let result_file = self.config.output_dir.join(format!("{}.set", seed + 1));
        write_result_set(
            &result_file,
            &solutions,
            self.problem.nvars(),
            self.problem.nobjs(),
        )?;

        let feasible = solutions
            .iter()
            .filter(|s| s.evaluation.is_feasible())
            .count();
        info!(
            archive = solutions.len(),
            feasible,
            file = %result_file.display(),
            "result set written"
        );

        Ok(SeedSummary {
            seed,
            evaluations,
            failures,
            archive_size: solutions.len(),
            feasible,
            result_file,
        })
    }
}
