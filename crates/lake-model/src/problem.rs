//! The evaluation function the optimizer calls
//!
//! ```text
//! optimizer → evaluate(vars, seed) → [inflows] → [simulate] → [reduce] → Evaluation
//! ```
//!
//! Every call is a pure function of `(vars, seed)` against the fixed
//! configuration. All working arrays are call-local, so one `LakeProblem` can
//! be shared by any number of threads.

use lake_common::{DecisionVector, Evaluation, Result};
use tracing::{debug, trace};

use crate::inflow::{InflowSource, LogNormalInflow};
use crate::objectives::{LakeObjectives, ObjectiveReducer};
use crate::simulation::LakeSimulator;
use crate::threshold::ThresholdSolver;
use crate::ModelConfig;

/// Contract between an optimizer and the problem it searches
pub trait Problem: Send + Sync {
    /// Decision vector length
    fn nvars(&self) -> usize;

    fn nobjs(&self) -> usize;

    fn nconstrs(&self) -> usize;

    /// Inclusive `(lower, upper)` range of every decision variable
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Epsilon resolution per objective
    fn epsilons(&self) -> &[f64];

    /// Evaluate one candidate against the trial set selected by `seed`
    fn evaluate(&self, vars: &[f64], seed: u64) -> Result<Evaluation>;
}

/// Lake pollution control problem
#[derive(Debug, Clone)]
pub struct LakeProblem<I = LogNormalInflow> {
    config: ModelConfig,
    critical_threshold: f64,
    inflow: I,
}

impl LakeProblem<LogNormalInflow> {
    /// Build the problem with log-normal natural inflows
    pub fn new(config: ModelConfig) -> Result<Self> {
        let inflow = LogNormalInflow::new(&config.lake)?;
        Self::with_inflow(config, inflow)
    }
}

impl<I: InflowSource> LakeProblem<I> {
    /// Build the problem with a custom inflow source.
    ///
    /// The critical threshold depends only on the lake constants, so it is
    /// solved here once. A solver failure makes the problem unusable.
    pub fn with_inflow(config: ModelConfig, inflow: I) -> Result<Self> {
        config.validate()?;
        let critical_threshold = ThresholdSolver::default().solve(&config.lake)?;
        debug!(critical_threshold, lake = %config.lake, "lake problem ready");
        Ok(Self {
            config,
            critical_threshold,
            inflow,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn critical_threshold(&self) -> f64 {
        self.critical_threshold
    }

    /// Evaluate and keep the typed objectives
    pub fn evaluate_policy(&self, vars: &[f64], seed: u64) -> Result<LakeObjectives> {
        let config = &self.config;
        let policy = DecisionVector::new(vars.to_vec(), config.nvars())?;

        let inflows = self
            .inflow
            .generate(seed, config.n_samples, config.n_years)?;
        let simulator = LakeSimulator::new(
            &config.lake,
            config.n_years,
            config.n_samples,
            config.inertia_threshold,
            self.critical_threshold,
        );
        let acc = simulator.run(&policy, &inflows)?;
        let objectives = ObjectiveReducer::new(config.reliability_threshold).reduce(&acc)?;

        trace!(seed, ?objectives, "policy evaluated");
        Ok(objectives)
    }
}

impl<I: InflowSource> Problem for LakeProblem<I> {
    fn nvars(&self) -> usize {
        self.config.nvars()
    }

    fn nobjs(&self) -> usize {
        lake_common::N_OBJS
    }

    fn nconstrs(&self) -> usize {
        lake_common::N_CONSTRS
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(self.config.lower_bound, self.config.upper_bound); self.nvars()]
    }

    fn epsilons(&self) -> &[f64] {
        &self.config.epsilons
    }

    fn evaluate(&self, vars: &[f64], seed: u64) -> Result<Evaluation> {
        self.evaluate_policy(vars, seed).map(Evaluation::from)
    }
}
