//! # Lake Model
//!
//! Stochastic phosphorus dynamics of a shallow lake and the multi-objective
//! evaluation of a release policy, as called by an external optimizer.
//!
//! ## State Transition
//!
//! ```text
//! P[t+1] = P[t]·(1 − b) + P[t]^q / (1 + P[t]^q) + a[t] + ε[t]
//! ```
//!
//! Where:
//! - P: phosphorus concentration, P[0] = 0
//! - a: controlled release (decision variable)
//! - ε: natural inflow, log-normal with mean `mu` and variance `sigma²`
//!
//! ## Objectives
//!
//! All minimized: negated expected discounted benefit, peak mean phosphorus,
//! negated inertia fraction, negated reliability. One constraint: reliability
//! shortfall below 0.85.

pub mod inflow;
pub mod objectives;
pub mod problem;
pub mod simulation;
pub mod telemetry;
pub mod threshold;

use lake_common::{InputError, LakeParameters, Result};
use serde::{Deserialize, Serialize};

pub use inflow::{ConstantInflow, InflowMatrix, InflowSource, LogNormalInflow};
pub use objectives::{LakeObjectives, ObjectiveReducer};
pub use problem::{LakeProblem, Problem};
pub use simulation::{LakeSimulator, TrialAccumulators};
pub use telemetry::{EvaluationMetrics, InstrumentedProblem};
pub use threshold::ThresholdSolver;

/// Model configuration, fixed for a whole study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Lake and economic constants
    pub lake: LakeParameters,
    /// Planning horizon in years
    pub n_years: usize,
    /// Stochastic trials per evaluation
    pub n_samples: usize,
    /// Minimum acceptable reliability
    pub reliability_threshold: f64,
    /// Release change that still counts as smooth (strictly greater than)
    pub inertia_threshold: f64,
    /// Lower bound on every release
    pub lower_bound: f64,
    /// Upper bound on every release
    pub upper_bound: f64,
    /// Epsilon resolution per objective
    pub epsilons: Vec<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            lake: LakeParameters::default(),
            n_years: lake_common::N_YEARS,
            n_samples: lake_common::N_SAMPLES,
            reliability_threshold: lake_common::RELIABILITY_THRESHOLD,
            inertia_threshold: lake_common::INERTIA_THRESHOLD,
            lower_bound: lake_common::RELEASE_LOWER_BOUND,
            upper_bound: lake_common::RELEASE_UPPER_BOUND,
            epsilons: lake_common::OBJECTIVE_EPSILONS.to_vec(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        self.lake.validate()?;
        // Inertia is averaged over n_years - 1 transitions
        if self.n_years < 2 {
            return Err(InputError::invalid("n_years", "need at least two years").into());
        }
        if self.n_samples == 0 {
            return Err(InputError::invalid("n_samples", "need at least one trial").into());
        }
        if !(0.0..=1.0).contains(&self.reliability_threshold) {
            return Err(InputError::invalid("reliability_threshold", "must lie in [0, 1]").into());
        }
        if !self.inertia_threshold.is_finite() {
            return Err(InputError::invalid("inertia_threshold", "must be finite").into());
        }
        if !(self.lower_bound.is_finite() && self.upper_bound.is_finite())
            || self.lower_bound > self.upper_bound
        {
            return Err(InputError::invalid(
                "bounds",
                format!("invalid range [{}, {}]", self.lower_bound, self.upper_bound),
            )
            .into());
        }
        if self.epsilons.len() != lake_common::N_OBJS || self.epsilons.iter().any(|e| !(*e > 0.0)) {
            return Err(InputError::invalid(
                "epsilons",
                format!("need {} positive values", lake_common::N_OBJS),
            )
            .into());
        }
        Ok(())
    }

    /// Decision vector length
    #[inline]
    pub fn nvars(&self) -> usize {
        self.n_years
    }
}
