//! Reduce simulation accumulators to four objectives and one constraint
//!
//! | # | Objective                     | Sign      |
//! |---|-------------------------------|-----------|
//! | 0 | expected discounted benefit   | negated   |
//! | 1 | peak mean annual phosphorus   | as is     |
//! | 2 | fraction of smooth transitions| negated   |
//! | 3 | reliability                   | negated   |
//!
//! Inertia is averaged over `n_years − 1` transitions because the first year
//! has no predecessor.

use lake_common::{Evaluation, Result, SimulationError};
use serde::{Deserialize, Serialize};

use crate::simulation::TrialAccumulators;

/// Objectives and constraint of one policy, all in minimization sign
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LakeObjectives {
    /// Negated mean discounted benefit
    pub benefit: f64,
    /// Largest mean annual phosphorus concentration
    pub max_phosphorus: f64,
    /// Negated fraction of transitions meeting the inertia condition
    pub inertia: f64,
    /// Negated fraction of trial-years below the critical threshold
    pub reliability: f64,
    /// Reliability shortfall below the threshold, zero when feasible
    pub reliability_shortfall: f64,
}

impl LakeObjectives {
    #[inline]
    pub fn objective_vector(&self) -> [f64; lake_common::N_OBJS] {
        [self.benefit, self.max_phosphorus, self.inertia, self.reliability]
    }

    #[inline]
    pub fn constraint_vector(&self) -> [f64; lake_common::N_CONSTRS] {
        [self.reliability_shortfall]
    }

    /// Reliability as a positive fraction
    #[inline]
    pub fn reliability_fraction(&self) -> f64 {
        -self.reliability
    }

    /// Mean discounted benefit as a positive quantity
    #[inline]
    pub fn expected_benefit(&self) -> f64 {
        -self.benefit
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.reliability_shortfall == 0.0
    }
}

impl From<LakeObjectives> for Evaluation {
    fn from(objs: LakeObjectives) -> Self {
        Evaluation::new(
            objs.objective_vector().to_vec(),
            objs.constraint_vector().to_vec(),
        )
    }
}

/// Turns accumulators into objectives
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveReducer {
    reliability_threshold: f64,
}

impl ObjectiveReducer {
    pub fn new(reliability_threshold: f64) -> Self {
        Self {
            reliability_threshold,
        }
    }

    pub fn reduce(&self, acc: &TrialAccumulators) -> Result<LakeObjectives> {
        let n_samples = acc.n_samples() as f64;
        let n_years = acc.n_years() as f64;

        let benefit = -(acc.discounted_benefit.iter().sum::<f64>() / n_samples);
        let max_phosphorus = acc
            .average_annual_p
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let inertia_met: u64 = acc.yrs_inertia_met.iter().map(|&n| u64::from(n)).sum();
        let inertia = -(inertia_met as f64) / ((n_years - 1.0) * n_samples);
        let pcrit_met: u64 = acc.yrs_pcrit_met.iter().map(|&n| u64::from(n)).sum();
        let reliability = -(pcrit_met as f64) / (n_years * n_samples);

        let reliability_shortfall = (self.reliability_threshold - (-reliability)).max(0.0);

        let objectives = LakeObjectives {
            benefit,
            max_phosphorus,
            inertia,
            reliability,
            reliability_shortfall,
        };
        for (index, value) in objectives.objective_vector().into_iter().enumerate() {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteObjective { index, value }.into());
            }
        }
        Ok(objectives)
    }
}
