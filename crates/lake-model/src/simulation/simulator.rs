//! Lake-state recurrence over all trials
//!
//! ```text
//! P[i+1] = P[i]·(1 − b) + P[i]^q / (1 + P[i]^q) + a[i] + ε[s][i]
//! ```
//!
//! Each trial starts from a clean lake and runs exactly `n_years` steps. No
//! clamping is applied; a non-finite state aborts the evaluation.

use lake_common::{DecisionVector, InputError, LakeError, LakeParameters, Result, SimulationError};
use tracing::trace;

use crate::inflow::InflowMatrix;

/// Per-trial and per-year running sums collected during simulation
#[derive(Debug, Clone, PartialEq)]
pub struct TrialAccumulators {
    /// Mean phosphorus across trials, per year
    pub average_annual_p: Vec<f64>,
    /// Discounted benefit, per trial
    pub discounted_benefit: Vec<f64>,
    /// Transitions meeting the inertia condition, per trial
    pub yrs_inertia_met: Vec<u32>,
    /// Years below the critical threshold, per trial
    pub yrs_pcrit_met: Vec<u32>,
}

impl TrialAccumulators {
    pub fn new(n_samples: usize, n_years: usize) -> Self {
        Self {
            average_annual_p: vec![0.0; n_years],
            discounted_benefit: vec![0.0; n_samples],
            yrs_inertia_met: vec![0; n_samples],
            yrs_pcrit_met: vec![0; n_samples],
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.discounted_benefit.len()
    }

    #[inline]
    pub fn n_years(&self) -> usize {
        self.average_annual_p.len()
    }
}

/// Simulates every trial for one policy
#[derive(Debug, Clone, Copy)]
pub struct LakeSimulator<'a> {
    params: &'a LakeParameters,
    n_years: usize,
    n_samples: usize,
    inertia_threshold: f64,
    critical_threshold: f64,
}

impl<'a> LakeSimulator<'a> {
    pub fn new(
        params: &'a LakeParameters,
        n_years: usize,
        n_samples: usize,
        inertia_threshold: f64,
        critical_threshold: f64,
    ) -> Self {
        Self {
            params,
            n_years,
            n_samples,
            inertia_threshold,
            critical_threshold,
        }
    }

    /// One year of the recurrence
    #[inline]
    pub fn step(&self, state: f64, release: f64, inflow: f64) -> f64 {
        state * (1.0 - self.params.b) + self.params.recycling(state) + release + inflow
    }

    /// Full state trajectory of trial `trial`, `n_years + 1` values starting at zero
    pub fn trajectory(
        &self,
        policy: &DecisionVector,
        inflow: &[f64],
        trial: usize,
    ) -> Result<Vec<f64>> {
        let policy = self.check_policy(policy)?;
        self.check_inflow_row(inflow.len())?;

        let mut states = vec![0.0; self.n_years + 1];
        for i in 0..self.n_years {
            states[i + 1] = self.step(states[i], policy[i], inflow[i]);
            self.check_state(trial, i, states[i + 1])?;
        }
        Ok(states)
    }

    /// Run all trials and collect the accumulators the objectives reduce
    pub fn run(&self, policy: &DecisionVector, inflows: &InflowMatrix) -> Result<TrialAccumulators> {
        let policy = self.check_policy(policy)?;
        if inflows.n_samples() != self.n_samples {
            return Err(LakeError::Internal(format!(
                "inflow matrix has {} trials, expected {}",
                inflows.n_samples(),
                self.n_samples
            )));
        }
        self.check_inflow_row(inflows.n_years())?;

        let n_samples = self.n_samples as f64;
        let mut acc = TrialAccumulators::new(self.n_samples, self.n_years);
        let mut lake_state = vec![0.0; self.n_years + 1];

        for s in 0..self.n_samples {
            let inflow = inflows.trial(s);
            lake_state[0] = 0.0;

            for i in 0..self.n_years {
                let next = self.step(lake_state[i], policy[i], inflow[i]);
                self.check_state(s, i, next)?;
                lake_state[i + 1] = next;

                acc.average_annual_p[i] += next / n_samples;
                acc.discounted_benefit[s] +=
                    self.params.alpha * policy[i] * self.params.delta.powf(i as f64);

                if i >= 1 && (policy[i] - policy[i - 1]) > self.inertia_threshold {
                    acc.yrs_inertia_met[s] += 1;
                }
                if next < self.critical_threshold {
                    acc.yrs_pcrit_met[s] += 1;
                }
            }
        }

        trace!(
            trials = self.n_samples,
            years = self.n_years,
            "simulation complete"
        );
        Ok(acc)
    }

    fn check_policy<'p>(&self, policy: &'p DecisionVector) -> Result<&'p [f64]> {
        let releases = policy.as_slice();
        if releases.len() != self.n_years {
            return Err(InputError::WrongLength {
                expected: self.n_years,
                actual: releases.len(),
            }
            .into());
        }
        Ok(releases)
    }

    fn check_inflow_row(&self, len: usize) -> Result<()> {
        if len != self.n_years {
            return Err(LakeError::Internal(format!(
                "inflow sequence has {} years, expected {}",
                len, self.n_years
            )));
        }
        Ok(())
    }

    #[inline]
    fn check_state(&self, trial: usize, year: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(SimulationError::NonFiniteState { trial, year, value }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflow::{ConstantInflow, InflowSource};

    const CRITICAL: f64 = 0.5445;

    fn simulator(params: &LakeParameters, n_years: usize, n_samples: usize) -> LakeSimulator<'_> {
        LakeSimulator::new(params, n_years, n_samples, -0.02, CRITICAL)
    }

    fn policy(releases: &[f64]) -> DecisionVector {
        DecisionVector::new(releases.to_vec(), releases.len()).unwrap()
    }

    #[test]
    fn test_clean_lake_stays_clean() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 10, 3);
        let inflows = ConstantInflow(0.0).generate(0, 3, 10).unwrap();
        let acc = sim.run(&policy(&[0.0; 10]), &inflows).unwrap();

        assert!(acc.average_annual_p.iter().all(|&p| p == 0.0));
        assert!(acc.discounted_benefit.iter().all(|&b| b == 0.0));
        assert_eq!(acc.yrs_pcrit_met, vec![10, 10, 10]);
        assert_eq!(acc.yrs_inertia_met, vec![9, 9, 9]);
    }

    #[test]
    fn test_single_step_matches_recurrence() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 3, 1);
        let states = sim
            .trajectory(&policy(&[0.05, 0.05, 0.05]), &[0.02, 0.02, 0.02], 0)
            .unwrap();

        assert_eq!(states.len(), 4);
        assert_eq!(states[0], 0.0);
        assert!((states[1] - 0.07).abs() < 1e-15);
        let x = states[1];
        let expected = x * 0.58 + x * x / (1.0 + x * x) + 0.07;
        assert!((states[2] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_benefit_is_discounted() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 3, 2);
        let inflows = ConstantInflow(0.0).generate(0, 2, 3).unwrap();
        let acc = sim.run(&policy(&[0.1, 0.1, 0.1]), &inflows).unwrap();

        let expected = 0.4 * 0.1 * (1.0 + 0.98 + 0.98 * 0.98);
        for b in &acc.discounted_benefit {
            assert!((b - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_discount_uses_real_power() {
        // Long horizon so integer powers would drift from pow(delta, i)
        let params = LakeParameters::default();
        let n_years = 100;
        let sim = simulator(&params, n_years, 1);
        let inflows = ConstantInflow(0.0).generate(0, 1, n_years).unwrap();
        let releases = vec![0.05; n_years];
        let acc = sim.run(&policy(&releases), &inflows).unwrap();

        let mut expected = 0.0;
        for (i, a) in releases.iter().enumerate() {
            expected += params.alpha * a * params.delta.powf(i as f64);
        }
        assert_eq!(acc.discounted_benefit[0].to_bits(), expected.to_bits());
    }

    #[test]
    fn test_inertia_threshold_is_strict() {
        let params = LakeParameters::default();
        // Binary-exact threshold and steps so the comparison is not blurred by rounding
        let sim = LakeSimulator::new(&params, 4, 1, -0.25, CRITICAL);
        let inflows = ConstantInflow(0.0).generate(0, 1, 4).unwrap();

        let exact_steps = sim.run(&policy(&[1.0, 0.75, 0.5, 0.25]), &inflows).unwrap();
        assert_eq!(exact_steps.yrs_inertia_met[0], 0);

        let mixed = sim.run(&policy(&[1.0, 0.875, 0.75, 0.5]), &inflows).unwrap();
        assert_eq!(mixed.yrs_inertia_met[0], 2);
    }

    #[test]
    fn test_reliability_counts_years_below_threshold() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 5, 1);
        let inflows = ConstantInflow(0.0).generate(0, 1, 5).unwrap();
        // A release of 1.0 pushes the lake over the threshold in the first year
        let acc = sim.run(&policy(&[1.0; 5]), &inflows).unwrap();
        assert_eq!(acc.yrs_pcrit_met[0], 0);
    }

    #[test]
    fn test_average_is_mean_across_trials() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 2, 2);
        let inflows = InflowMatrix::from_rows(vec![vec![0.01, 0.0], vec![0.03, 0.0]]).unwrap();
        let acc = sim.run(&policy(&[0.0, 0.0]), &inflows).unwrap();
        assert!((acc.average_annual_p[0] - 0.02).abs() < 1e-15);
    }

    #[test]
    fn test_overflow_is_reported() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 2, 1);
        let inflows = ConstantInflow(0.0).generate(0, 1, 2).unwrap();
        let err = sim.run(&policy(&[f64::MAX, f64::MAX]), &inflows).unwrap_err();
        assert!(matches!(
            err,
            LakeError::Simulation(SimulationError::NonFiniteState { trial: 0, .. })
        ));
    }

    #[test]
    fn test_trajectory_reports_its_trial() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 3, 5);
        let inflows = InflowMatrix::from_rows(vec![
            vec![0.02, 0.02, 0.02],
            vec![0.02, f64::INFINITY, 0.02],
        ])
        .unwrap();
        let releases = policy(&[0.05, 0.05, 0.05]);

        assert!(sim.trajectory(&releases, inflows.trial(0), 0).is_ok());
        let err = sim.trajectory(&releases, inflows.trial(1), 4).unwrap_err();
        assert!(matches!(
            err,
            LakeError::Simulation(SimulationError::NonFiniteState { trial: 4, year: 1, .. })
        ));
    }

    #[test]
    fn test_wrong_policy_length_rejected() {
        let params = LakeParameters::default();
        let sim = simulator(&params, 4, 1);
        let inflows = ConstantInflow(0.0).generate(0, 1, 4).unwrap();
        assert!(matches!(
            sim.run(&policy(&[0.05; 3]), &inflows),
            Err(LakeError::Input(InputError::WrongLength {
                expected: 4,
                actual: 3
            }))
        ));
    }
}
