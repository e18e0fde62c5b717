//! Critical threshold: the nontrivial root of `x^q / (1 + x^q) = b·x`
//!
//! Above this concentration sediment recycling outpaces natural loss and the
//! lake drifts toward the eutrophic equilibrium. `x = 0` always solves the
//! equation, so Newton iterates on the residual divided by `x` instead.

use lake_common::{LakeParameters, Result, SolverError};
use tracing::debug;

/// Newton-Raphson solver for the critical threshold
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSolver {
    initial_guess: f64,
    tolerance: f64,
    residual_tolerance: f64,
    max_iterations: usize,
}

impl Default for ThresholdSolver {
    fn default() -> Self {
        Self {
            initial_guess: 0.5,
            tolerance: 1e-13,
            residual_tolerance: 1e-10,
            max_iterations: 100,
        }
    }
}

impl ThresholdSolver {
    pub fn new(initial_guess: f64, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            initial_guess,
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// `x^q / (1 + x^q) − b·x`
    #[inline]
    pub fn residual(params: &LakeParameters, x: f64) -> f64 {
        params.recycling(x) - params.b * x
    }

    /// Residual with the trivial root divided out: `x^(q-1) / (1 + x^q) − b`
    #[inline]
    fn deflated(params: &LakeParameters, x: f64) -> f64 {
        x.powf(params.q - 1.0) / (1.0 + x.powf(params.q)) - params.b
    }

    #[inline]
    fn deflated_derivative(params: &LakeParameters, x: f64) -> f64 {
        let xq = x.powf(params.q);
        x.powf(params.q - 2.0) * ((params.q - 1.0) - xq) / (1.0 + xq).powi(2)
    }

    /// Solve for the critical threshold. Deterministic for fixed parameters.
    pub fn solve(&self, params: &LakeParameters) -> Result<f64> {
        let mut x = self.initial_guess;

        for iteration in 1..=self.max_iterations {
            let g = Self::deflated(params, x);
            let dg = Self::deflated_derivative(params, x);
            if !dg.is_finite() || dg.abs() < f64::EPSILON {
                return Err(SolverError::SingularDerivative { estimate: x }.into());
            }

            let mut next = x - g / dg;
            if !next.is_finite() {
                return Err(SolverError::NonFinite { estimate: next }.into());
            }
            // Stay on the positive axis; x^(q-2) is undefined below zero
            if next <= 0.0 {
                next = x / 2.0;
            }

            let step = (next - x).abs();
            x = next;
            if step <= self.tolerance * (1.0 + x.abs()) {
                debug!(iterations = iteration, root = x, "critical threshold converged");
                return self.verify(params, x);
            }
        }

        Err(SolverError::NonConvergence {
            iterations: self.max_iterations,
            last_estimate: x,
            residual: Self::residual(params, x),
        }
        .into())
    }

    fn verify(&self, params: &LakeParameters, x: f64) -> Result<f64> {
        if x <= self.tolerance.sqrt() {
            return Err(SolverError::TrivialRoot { estimate: x }.into());
        }
        let residual = Self::residual(params, x);
        if !(residual.abs() <= self.residual_tolerance) {
            return Err(SolverError::ResidualTooLarge { root: x, residual }.into());
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lake_common::LakeError;
    use proptest::prelude::*;

    fn lake(q: f64, b: f64) -> LakeParameters {
        LakeParameters {
            q,
            b,
            ..LakeParameters::default()
        }
    }

    /// Smaller positive root for q = 2: b·x² − x + b = 0
    fn quadratic_root(b: f64) -> f64 {
        (1.0 - (1.0 - 4.0 * b * b).sqrt()) / (2.0 * b)
    }

    #[test]
    fn test_default_lake_threshold() {
        let params = LakeParameters::default();
        let x = ThresholdSolver::default().solve(&params).unwrap();
        assert!((x - quadratic_root(0.42)).abs() < 1e-10);
        assert!((x - 0.5445).abs() < 1e-3);
        assert!(ThresholdSolver::residual(&params, x).abs() < 1e-12);
    }

    #[test]
    fn test_linear_recycling_closed_form() {
        // q = 1: 1 / (1 + x) = b
        let params = lake(1.0, 0.25);
        let x = ThresholdSolver::default().solve(&params).unwrap();
        assert!((x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_solver_is_deterministic() {
        let params = LakeParameters::default();
        let solver = ThresholdSolver::default();
        let a = solver.solve(&params).unwrap();
        let b = solver.solve(&params).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_no_nontrivial_root_fails() {
        // For q = 2 and b > 0.5 the only root is x = 0
        let err = ThresholdSolver::default().solve(&lake(2.0, 0.8)).unwrap_err();
        assert!(matches!(err, LakeError::Solver(_)));
    }

    #[test]
    fn test_iteration_budget_reported() {
        let solver = ThresholdSolver::new(0.5, 0.0, 3);
        let err = solver.solve(&LakeParameters::default()).unwrap_err();
        assert!(matches!(
            err,
            LakeError::Solver(SolverError::NonConvergence { iterations: 3, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_quadratic_lakes_hit_lower_root(b in 0.25f64..0.48) {
            let params = lake(2.0, b);
            let x = ThresholdSolver::default().solve(&params).unwrap();
            prop_assert!(x > 0.0);
            prop_assert!(ThresholdSolver::residual(&params, x).abs() < 1e-10);
            prop_assert!((x - quadratic_root(b)).abs() < 1e-8);
        }

        #[test]
        fn prop_any_returned_root_is_a_fixed_point(q in 1.5f64..4.0, b in 0.05f64..0.6) {
            let params = lake(q, b);
            if let Ok(x) = ThresholdSolver::default().solve(&params) {
                prop_assert!(x > 0.0);
                prop_assert!(ThresholdSolver::residual(&params, x).abs() < 1e-10);
            }
        }
    }
}
