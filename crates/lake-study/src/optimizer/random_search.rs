//! Baseline optimizer: seeded sampling with archive-guided perturbation
//!
//! Candidates are drawn sequentially from one ChaCha8 stream, evaluated as a
//! batch on the rayon pool, then offered to the archive in draw order. The
//! outcome therefore does not depend on the number of worker threads.

use lake_common::{LakeError, Result};
use lake_model::Problem;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{Optimizer, RunOutcome};
use crate::archive::{EpsilonArchive, Solution};

/// Random search over the decision bounds
#[derive(Debug, Clone)]
pub struct RandomSearch {
    max_evaluations: usize,
    batch_size: usize,
    /// Probability of perturbing an archive member instead of sampling uniformly
    perturbation_rate: f64,
    /// Perturbation standard deviation as a fraction of each variable's range
    perturbation_scale: f64,
}

impl RandomSearch {
    pub fn new(max_evaluations: usize, batch_size: usize) -> Self {
        Self {
            max_evaluations,
            batch_size: batch_size.max(1),
            perturbation_rate: 0.5,
            perturbation_scale: 0.1,
        }
    }

    pub fn with_perturbation(mut self, rate: f64, scale: f64) -> Self {
        self.perturbation_rate = rate.clamp(0.0, 1.0);
        self.perturbation_scale = scale.max(0.0);
        self
    }

    fn sample_uniform(rng: &mut ChaCha8Rng, bounds: &[(f64, f64)]) -> Vec<f64> {
        bounds
            .iter()
            .map(|&(lo, hi)| if hi > lo { rng.gen_range(lo..=hi) } else { lo })
            .collect()
    }

    fn perturb(
        &self,
        rng: &mut ChaCha8Rng,
        parent: &[f64],
        bounds: &[(f64, f64)],
    ) -> Result<Vec<f64>> {
        let noise = Normal::new(0.0, 1.0)
            .map_err(|e| LakeError::Internal(format!("perturbation distribution: {}", e)))?;
        Ok(parent
            .iter()
            .zip(bounds)
            .map(|(&x, &(lo, hi))| {
                let step = noise.sample(rng) * self.perturbation_scale * (hi - lo);
                (x + step).clamp(lo, hi)
            })
            .collect())
    }

    fn next_candidate(
        &self,
        rng: &mut ChaCha8Rng,
        archive: &EpsilonArchive,
        bounds: &[(f64, f64)],
    ) -> Result<Vec<f64>> {
        if !archive.is_empty() && rng.gen_bool(self.perturbation_rate) {
            let parent = &archive.members()[rng.gen_range(0..archive.len())];
            self.perturb(rng, &parent.variables, bounds)
        } else {
            Ok(Self::sample_uniform(rng, bounds))
        }
    }
}

impl Optimizer for RandomSearch {
    fn solve(&mut self, problem: &dyn Problem, seed: u64) -> Result<RunOutcome> {
        let bounds = problem.bounds();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut archive = EpsilonArchive::new(problem.epsilons().to_vec());
        let mut evaluations = 0usize;
        let mut failures = 0usize;

        info!(
            seed,
            nvars = problem.nvars(),
            budget = self.max_evaluations,
            "starting random search"
        );

        while evaluations < self.max_evaluations {
            let n = self.batch_size.min(self.max_evaluations - evaluations);
            let candidates = (0..n)
                .map(|_| self.next_candidate(&mut rng, &archive, &bounds))
                .collect::<Result<Vec<_>>>()?;

            let results: Vec<_> = candidates
                .into_par_iter()
                .map(|vars| {
                    let result = problem.evaluate(&vars, seed);
                    (vars, result)
                })
                .collect();
            evaluations += n;

            for (vars, result) in results {
                match result {
                    Ok(evaluation) => {
                        archive.add(Solution::new(vars, evaluation));
                    }
                    // Threshold failures mean the problem itself is broken
                    Err(err @ LakeError::Solver(_)) => return Err(err),
                    Err(err) => {
                        failures += 1;
                        warn!(seed, error = %err, "evaluation failed; candidate discarded");
                    }
                }
            }

            debug!(seed, evaluations, archive = archive.len(), "batch complete");
        }

        info!(
            seed,
            evaluations,
            failures,
            archive = archive.len(),
            "random search finished"
        );
        Ok(RunOutcome {
            solutions: archive.into_members(),
            evaluations,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lake_common::{Evaluation, InputError, SimulationError};

    /// Two-objective toy: f0 = mean(x), f1 = mean(1 - x)
    struct Toy {
        epsilons: Vec<f64>,
    }

    impl Toy {
        fn new() -> Self {
            Self {
                epsilons: vec![0.05, 0.05],
            }
        }
    }

    impl Problem for Toy {
        fn nvars(&self) -> usize {
            3
        }
        fn nobjs(&self) -> usize {
            2
        }
        fn nconstrs(&self) -> usize {
            1
        }
        fn bounds(&self) -> Vec<(f64, f64)> {
            vec![(0.0, 1.0); 3]
        }
        fn epsilons(&self) -> &[f64] {
            &self.epsilons
        }
        fn evaluate(&self, vars: &[f64], _seed: u64) -> Result<Evaluation> {
            if vars.len() != 3 {
                return Err(InputError::WrongLength {
                    expected: 3,
                    actual: vars.len(),
                }
                .into());
            }
            let mean = vars.iter().sum::<f64>() / 3.0;
            if mean > 0.9 {
                return Err(SimulationError::NonFiniteState {
                    trial: 0,
                    year: 0,
                    value: f64::NAN,
                }
                .into());
            }
            Ok(Evaluation::new(vec![mean, 1.0 - mean], vec![0.0]))
        }
    }

    #[test]
    fn test_respects_budget() {
        let outcome = RandomSearch::new(250, 40).solve(&Toy::new(), 1).unwrap();
        assert_eq!(outcome.evaluations, 250);
        assert!(!outcome.solutions.is_empty());
    }

    #[test]
    fn test_candidates_stay_in_bounds() {
        let outcome = RandomSearch::new(300, 50)
            .with_perturbation(1.0, 5.0)
            .solve(&Toy::new(), 4)
            .unwrap();
        for s in &outcome.solutions {
            assert!(s.variables.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let a = RandomSearch::new(200, 32).solve(&Toy::new(), 7).unwrap();
        let b = RandomSearch::new(200, 32).solve(&Toy::new(), 7).unwrap();
        assert_eq!(a.solutions, b.solutions);
        assert_eq!(a.failures, b.failures);
    }

    #[test]
    fn test_failed_evaluations_are_counted_not_archived() {
        let outcome = RandomSearch::new(500, 100).solve(&Toy::new(), 2).unwrap();
        assert!(outcome.failures < outcome.evaluations);
        for s in &outcome.solutions {
            assert!(s.evaluation.is_finite());
        }
    }
}
