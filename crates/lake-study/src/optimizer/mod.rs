//! Optimizer seam
//!
//! The study treats the search procedure as a black box that repeatedly
//! calls [`Problem::evaluate`] with its run seed.

pub mod random_search;

use lake_common::Result;
use lake_model::Problem;

use crate::archive::Solution;

pub use self::random_search::RandomSearch;

/// What one optimization run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Final approximation set
    pub solutions: Vec<Solution>,
    /// Evaluation calls made
    pub evaluations: usize,
    /// Calls that returned an error and were discarded
    pub failures: usize,
}

/// A multi-objective search procedure
pub trait Optimizer {
    /// Search `problem` for one run; every evaluation is made with `seed`
    fn solve(&mut self, problem: &dyn Problem, seed: u64) -> Result<RunOutcome>;
}
