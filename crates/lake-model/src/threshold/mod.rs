//! Critical phosphorus threshold
pub mod solver;

pub use self::solver::ThresholdSolver;
