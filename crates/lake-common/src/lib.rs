//! # Lake Common
//!
//! Shared types, errors, and study constants for the lake pollution policy study.
//!
//! ## Core Types
//!
//! - [`LakeParameters`]: fixed lake and economic constants (`q`, `b`, `alpha`, `delta`, inflow moments)
//! - [`DecisionVector`]: one control release per planning year, as proposed by the optimizer
//! - [`Evaluation`]: objective and constraint vectors returned to the optimizer
//!
//! ## Errors
//!
//! - [`LakeError`]: unified error, wrapping [`SolverError`], [`SimulationError`] and [`InputError`]

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{InputError, LakeError, Result, SimulationError, SolverError};
pub use types::{
    decision::DecisionVector,
    evaluation::Evaluation,
    lake_params::LakeParameters,
};

/// Planning horizon in years
pub const N_YEARS: usize = 100;

/// Stochastic trials per evaluation
pub const N_SAMPLES: usize = 100;

/// Independent optimization runs per study
pub const N_SEEDS: u64 = 10;

/// Number of objectives
pub const N_OBJS: usize = 4;

/// Number of constraints
pub const N_CONSTRS: usize = 1;

/// Minimum acceptable reliability
pub const RELIABILITY_THRESHOLD: f64 = 0.85;

/// Largest tolerated year-over-year release change (negative: a decrease)
pub const INERTIA_THRESHOLD: f64 = -0.02;

/// Lower bound on every release value
pub const RELEASE_LOWER_BOUND: f64 = 0.01;

/// Upper bound on every release value
pub const RELEASE_UPPER_BOUND: f64 = 0.1;

/// Epsilon resolution per objective (benefit, phosphorus, inertia, reliability)
pub const OBJECTIVE_EPSILONS: [f64; N_OBJS] = [0.01, 0.01, 0.0001, 0.0001];

/// Evaluation budget per optimization run
pub const MAX_EVALUATIONS: usize = 50_000;
