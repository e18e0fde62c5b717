//! # Lake Study
//!
//! Orchestration around the lake evaluation function: one independent
//! optimization run per seed, each persisted as a result-set file.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 StudyRunner                  │
//! │   for seed in 0..n_seeds                     │
//! │  ┌───────────────┐      ┌─────────────────┐  │
//! │  │   Optimizer   │─────▶│ Problem (core)  │  │
//! │  │ + Epsilon     │◀─────│ evaluate(x, s)  │  │
//! │  │   Archive     │      └─────────────────┘  │
//! │  └───────┬───────┘                           │
//! │          ▼                                   │
//! │   {seed+1}.set  +  summary.json              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The core never sees files, seeds beyond its own argument, or the search
//! state; the optimizer never sees the lake.

pub mod archive;
pub mod config;
pub mod optimizer;
pub mod result_set;
pub mod runner;

pub use archive::{EpsilonArchive, Solution};
pub use config::StudyConfig;
pub use optimizer::{Optimizer, RandomSearch, RunOutcome};
pub use result_set::{read_result_set, write_result_set, ResultRow};
pub use runner::{SeedSummary, StudyRunner, StudySummary};

/// Study version
pub const STUDY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default candidates evaluated in parallel per batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default output directory for result sets
pub const DEFAULT_OUTPUT_DIR: &str = "sets";

/// Default study summary file, relative to the output directory
pub const DEFAULT_SUMMARY_FILE: &str = "summary.json";
