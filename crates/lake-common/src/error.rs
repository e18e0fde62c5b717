//! Error types for the lake study
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using LakeError
pub type Result<T> = std::result::Result<T, LakeError>;

/// Unified error type for lake study operations
#[derive(Debug, Error)]
pub enum LakeError {
    // Critical-threshold root finding
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    // State recurrence and objective reduction
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    // Decision vector and parameter validation
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Result-set and summary persistence
    #[error("Storage error: {0}")]
    Storage(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Critical-threshold solver errors
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Root finding did not converge after {iterations} iterations (x={last_estimate}, residual={residual})")]
    NonConvergence {
        iterations: usize,
        last_estimate: f64,
        residual: f64,
    },

    #[error("Root finding collapsed onto the trivial root x={estimate}")]
    TrivialRoot { estimate: f64 },

    #[error("Derivative vanished at x={estimate}")]
    SingularDerivative { estimate: f64 },

    #[error("Root finding produced a non-finite estimate: {estimate}")]
    NonFinite { estimate: f64 },

    #[error("Root {root} fails the fixed-point check: residual {residual}")]
    ResidualTooLarge { root: f64, residual: f64 },
}

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Lake state became non-finite in trial {trial}, year {year}: {value}")]
    NonFiniteState { trial: usize, year: usize, value: f64 },

    #[error("Objective {index} is non-finite: {value}")]
    NonFiniteObjective { index: usize, value: f64 },
}

/// Input validation errors
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Decision vector has wrong length: expected {expected}, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("Decision vector component {index} is non-finite: {value}")]
    NonFiniteComponent { index: usize, value: f64 },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl InputError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        InputError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for LakeError {
    fn from(err: serde_json::Error) -> Self {
        LakeError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LakeError {
    fn from(err: std::io::Error) -> Self {
        LakeError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for LakeError {
    fn from(err: anyhow::Error) -> Self {
        LakeError::Internal(err.to_string())
    }
}
