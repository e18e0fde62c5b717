//! Evaluation - what the optimizer receives for one candidate
//!
//! Objectives are all in minimization sign. A constraint value of exactly
//! zero is feasible; any positive value is the size of the violation.

use serde::{Deserialize, Serialize};

/// Objective and constraint vectors for one decision vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Objective values, minimized
    pub objectives: Vec<f64>,
    /// Constraint values, zero when satisfied
    pub constraints: Vec<f64>,
}

impl Evaluation {
    pub fn new(objectives: Vec<f64>, constraints: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints,
        }
    }

    /// True when every constraint is satisfied
    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|&c| c == 0.0)
    }

    /// Total constraint violation
    pub fn violation(&self) -> f64 {
        self.constraints.iter().map(|c| c.abs()).sum()
    }

    /// True when every objective and constraint is a finite number
    pub fn is_finite(&self) -> bool {
        self.objectives
            .iter()
            .chain(self.constraints.iter())
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility() {
        let ok = Evaluation::new(vec![-0.2, 0.3, -1.0, -1.0], vec![0.0]);
        assert!(ok.is_feasible());
        assert_eq!(ok.violation(), 0.0);

        let bad = Evaluation::new(vec![-0.2, 0.3, -1.0, -0.5], vec![0.35]);
        assert!(!bad.is_feasible());
        assert!((bad.violation() - 0.35).abs() < 1e-15);
    }

    #[test]
    fn test_finiteness() {
        let e = Evaluation::new(vec![f64::NAN], vec![0.0]);
        assert!(!e.is_finite());
    }
}
