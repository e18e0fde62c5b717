//! Epsilon-dominance archive
//!
//! Objective space is cut into boxes of side `epsilon`. At most one solution
//! survives per box, and no surviving box dominates another. Feasibility is
//! compared first: lower total violation always wins.

use lake_common::Evaluation;
use serde::{Deserialize, Serialize};

/// A decision vector together with its evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub variables: Vec<f64>,
    pub evaluation: Evaluation,
}

impl Solution {
    pub fn new(variables: Vec<f64>, evaluation: Evaluation) -> Self {
        Self {
            variables,
            evaluation,
        }
    }

    pub fn objectives(&self) -> &[f64] {
        &self.evaluation.objectives
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dominance {
    Dominates,
    Dominated,
    NonDominated,
    SameBox,
}

/// Nondominated archive at epsilon resolution
#[derive(Debug, Clone)]
pub struct EpsilonArchive {
    epsilons: Vec<f64>,
    members: Vec<Solution>,
}

impl EpsilonArchive {
    pub fn new(epsilons: Vec<f64>) -> Self {
        Self {
            epsilons,
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Solution> {
        self.members
    }

    /// Offer a candidate; returns true when it enters the archive
    pub fn add(&mut self, candidate: Solution) -> bool {
        for member in &self.members {
            match self.compare(&candidate, member) {
                Dominance::Dominated => return false,
                Dominance::SameBox if !self.closer_to_corner(&candidate, member) => return false,
                _ => {}
            }
        }

        self.members.retain(|member| {
            !matches!(
                Self::compare_with(&self.epsilons, &candidate, member),
                Dominance::Dominates | Dominance::SameBox
            )
        });
        self.members.push(candidate);
        true
    }

    fn compare(&self, a: &Solution, b: &Solution) -> Dominance {
        Self::compare_with(&self.epsilons, a, b)
    }

    fn compare_with(epsilons: &[f64], a: &Solution, b: &Solution) -> Dominance {
        let va = a.evaluation.violation();
        let vb = b.evaluation.violation();
        if va < vb {
            return Dominance::Dominates;
        }
        if va > vb {
            return Dominance::Dominated;
        }

        let mut a_better = false;
        let mut b_better = false;
        for ((&fa, &fb), &eps) in a.objectives().iter().zip(b.objectives()).zip(epsilons) {
            let ba = (fa / eps).floor();
            let bb = (fb / eps).floor();
            if ba < bb {
                a_better = true;
            } else if bb < ba {
                b_better = true;
            }
        }

        match (a_better, b_better) {
            (true, false) => Dominance::Dominates,
            (false, true) => Dominance::Dominated,
            (false, false) => Dominance::SameBox,
            (true, true) => Dominance::NonDominated,
        }
    }

    /// Within one box, prefer the point nearer the box's lower corner
    fn closer_to_corner(&self, a: &Solution, b: &Solution) -> bool {
        let distance = |s: &Solution| -> f64 {
            s.objectives()
                .iter()
                .zip(&self.epsilons)
                .map(|(&f, &eps)| {
                    let corner = (f / eps).floor() * eps;
                    ((f - corner) / eps).powi(2)
                })
                .sum()
        };
        distance(a) < distance(b)
    }
}
