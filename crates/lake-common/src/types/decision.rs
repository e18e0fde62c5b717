//! DecisionVector - a candidate release policy
//!
//! One control release per planning year. The optimizer keeps every
//! component inside its bounds; this type only checks shape and finiteness.

use crate::error::{InputError, Result};

/// Validated release policy
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVector {
    releases: Vec<f64>,
}

impl DecisionVector {
    /// Validate a raw decision vector against the expected horizon length
    pub fn new(releases: Vec<f64>, expected_len: usize) -> Result<Self> {
        Self::check(&releases, expected_len)?;
        Ok(Self { releases })
    }

    fn check(releases: &[f64], expected_len: usize) -> Result<()> {
        if releases.len() != expected_len {
            return Err(InputError::WrongLength {
                expected: expected_len,
                actual: releases.len(),
            }
            .into());
        }
        if let Some((index, &value)) = releases.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NonFiniteComponent { index, value }.into());
        }
        Ok(())
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.releases
    }
}
