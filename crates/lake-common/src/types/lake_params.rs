//! LakeParameters - fixed physical and economic constants of the lake
//!
//! The lake model is a shallow lake receiving phosphorus from controlled
//! releases and from natural runoff. Phosphorus decays linearly at rate `b`
//! and is recycled from sediment with a saturating feedback of steepness `q`.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Default recycling exponent
pub const DEFAULT_Q: f64 = 2.0;

/// Default loss rate
pub const DEFAULT_B: f64 = 0.42;

/// Default benefit scaling
pub const DEFAULT_ALPHA: f64 = 0.4;

/// Default annual discount factor
pub const DEFAULT_DELTA: f64 = 0.98;

/// Default mean of natural inflow
pub const DEFAULT_MU: f64 = 0.03;

/// Lake and economic constants, shared read-only by every evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LakeParameters {
    /// Recycling exponent
    pub q: f64,
    /// Natural loss rate
    pub b: f64,
    /// Benefit per unit of released phosphorus
    pub alpha: f64,
    /// Discount factor applied per year
    pub delta: f64,
    /// Mean of the log-normal natural inflow
    pub mu: f64,
    /// Standard deviation of the log-normal natural inflow
    pub sigma: f64,
}

impl Default for LakeParameters {
    fn default() -> Self {
        Self {
            q: DEFAULT_Q,
            b: DEFAULT_B,
            alpha: DEFAULT_ALPHA,
            delta: DEFAULT_DELTA,
            mu: DEFAULT_MU,
            sigma: 1e-5_f64.sqrt(),
        }
    }
}

impl LakeParameters {
    /// Reject parameters the model cannot be evaluated with
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("q", self.q),
            ("b", self.b),
            ("alpha", self.alpha),
            ("delta", self.delta),
            ("mu", self.mu),
            ("sigma", self.sigma),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(InputError::invalid(name, format!("must be finite, got {}", value)).into());
            }
        }
        if self.q <= 0.0 {
            return Err(InputError::invalid("q", "must be positive").into());
        }
        if self.b <= 0.0 {
            return Err(InputError::invalid("b", "must be positive").into());
        }
        if self.mu <= 0.0 {
            return Err(InputError::invalid("mu", "log-normal mean must be positive").into());
        }
        if self.sigma < 0.0 {
            return Err(InputError::invalid("sigma", "must be non-negative").into());
        }
        Ok(())
    }

    /// Mean of the underlying normal, chosen so the log-normal has mean `mu`
    #[inline]
    pub fn log_mean(&self) -> f64 {
        (self.mu.powi(2) / (self.mu.powi(2) + self.sigma.powi(2)).sqrt()).ln()
    }

    /// Standard deviation of the underlying normal, chosen so the log-normal has variance `sigma²`
    #[inline]
    pub fn log_std_dev(&self) -> f64 {
        ((self.sigma.powi(2) + self.mu.powi(2)) / self.mu.powi(2)).ln().sqrt()
    }

    /// Recycling feedback `x^q / (1 + x^q)`
    #[inline]
    pub fn recycling(&self, x: f64) -> f64 {
        let xq = x.powf(self.q);
        xq / (1.0 + xq)
    }
}

impl std::fmt::Display for LakeParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lake(q={}, b={}, alpha={}, delta={}, mu={}, sigma={:.6})",
            self.q, self.b, self.alpha, self.delta, self.mu, self.sigma
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LakeParameters::default().validate().is_ok());
    }

    #[test]
    fn test_log_moments_recover_mean() {
        let p = LakeParameters::default();
        let m = p.log_mean();
        let s = p.log_std_dev();
        let mean = (m + s * s / 2.0).exp();
        let var = ((s * s).exp() - 1.0) * (2.0 * m + s * s).exp();
        assert!((mean - p.mu).abs() < 1e-12);
        assert!((var - p.sigma.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sigma_is_degenerate() {
        let p = LakeParameters {
            sigma: 0.0,
            ..LakeParameters::default()
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.log_std_dev(), 0.0);
        assert!((p.log_mean().exp() - p.mu).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_non_positive_loss_rate() {
        let p = LakeParameters {
            b: 0.0,
            ..LakeParameters::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let p = LakeParameters {
            alpha: f64::NAN,
            ..LakeParameters::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_recycling_saturates() {
        let p = LakeParameters::default();
        assert_eq!(p.recycling(0.0), 0.0);
        assert!((p.recycling(1.0) - 0.5).abs() < 1e-15);
        assert!(p.recycling(1e6) > 0.999);
    }
}
