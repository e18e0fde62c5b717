//! Inflow generation: `n_samples` independent trials of `n_years` draws each
//!
//! Trial `s` is drawn from its own ChaCha8 stream seeded with `base_seed + s`,
//! so the whole matrix is a pure function of the base seed. No generator
//! outlives a single call.

use lake_common::{InputError, LakeError, LakeParameters, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal};

/// Row-major `n_samples × n_years` matrix of inflows
#[derive(Debug, Clone, PartialEq)]
pub struct InflowMatrix {
    n_samples: usize,
    n_years: usize,
    values: Vec<f64>,
}

impl InflowMatrix {
    pub fn filled(n_samples: usize, n_years: usize, value: f64) -> Self {
        Self {
            n_samples,
            n_years,
            values: vec![value; n_samples * n_years],
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_samples = rows.len();
        let n_years = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_years) {
            return Err(InputError::invalid("inflow", "rows must have equal length").into());
        }
        Ok(Self {
            n_samples,
            n_years,
            values: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_years(&self) -> usize {
        self.n_years
    }

    /// Inflow sequence of one trial
    #[inline]
    pub fn trial(&self, s: usize) -> &[f64] {
        &self.values[s * self.n_years..(s + 1) * self.n_years]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Source of per-trial inflow sequences
pub trait InflowSource: Send + Sync {
    /// Produce the inflow matrix for one evaluation
    fn generate(&self, base_seed: u64, n_samples: usize, n_years: usize) -> Result<InflowMatrix>;
}

/// Log-normal inflow whose own mean and variance are `mu` and `sigma²`
#[derive(Debug, Clone, Copy)]
pub struct LogNormalInflow {
    distribution: LogNormal<f64>,
}

impl LogNormalInflow {
    pub fn new(params: &LakeParameters) -> Result<Self> {
        params.validate()?;
        let distribution = LogNormal::new(params.log_mean(), params.log_std_dev())
            .map_err(|e| LakeError::from(InputError::invalid("sigma", e.to_string())))?;
        Ok(Self { distribution })
    }

    /// Seed of trial `s`
    #[inline]
    pub fn trial_seed(base_seed: u64, s: usize) -> u64 {
        base_seed.wrapping_add(s as u64)
    }

    /// Draw the inflow sequence of a single trial
    pub fn sample_trial(&self, base_seed: u64, s: usize, out: &mut [f64]) {
        let mut rng = ChaCha8Rng::seed_from_u64(Self::trial_seed(base_seed, s));
        for slot in out.iter_mut() {
            *slot = self.distribution.sample(&mut rng);
        }
    }
}

impl InflowSource for LogNormalInflow {
    fn generate(&self, base_seed: u64, n_samples: usize, n_years: usize) -> Result<InflowMatrix> {
        let mut matrix = InflowMatrix::filled(n_samples, n_years, 0.0);
        if n_years == 0 {
            return Ok(matrix);
        }
        for (s, row) in matrix.values.chunks_mut(n_years).enumerate() {
            self.sample_trial(base_seed, s, row);
        }
        Ok(matrix)
    }
}

/// Same inflow every trial and year; zero gives a noiseless lake
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantInflow(pub f64);

impl InflowSource for ConstantInflow {
    fn generate(&self, _base_seed: u64, n_samples: usize, n_years: usize) -> Result<InflowMatrix> {
        Ok(InflowMatrix::filled(n_samples, n_years, self.0))
    }
}
