//! Study configuration

use std::path::PathBuf;
use std::str::FromStr;

use lake_common::{LakeError, Result};
use lake_model::ModelConfig;
use serde::{Deserialize, Serialize};

/// Study-wide settings: the fixed model plus the run orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Lake model, fixed for every run
    pub model: ModelConfig,
    /// Independent optimization runs, seeded 0..n_seeds
    pub n_seeds: u64,
    /// Evaluation budget per run
    pub max_evaluations: usize,
    /// Candidates evaluated in parallel per batch
    pub batch_size: usize,
    /// Directory receiving `{seed+1}.set` files
    pub output_dir: PathBuf,
    /// Study summary JSON; relative paths resolve under `output_dir`
    pub summary: PathBuf,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            n_seeds: lake_common::N_SEEDS,
            max_evaluations: lake_common::MAX_EVALUATIONS,
            batch_size: crate::DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from(crate::DEFAULT_OUTPUT_DIR),
            summary: PathBuf::from(crate::DEFAULT_SUMMARY_FILE),
        }
    }
}

impl StudyConfig {
    /// Load configuration from `.env` and `LAKE_*` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        // Orchestration
        override_with(&lookup, "LAKE_N_SEEDS", &mut cfg.n_seeds)?;
        override_with(&lookup, "LAKE_MAX_EVALUATIONS", &mut cfg.max_evaluations)?;
        override_with(&lookup, "LAKE_BATCH_SIZE", &mut cfg.batch_size)?;
        if let Some(dir) = lookup("LAKE_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }
        if let Some(summary) = lookup("LAKE_SUMMARY") {
            cfg.summary = PathBuf::from(summary);
        }

        // Model
        override_with(&lookup, "LAKE_N_YEARS", &mut cfg.model.n_years)?;
        override_with(&lookup, "LAKE_N_SAMPLES", &mut cfg.model.n_samples)?;
        override_with(
            &lookup,
            "LAKE_RELIABILITY_THRESHOLD",
            &mut cfg.model.reliability_threshold,
        )?;
        override_with(&lookup, "LAKE_INERTIA_THRESHOLD", &mut cfg.model.inertia_threshold)?;
        override_with(&lookup, "LAKE_B", &mut cfg.model.lake.b)?;
        override_with(&lookup, "LAKE_Q", &mut cfg.model.lake.q)?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.model
            .validate()
            .map_err(|e| LakeError::Config(e.to_string()))?;
        if self.n_seeds == 0 {
            return Err(LakeError::Config("n_seeds must be at least 1".into()));
        }
        if self.max_evaluations == 0 {
            return Err(LakeError::Config("max_evaluations must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(LakeError::Config("batch_size must be at least 1".into()));
        }
        if self.summary.as_os_str().is_empty() {
            return Err(LakeError::Config("summary path must not be empty".into()));
        }
        Ok(())
    }

    /// Where the study summary is written
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary)
    }
}

fn override_with<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| LakeError::Config(format!("{} has invalid value {:?}", key, raw)))?;
    }
    Ok(())
}
