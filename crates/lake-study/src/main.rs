//! Lake Study Binary
//!
//! Runs the seeded policy search and writes one result set per seed

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lake_model::{EvaluationMetrics, InstrumentedProblem, LakeProblem};
use lake_study::{RandomSearch, StudyConfig, StudyRunner, STUDY_VERSION};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting lake study v{}", STUDY_VERSION);

    // Load configuration
    let config = StudyConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    // Solving the critical threshold happens here; failure aborts the study
    let problem = LakeProblem::new(config.model.clone())?;
    info!(
        "Critical threshold: {:.6} ({})",
        problem.critical_threshold(),
        config.model.lake
    );

    let registry = Registry::new();
    let metrics = EvaluationMetrics::register(&registry)?;
    let problem = InstrumentedProblem::new(problem, metrics);

    let mut optimizer = RandomSearch::new(config.max_evaluations, config.batch_size);
    let summary = StudyRunner::new(&config, &problem).run(&mut optimizer)?;

    for run in &summary.runs {
        info!(
            "seed {}: {} solutions ({} feasible), {} evaluations, {} failures",
            run.seed, run.archive_size, run.feasible, run.evaluations, run.failures
        );
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    info!("Evaluation metrics:\n{}", String::from_utf8_lossy(&buffer));

    Ok(())
}
