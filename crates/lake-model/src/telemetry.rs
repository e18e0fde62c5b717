//! Evaluation metrics (Prometheus)
//!
//! Counting happens around the evaluation function, never inside it, so the
//! recorded metrics cannot influence objective values.

use lake_common::{Evaluation, LakeError, Result};
use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

use crate::problem::Problem;

/// Counters and latency histogram for evaluation calls
#[derive(Clone)]
pub struct EvaluationMetrics {
    evaluations: IntCounter,
    failures: IntCounter,
    duration: Histogram,
}

impl EvaluationMetrics {
    /// Create the metrics and register them on `registry`
    pub fn register(registry: &Registry) -> Result<Self> {
        let evaluations = IntCounter::new("lake_evaluations_total", "Policy evaluations performed")
            .map_err(metrics_error)?;
        let failures = IntCounter::new(
            "lake_evaluation_failures_total",
            "Policy evaluations that returned an error",
        )
        .map_err(metrics_error)?;
        let duration = Histogram::with_opts(
            HistogramOpts::new("lake_evaluation_seconds", "Wall time of one policy evaluation")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(evaluations.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(failures.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(duration.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            evaluations,
            failures,
            duration,
        })
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    pub fn failures(&self) -> u64 {
        self.failures.get()
    }
}

fn metrics_error(err: prometheus::Error) -> LakeError {
    LakeError::Internal(format!("metrics: {}", err))
}

/// Wraps a problem and records every evaluation
pub struct InstrumentedProblem<P> {
    inner: P,
    metrics: EvaluationMetrics,
}

impl<P: Problem> InstrumentedProblem<P> {
    pub fn new(inner: P, metrics: EvaluationMetrics) -> Self {
        Self { inner, metrics }
    }

    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.metrics
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Problem> Problem for InstrumentedProblem<P> {
    fn nvars(&self) -> usize {
        self.inner.nvars()
    }

    fn nobjs(&self) -> usize {
        self.inner.nobjs()
    }

    fn nconstrs(&self) -> usize {
        self.inner.nconstrs()
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        self.inner.bounds()
    }

    fn epsilons(&self) -> &[f64] {
        self.inner.epsilons()
    }

    fn evaluate(&self, vars: &[f64], seed: u64) -> Result<Evaluation> {
        let timer = self.metrics.duration.start_timer();
        let result = self.inner.evaluate(vars, seed);
        timer.observe_duration();

        self.metrics.evaluations.inc();
        if result.is_err() {
            self.metrics.failures.inc();
        }
        result
    }
}
