//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `intake_score_computations_total` - Completed score computations
//! - `intake_score_records_created_total` - First computes for a request
//! - `intake_score_records_updated_total` - Recomputes overwriting a record
//! - `intake_score_compute_duration_seconds` - Resolve + score + commit latency
//! - `intake_score_total` - Distribution of weighted totals

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Completed computations
    pub computations_total: IntCounter,

    /// Records created
    pub records_created: IntCounter,

    /// Records overwritten
    pub records_updated: IntCounter,

    /// Compute duration histogram
    pub compute_duration: Histogram,

    /// Weighted total histogram
    pub total_score: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create metrics on a private registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let computations_total = IntCounter::new(
            "intake_score_computations_total",
            "Completed risk score computations",
        )?;
        registry.register(Box::new(computations_total.clone()))?;

        let records_created = IntCounter::new(
            "intake_score_records_created_total",
            "Score records created on first compute",
        )?;
        registry.register(Box::new(records_created.clone()))?;

        let records_updated = IntCounter::new(
            "intake_score_records_updated_total",
            "Score records overwritten by a recompute",
        )?;
        registry.register(Box::new(records_updated.clone()))?;

        let compute_duration = Histogram::with_opts(
            HistogramOpts::new(
                "intake_score_compute_duration_seconds",
                "Latency of resolve, score and commit",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(compute_duration.clone()))?;

        let total_score = Histogram::with_opts(
            HistogramOpts::new("intake_score_total", "Weighted total risk score")
                .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
        )?;
        registry.register(Box::new(total_score.clone()))?;

        Ok(Self {
            computations_total,
            records_created,
            records_updated,
            compute_duration,
            total_score,
            registry,
        })
    }

    /// Record one committed computation
    pub fn record_compute(&self, created: bool, total: u8) {
        self.computations_total.inc();
        if created {
            self.records_created.inc();
        } else {
            self.records_updated.inc();
        }
        self.total_score.observe(total as f64);
    }
}
