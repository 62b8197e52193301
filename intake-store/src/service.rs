//! Score computation orchestration
//!
//! Resolves a request, runs the scoring engine, and writes the score record
//! together with the request's `risk_score` summary. The commit only lands
//! if the request's details are still the ones that were scored; an edit in
//! between fails the compute with [`Error::StaleRequest`] and leaves the
//! edit in place.
//!
//! # Concurrency
//!
//! The engine is pure and needs no locking. Recomputes for the same request
//! are serialized through a per-request async mutex, so two callers can
//! never both observe "no existing score" and race to create one, and a
//! stale compute can never overwrite a newer one. Different requests are
//! scored in parallel.

use crate::metrics::Metrics;
use crate::store::IntakeStore;
use crate::types::ScoreRecord;
use crate::{Error, Result};
use chrono::Utc;
use dashmap::DashMap;
use risk_engine::{RiskAssessment, RiskScoringEngine};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Computes and persists risk scores
pub struct ScoringService<S> {
    engine: RiskScoringEngine,
    store: Arc<S>,
    // Map: request_id -> compute lock
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    metrics: Metrics,
}

impl<S: IntakeStore> ScoringService<S> {
    /// Create service over a store
    pub fn new(engine: RiskScoringEngine, store: Arc<S>) -> Result<Self> {
        Ok(Self {
            engine,
            store,
            locks: DashMap::new(),
            metrics: Metrics::new()?,
        })
    }

    /// Compute, persist and return the score for a request
    ///
    /// Creates the score record on first compute and overwrites it in place
    /// afterwards. Fails with [`Error::RequestNotFound`] for an unknown id.
    pub async fn compute(&self, request_id: Uuid) -> Result<ScoreRecord> {
        let lock = self.lock_for(request_id);
        let _guard = lock.lock().await;

        let timer = self.metrics.compute_duration.start_timer();
        let result = self.compute_locked(request_id);
        timer.observe_duration();

        // Drop the lock entry unless another caller is already waiting on it
        self.locks
            .remove_if(&request_id, |_, entry| Arc::strong_count(entry) <= 2);

        result
    }

    /// Score a request without persisting anything
    pub fn assess(&self, request_id: Uuid) -> Result<RiskAssessment> {
        let request = self.store.get_request(request_id)?;
        Ok(self.engine.score(&request.details))
    }

    /// Stored score for a request
    ///
    /// Fails with [`Error::ScoreNotFound`] until the first compute.
    pub fn get_score(&self, request_id: Uuid) -> Result<ScoreRecord> {
        self.store
            .get_score(request_id)?
            .ok_or(Error::ScoreNotFound(request_id))
    }

    /// Scoring engine in use
    pub fn engine(&self) -> &RiskScoringEngine {
        &self.engine
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Service metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn lock_for(&self, request_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(request_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    fn compute_locked(&self, request_id: Uuid) -> Result<ScoreRecord> {
        let request = match self.store.get_request(request_id) {
            Ok(request) => request,
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(%request_id, "Score requested for unknown request");
                }
                return Err(err);
            }
        };

        let assessment = self.engine.score(&request.details);
        let now = Utc::now();

        let (record, created) = match self.store.get_score(request_id)? {
            Some(mut existing) => {
                existing.apply(&assessment, now);
                (existing, false)
            }
            None => (ScoreRecord::new(request_id, &assessment, now), true),
        };

        if let Err(err) = self.store.commit_score(&request.details, &record) {
            if matches!(err, Error::StaleRequest(_)) {
                tracing::warn!(%request_id, "Request edited during compute, score discarded");
            }
            return Err(err);
        }
        self.metrics.record_compute(created, record.total_score);

        tracing::info!(
            %request_id,
            score_id = %record.id,
            total = record.total_score,
            level = %record.risk_level(),
            created,
            "Risk score committed"
        );

        Ok(record)
    }
}

impl<S> std::fmt::Debug for ScoringService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringService")
            .field("engine", &self.engine)
            .field("pending_locks", &self.locks.len())
            .finish()
    }
}
