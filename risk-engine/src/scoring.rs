//! Risk scoring engine

use crate::details::IntakeDetails;
use crate::frameworks;
use crate::weights::{ScoringWeights, WeightConfig};
use crate::{Framework, FrameworkScores, RiskAssessment, Result};

/// Multi-framework risk scorer
///
/// Holds only the validated weight table, so a single instance can be
/// shared across threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct RiskScoringEngine {
    weights: ScoringWeights,
}

impl RiskScoringEngine {
    /// Create engine from a configured weight table
    ///
    /// Fails with [`crate::Error::Configuration`] if the table is invalid.
    pub fn new(config: &WeightConfig) -> Result<Self> {
        let weights = ScoringWeights::new(config)?;
        Ok(Self::with_weights(weights))
    }

    /// Create engine from an already validated table
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Weight table in use
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score intake details
    ///
    /// Total over any details, including empty or malformed ones.
    pub fn score(&self, details: &IntakeDetails) -> RiskAssessment {
        let mut scores = FrameworkScores::default();
        let mut factors = Vec::new();

        for framework in Framework::ALL {
            let evaluation = frameworks::evaluate(framework, details);
            match framework {
                Framework::Nist => scores.nist = evaluation.score,
                Framework::Soc2 => scores.soc2 = evaluation.score,
                Framework::Sox => scores.sox = evaluation.score,
                Framework::Owasp => scores.owasp = evaluation.score,
                Framework::Maestro => scores.maestro = evaluation.score,
            }
            factors.extend(evaluation.factors);
        }

        let total = self.weights.weighted_total(&scores);

        tracing::debug!(
            nist = scores.nist.value(),
            soc2 = scores.soc2.value(),
            sox = scores.sox.value(),
            owasp = scores.owasp.value(),
            maestro = scores.maestro.value(),
            total = total.value(),
            factor_count = factors.len(),
            "Risk assessment computed"
        );

        RiskAssessment {
            scores,
            total,
            factors,
        }
    }
}
