//! Intake request and score records
//!
//! Requests carry the free-form details bag and are stored as JSON. Score
//! records have a fixed shape and are stored with bincode.

use chrono::{DateTime, Utc};
use risk_engine::{
    FrameworkScore, FrameworkScores, IntakeDetails, RiskAssessment, RiskFactor, RiskLevel,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Review lifecycle of an intake request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Being drafted by the requestor
    #[default]
    Draft,
    /// Submitted for review
    Submitted,
    /// Review tasks open
    Reviewing,
    /// All reviews approved
    Approved,
    /// Rejected by a reviewer
    Denied,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Submitted => "submitted",
            RequestStatus::Reviewing => "reviewing",
            RequestStatus::Approved => "approved",
            RequestStatus::Denied => "denied",
        };
        f.write_str(s)
    }
}

/// Intake request as submitted by a requestor
///
/// Known top-level fields are lifted out; every other answer lands in
/// `details`.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeSubmission {
    /// Caller-chosen identity, generated if absent
    #[serde(default)]
    pub id: Option<Uuid>,

    /// Tool name
    pub title: String,

    /// Free text description
    #[serde(default)]
    pub description: String,

    /// Submitting user
    #[serde(default)]
    pub requestor_id: String,

    /// Remaining answers
    #[serde(flatten)]
    pub details: IntakeDetails,
}

/// Stored intake request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// Request ID
    pub id: Uuid,

    /// Tool name
    pub title: String,

    /// Free text description
    pub description: String,

    /// Submitting user
    pub requestor_id: String,

    /// Review status
    pub status: RequestStatus,

    /// Intake answers
    pub details: IntakeDetails,

    /// Latest weighted total, set when a score is computed
    pub risk_score: Option<u8>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl IntakeRequest {
    /// New draft request
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        requestor_id: impl Into<String>,
        details: IntakeDetails,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            requestor_id: requestor_id.into(),
            status: RequestStatus::Draft,
            details,
            risk_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a draft request from a flat submission
    pub fn from_submission(submission: IntakeSubmission) -> Self {
        let mut request = Self::new(
            submission.title,
            submission.description,
            submission.requestor_id,
            submission.details,
        );
        if let Some(id) = submission.id {
            request.id = id;
        }
        request
    }
}

/// Persisted risk score for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Record ID, stable across recomputes
    pub id: Uuid,

    /// Scored request
    pub request_id: Uuid,

    /// NIST AI RMF score
    pub nist_score: u8,

    /// SOC 2 score
    pub soc2_score: u8,

    /// SOX score
    pub sox_score: u8,

    /// OWASP LLM score
    pub owasp_score: u8,

    /// MAESTRO score
    pub maestro_score: u8,

    /// Weighted total
    pub total_score: u8,

    /// Rule branches that fired on the latest compute
    pub factors: Vec<RiskFactor>,

    /// First compute
    pub created_at: DateTime<Utc>,

    /// Latest compute
    pub updated_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// First record for a request
    pub fn new(request_id: Uuid, assessment: &RiskAssessment, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            request_id,
            nist_score: 0,
            soc2_score: 0,
            sox_score: 0,
            owasp_score: 0,
            maestro_score: 0,
            total_score: 0,
            factors: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        record.apply(assessment, now);
        record
    }

    /// Overwrite scores in place with a fresh assessment
    pub fn apply(&mut self, assessment: &RiskAssessment, now: DateTime<Utc>) {
        let scores = &assessment.scores;
        self.nist_score = scores.nist.value();
        self.soc2_score = scores.soc2.value();
        self.sox_score = scores.sox.value();
        self.owasp_score = scores.owasp.value();
        self.maestro_score = scores.maestro.value();
        self.total_score = assessment.total.value();
        self.factors = assessment.factors.clone();
        self.updated_at = now;
    }

    /// Per-framework scores
    pub fn scores(&self) -> FrameworkScores {
        FrameworkScores {
            nist: FrameworkScore::new(self.nist_score),
            soc2: FrameworkScore::new(self.soc2_score),
            sox: FrameworkScore::new(self.sox_score),
            owasp: FrameworkScore::new(self.owasp_score),
            maestro: FrameworkScore::new(self.maestro_score),
        }
    }

    /// Reviewer-facing band of the total
    pub fn risk_level(&self) -> RiskLevel {
        FrameworkScore::new(self.total_score).level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::RiskScoringEngine;
    use serde_json::json;

    #[test]
    fn test_submission_splits_details() {
        let submission: IntakeSubmission = serde_json::from_value(json!({
            "title": "Support bot",
            "description": "Answers tickets",
            "requestor_id": "user-1",
            "use_case": "Chatbot",
            "data_types": ["PII"],
        }))
        .unwrap();

        let request = IntakeRequest::from_submission(submission);
        assert_eq!(request.title, "Support bot");
        assert_eq!(request.status, RequestStatus::Draft);
        assert_eq!(request.details.len(), 2);
        assert_eq!(request.details.text("use_case"), "Chatbot");
        assert!(request.details.get("title").is_none());
        assert!(request.risk_score.is_none());
    }

    #[test]
    fn test_record_apply_keeps_identity() {
        let engine = RiskScoringEngine::default();
        let created = Utc::now();
        let request_id = Uuid::new_v4();

        let first = engine.score(&IntakeDetails::new());
        let mut record = ScoreRecord::new(request_id, &first, created);
        let record_id = record.id;
        assert_eq!(record.total_score, 0);

        let details = IntakeDetails::new().with("data_types", json!(["Financial"]));
        let later = created + chrono::Duration::seconds(5);
        record.apply(&engine.score(&details), later);

        assert_eq!(record.id, record_id);
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
        assert_eq!(record.sox_score, 50);
        assert_eq!(record.scores().sox.value(), 50);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let value = serde_json::to_value(RequestStatus::Reviewing).unwrap();
        assert_eq!(value, json!("reviewing"));
    }
}
