//! Risk Engine for AI intake requests
//!
//! Deterministic, rule-based compliance risk scoring. Free-form intake
//! details are scored independently against five frameworks (NIST AI RMF,
//! SOC 2, SOX, OWASP LLM Top 10, MAESTRO) and combined into a weighted total.
//!
//! # Example
//!
//! ```
//! use risk_engine::{IntakeDetails, RiskScoringEngine, WeightConfig};
//!
//! let engine = RiskScoringEngine::new(&WeightConfig::default()).unwrap();
//! let details = IntakeDetails::new()
//!     .with("data_types", serde_json::json!(["PII"]))
//!     .with("deployment_type", "Cloud")
//!     .with("model_used", "GPT-4");
//!
//! let assessment = engine.score(&details);
//! assert_eq!(assessment.scores.nist.value(), 70);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod details;
pub mod error;
pub mod frameworks;
pub mod scoring;
pub mod types;
pub mod weights;

pub use details::IntakeDetails;
pub use error::{Error, Result};
pub use scoring::RiskScoringEngine;
pub use types::*;
pub use weights::{ScoringWeights, WeightConfig};
