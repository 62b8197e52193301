//! Core types for risk engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance framework scored by the engine
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Framework {
    /// NIST AI Risk Management Framework
    Nist,
    /// SOC 2 Trust Service Criteria
    Soc2,
    /// Sarbanes-Oxley
    Sox,
    /// OWASP Top 10 for LLM applications
    Owasp,
    /// MAESTRO model monitoring and explainability
    Maestro,
}

impl Framework {
    /// All frameworks in scoring order
    pub const ALL: [Framework; 5] = [
        Framework::Nist,
        Framework::Soc2,
        Framework::Sox,
        Framework::Owasp,
        Framework::Maestro,
    ];

    /// Short identifier ("NIST", "SOC2", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Nist => "NIST",
            Framework::Soc2 => "SOC2",
            Framework::Sox => "SOX",
            Framework::Owasp => "OWASP",
            Framework::Maestro => "MAESTRO",
        }
    }

    /// Parse a short identifier, case-insensitively
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|framework| framework.as_str().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Framework risk score (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameworkScore(u8);

impl FrameworkScore {
    /// Upper bound of every score
    pub const MAX: u8 = 100;

    /// Zero risk
    pub const ZERO: FrameworkScore = FrameworkScore(0);

    /// Create new score, clamped to 0-100
    pub fn new(score: u8) -> Self {
        Self(score.min(Self::MAX))
    }

    /// Clamp an accumulated point sum into a score
    pub fn from_points(points: u32) -> Self {
        Self(points.min(Self::MAX as u32) as u8)
    }

    /// Get raw score
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Risk level for this score
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from(*self)
    }
}

impl From<FrameworkScore> for u8 {
    fn from(score: FrameworkScore) -> Self {
        score.0
    }
}

impl fmt::Display for FrameworkScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reviewer-facing risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Below 30
    Low,
    /// 30-59
    Medium,
    /// 60 and above
    High,
}

impl From<FrameworkScore> for RiskLevel {
    fn from(score: FrameworkScore) -> Self {
        match score.value() {
            0..=29 => RiskLevel::Low,
            30..=59 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Medium => write!(f, "Medium Risk"),
            RiskLevel::High => write!(f, "High Risk"),
        }
    }
}

/// One rule branch that fired while scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Framework the points were added to
    pub framework: Framework,

    /// What triggered the points
    pub reason: String,

    /// Points contributed before clamping
    pub points: u8,
}

/// The five per-framework scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameworkScores {
    /// NIST AI RMF
    pub nist: FrameworkScore,
    /// SOC 2
    pub soc2: FrameworkScore,
    /// SOX
    pub sox: FrameworkScore,
    /// OWASP LLM Top 10
    pub owasp: FrameworkScore,
    /// MAESTRO
    pub maestro: FrameworkScore,
}

impl FrameworkScores {
    /// Score for a single framework
    pub fn get(&self, framework: Framework) -> FrameworkScore {
        match framework {
            Framework::Nist => self.nist,
            Framework::Soc2 => self.soc2,
            Framework::Sox => self.sox,
            Framework::Owasp => self.owasp,
            Framework::Maestro => self.maestro,
        }
    }
}

/// Risk assessment result for one intake request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Per-framework scores
    pub scores: FrameworkScores,

    /// Weighted total
    pub total: FrameworkScore,

    /// Rule branches that fired, in evaluation order
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Risk level of the weighted total
    pub fn risk_level(&self) -> RiskLevel {
        self.total.level()
    }

    /// Factors contributed to one framework
    pub fn factors_for(&self, framework: Framework) -> impl Iterator<Item = &RiskFactor> {
        self.factors.iter().filter(move |f| f.framework == framework)
    }
}
