//! Per-framework scoring rules
//!
//! Each rule is an additive point table evaluated top to bottom against the
//! intake details. The accumulated points are clamped to 0-100. Rules are
//! independent of each other and of the weight table.
//!
//! Some conditions deliberately feed more than one bucket of the same
//! framework (PII/PHI adds both the generic "data present" points and the
//! sensitivity points for SOC2 and OWASP).

use crate::details::{keys, IntakeDetails};
use crate::{Framework, FrameworkScore, RiskFactor};

/// Use cases treated as critical, always-on services (exact match)
pub const CRITICAL_SERVICE_USE_CASES: [&str; 4] = [
    "Chatbot",
    "Chatbot / Virtual Assistant",
    "Automation",
    "Process Automation",
];

/// Hosted model vendors counted as third-party dependencies
pub const THIRD_PARTY_PROVIDERS: [&str; 4] = ["OpenAI", "Anthropic", "Google", "Google (Vertex AI)"];

const PERSONAL_DATA: [&str; 2] = ["PHI", "PII"];

/// Outcome of one framework rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkEvaluation {
    /// Clamped score
    pub score: FrameworkScore,

    /// Branches that fired
    pub factors: Vec<RiskFactor>,
}

/// Point accumulator for a single framework
struct Tally {
    framework: Framework,
    points: u32,
    factors: Vec<RiskFactor>,
}

impl Tally {
    fn new(framework: Framework) -> Self {
        Self {
            framework,
            points: 0,
            factors: Vec::new(),
        }
    }

    fn add(&mut self, points: u8, reason: impl Into<String>) {
        self.points = self.points.saturating_add(points as u32);
        self.factors.push(RiskFactor {
            framework: self.framework,
            reason: reason.into(),
            points,
        });
    }

    fn finish(self) -> FrameworkEvaluation {
        FrameworkEvaluation {
            score: FrameworkScore::from_points(self.points),
            factors: self.factors,
        }
    }
}

/// Evaluate the rule for `framework`
pub fn evaluate(framework: Framework, details: &IntakeDetails) -> FrameworkEvaluation {
    match framework {
        Framework::Nist => nist(details),
        Framework::Soc2 => soc2(details),
        Framework::Sox => sox(details),
        Framework::Owasp => owasp(details),
        Framework::Maestro => maestro(details),
    }
}

/// NIST AI RMF: data sensitivity, deployment surface, model sophistication
pub fn nist(details: &IntakeDetails) -> FrameworkEvaluation {
    let mut tally = Tally::new(Framework::Nist);

    let data_types = details.string_set(keys::DATA_TYPES);
    if !data_types.is_empty() {
        if data_types.contains_any(&PERSONAL_DATA) {
            tally.add(40, "Personal or health data (PII/PHI)");
        } else if data_types.contains("Financial") {
            tally.add(25, "Financial data");
        } else if data_types.contains("Intellectual Property") {
            tally.add(20, "Intellectual property");
        } else {
            tally.add(5, "Low sensitivity data");
        }
    }

    match details.text(keys::DEPLOYMENT_TYPE) {
        "Cloud" => tally.add(15, "Cloud deployment"),
        "Hybrid" => tally.add(10, "Hybrid deployment"),
        "On-Premise" => tally.add(5, "On-premise deployment"),
        _ => {}
    }

    let model = details.text(keys::MODEL_USED);
    if !model.is_empty() {
        if model.contains("GPT-4") || model.contains("Claude") {
            tally.add(15, format!("Advanced model ({})", model));
        } else {
            tally.add(10, format!("Model in use ({})", model));
        }
    }

    tally.finish()
}

/// SOC 2: security, availability, confidentiality, volume
pub fn soc2(details: &IntakeDetails) -> FrameworkEvaluation {
    let mut tally = Tally::new(Framework::Soc2);

    let data_types = details.string_set(keys::DATA_TYPES);
    if !data_types.is_empty() {
        tally.add(20, "Processes classified data");
    }

    if is_critical_service(details.text(keys::USE_CASE)) {
        tally.add(15, "Critical service availability");
    }

    if data_types.contains_any(&PERSONAL_DATA) {
        tally.add(30, "Confidential personal data (PII/PHI)");
    }

    // "Very Large" contains "Large"
    if details.text(keys::DATA_VOLUME).contains("Large") {
        tally.add(20, "Large data volume");
    }

    tally.finish()
}

/// SOX: financial data, change control, business impact
pub fn sox(details: &IntakeDetails) -> FrameworkEvaluation {
    let mut tally = Tally::new(Framework::Sox);

    if details.string_set(keys::DATA_TYPES).contains("Financial") {
        tally.add(50, "Financial data handling");
    }

    if details.text(keys::DEPLOYMENT_TYPE) == "Cloud" {
        tally.add(20, "Cloud change control");
    }

    if !details.text(keys::BUSINESS_IMPACT).is_empty() {
        tally.add(15, "Declared business impact");
    }

    tally.finish()
}

/// OWASP LLM Top 10: prompt injection, poisoning, supply chain, leakage, output handling
pub fn owasp(details: &IntakeDetails) -> FrameworkEvaluation {
    let mut tally = Tally::new(Framework::Owasp);

    let use_case = details.text(keys::USE_CASE);
    if use_case.contains("Chatbot") || use_case.contains("Virtual Assistant") {
        tally.add(25, "Prompt injection exposure");
    }

    if details.text(keys::MODEL_USED).contains("Custom") {
        tally.add(20, "Training data poisoning (custom model)");
    }

    let provider = details.text(keys::MODEL_PROVIDER);
    if THIRD_PARTY_PROVIDERS.contains(&provider) {
        tally.add(10, format!("Third-party model supply chain ({})", provider));
    } else if provider == "Self-Hosted" {
        tally.add(5, "Self-hosted model supply chain");
    }

    let data_types = details.string_set(keys::DATA_TYPES);
    if data_types.contains_any(&PERSONAL_DATA) {
        tally.add(30, "Sensitive data leakage (PII/PHI)");
    }

    if !data_types.is_empty() {
        tally.add(10, "Insecure output handling");
    }

    tally.finish()
}

/// MAESTRO: model risk, audience reach, monitoring, testability
pub fn maestro(details: &IntakeDetails) -> FrameworkEvaluation {
    let mut tally = Tally::new(Framework::Maestro);

    if !details.text(keys::MODEL_USED).is_empty() {
        tally.add(20, "Model risk modes");
    }

    let audience = details.text(keys::EXPECTED_USER_BASE);
    if audience.contains("Public") {
        tally.add(25, "Public user base");
    } else if audience.contains("Partners") {
        tally.add(15, "Partner user base");
    } else if audience.contains("Internal") {
        tally.add(10, "Internal user base");
    }

    if is_critical_service(details.text(keys::USE_CASE)) {
        tally.add(20, "Continuous monitoring required");
    }

    if !details.text(keys::DEPLOYMENT_TYPE).is_empty() {
        tally.add(15, "Deployment testability");
    }

    tally.finish()
}

fn is_critical_service(use_case: &str) -> bool {
    CRITICAL_SERVICE_USE_CASES.contains(&use_case)
}
