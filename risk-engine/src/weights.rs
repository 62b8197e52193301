//! Framework weight table
//!
//! Weights are loaded as plain numbers ([`WeightConfig`]) and turned into a
//! validated [`ScoringWeights`] exactly once, when the engine is built.
//! Aggregation runs on `Decimal` so that e.g. `85 * 0.15` is exactly `12.75`
//! and the truncated total never loses a point to binary rounding.

use crate::{Error, Framework, FrameworkScore, FrameworkScores, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prefix of the per-framework weight environment variables
pub const WEIGHT_ENV_PREFIX: &str = "RISK_WEIGHT_";

/// Allowed distance of the weight sum from 1.0
fn sum_tolerance() -> Decimal {
    Decimal::new(1, 6)
}

/// Unvalidated weight table, as read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// NIST AI RMF weight
    pub nist: f64,
    /// SOC 2 weight
    pub soc2: f64,
    /// SOX weight
    pub sox: f64,
    /// OWASP LLM weight
    pub owasp: f64,
    /// MAESTRO weight
    pub maestro: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            nist: 0.25,
            soc2: 0.20,
            sox: 0.15,
            owasp: 0.25,
            maestro: 0.15,
        }
    }
}

impl WeightConfig {
    /// Weight for one framework
    pub fn get(&self, framework: Framework) -> f64 {
        match framework {
            Framework::Nist => self.nist,
            Framework::Soc2 => self.soc2,
            Framework::Sox => self.sox,
            Framework::Owasp => self.owasp,
            Framework::Maestro => self.maestro,
        }
    }

    /// Replace the weight for one framework
    pub fn set(&mut self, framework: Framework, weight: f64) {
        match framework {
            Framework::Nist => self.nist = weight,
            Framework::Soc2 => self.soc2 = weight,
            Framework::Sox => self.sox = weight,
            Framework::Owasp => self.owasp = weight,
            Framework::Maestro => self.maestro = weight,
        }
    }

    /// Parse a TOML weight table (`nist = 0.25` ...)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse weights: {}", e)))
    }

    /// Override weights from `RISK_WEIGHT_<FRAMEWORK>` variables
    pub fn apply_env(&mut self) -> Result<()> {
        for framework in Framework::ALL {
            let var = format!("{}{}", WEIGHT_ENV_PREFIX, framework.as_str());
            if let Ok(raw) = std::env::var(&var) {
                let weight = raw.trim().parse::<f64>().map_err(|e| {
                    Error::Configuration(format!("{} is not a number ({:?}): {}", var, raw, e))
                })?;
                self.set(framework, weight);
            }
        }
        Ok(())
    }
}

/// Validated weight table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    nist: Decimal,
    soc2: Decimal,
    sox: Decimal,
    owasp: Decimal,
    maestro: Decimal,
}

impl ScoringWeights {
    /// The standard table: 0.25 / 0.20 / 0.15 / 0.25 / 0.15
    pub fn standard() -> Self {
        Self {
            nist: Decimal::new(25, 2),
            soc2: Decimal::new(20, 2),
            sox: Decimal::new(15, 2),
            owasp: Decimal::new(25, 2),
            maestro: Decimal::new(15, 2),
        }
    }

    /// Validate a configured table
    ///
    /// Every weight must be finite and within [0, 1], and the weights must
    /// sum to 1.0. Nothing is normalized or corrected.
    pub fn new(config: &WeightConfig) -> Result<Self> {
        let weights = Self {
            nist: to_decimal(Framework::Nist, config.nist)?,
            soc2: to_decimal(Framework::Soc2, config.soc2)?,
            sox: to_decimal(Framework::Sox, config.sox)?,
            owasp: to_decimal(Framework::Owasp, config.owasp)?,
            maestro: to_decimal(Framework::Maestro, config.maestro)?,
        };

        let sum = weights.sum();
        if (sum - Decimal::ONE).abs() > sum_tolerance() {
            return Err(Error::Configuration(format!(
                "Framework weights must sum to 1.0, got {}",
                sum
            )));
        }

        Ok(weights)
    }

    /// Weight for one framework
    pub fn weight(&self, framework: Framework) -> Decimal {
        match framework {
            Framework::Nist => self.nist,
            Framework::Soc2 => self.soc2,
            Framework::Sox => self.sox,
            Framework::Owasp => self.owasp,
            Framework::Maestro => self.maestro,
        }
    }

    /// Sum of all weights
    pub fn sum(&self) -> Decimal {
        Framework::ALL.iter().map(|f| self.weight(*f)).sum()
    }

    /// Weighted average of the sub-scores, truncated toward zero
    pub fn weighted_total(&self, scores: &FrameworkScores) -> FrameworkScore {
        let weighted: Decimal = Framework::ALL
            .iter()
            .map(|f| Decimal::from(scores.get(*f).value()) * self.weight(*f))
            .sum();

        // Non-negative by construction, so floor == truncation
        let total = weighted.trunc().to_u8().unwrap_or(FrameworkScore::MAX);
        FrameworkScore::new(total)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<WeightConfig> for ScoringWeights {
    type Error = Error;

    fn try_from(config: WeightConfig) -> Result<Self> {
        Self::new(&config)
    }
}

fn to_decimal(framework: Framework, weight: f64) -> Result<Decimal> {
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(Error::Configuration(format!(
            "{} weight must be within [0, 1], got {}",
            framework, weight
        )));
    }

    // Shortest round-trip text keeps 0.15 as 0.15 instead of its binary expansion
    Decimal::from_str(&weight.to_string()).map_err(|e| {
        Error::Configuration(format!("{} weight {} is not representable: {}", framework, weight, e))
    })
}
