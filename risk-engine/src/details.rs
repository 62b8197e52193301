//! Typed access to the free-form intake details bag
//!
//! Intake answers arrive as arbitrary JSON. Scoring rules never look at the
//! raw values; they go through [`IntakeDetails::text`] and
//! [`IntakeDetails::string_set`], which return an empty value for an absent
//! key or a value of the wrong type. An empty value contributes no points.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Detail keys read by the scoring rules
pub mod keys {
    /// Sensitivity categories present (array of strings)
    pub const DATA_TYPES: &str = "data_types";
    /// Cloud / On-Premise / Hybrid
    pub const DEPLOYMENT_TYPE: &str = "deployment_type";
    /// Model name or family
    pub const MODEL_USED: &str = "model_used";
    /// Model vendor, or "Self-Hosted"
    pub const MODEL_PROVIDER: &str = "model_provider";
    /// Functional category
    pub const USE_CASE: &str = "use_case";
    /// Qualitative data volume
    pub const DATA_VOLUME: &str = "data_volume";
    /// Free text business impact statement
    pub const BUSINESS_IMPACT: &str = "business_impact";
    /// Audience scope
    pub const EXPECTED_USER_BASE: &str = "expected_user_base";
}

/// Intake answers keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeDetails(Map<String, Value>);

impl IntakeDetails {
    /// Empty details
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything other than an object yields empty details
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no fields are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value, or `""` if absent or not a string
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// String entries of an array value
    ///
    /// Absent keys and non-array values give an empty set. Non-string
    /// entries are skipped.
    pub fn string_set(&self, key: &str) -> StringSet<'_> {
        let items = match self.0.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        StringSet(items)
    }
}

impl From<Map<String, Value>> for IntakeDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Borrowed set of strings read from the details bag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSet<'a>(Vec<&'a str>);

impl StringSet<'_> {
    /// Exact membership
    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|entry| *entry == item)
    }

    /// True if any of `items` is present
    pub fn contains_any(&self, items: &[&str]) -> bool {
        items.iter().any(|item| self.contains(item))
    }

    /// True if no string entries were present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of string entries
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
