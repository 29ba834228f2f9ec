use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload of a memory record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MemoryValue {
    Number(f64),
    Text(String),
    /// Stat name to delta, e.g. `{"happiness": 10.0, "anxiety": -5.0}`.
    Effects(BTreeMap<String, f64>),
}

impl MemoryValue {
    /// Builds an effects payload from `(stat, delta)` pairs.
    pub fn effects<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::Effects(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn as_effects(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            Self::Effects(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for MemoryValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for MemoryValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// A tagged experience record held in short- or long-term memory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Free-form tag, e.g. `experiences` or `decorations`.
    pub category: String,
    /// Subject of the record within its category.
    pub key: String,
    pub value: MemoryValue,
    /// Simulated time of the last insertion, in seconds.
    pub timestamp: f64,
    pub importance: f32,
    pub access_count: u32,
    #[serde(default)]
    pub related: Vec<String>,
}

impl MemoryRecord {
    pub fn new(
        category: impl Into<String>,
        key: impl Into<String>,
        value: MemoryValue,
        importance: f32,
        timestamp: f64,
    ) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
            value,
            timestamp,
            importance: importance.max(0.0),
            access_count: 0,
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn matches(&self, category: &str, key: Option<&str>) -> bool {
        self.category == category && key.map_or(true, |k| self.key == k)
    }
}
