use super::memory::MemoryRecord;
use super::neuron::{Neuron, Trigger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Version tag written into every save blob.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Accumulated neurogenesis pressure, one scalar per trigger.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct NeurogenesisCounters {
    pub novelty: f32,
    pub stress: f32,
    pub reward: f32,
}

impl NeurogenesisCounters {
    #[must_use]
    pub fn get(&self, trigger: Trigger) -> f32 {
        match trigger {
            Trigger::Novelty => self.novelty,
            Trigger::Stress => self.stress,
            Trigger::Reward => self.reward,
        }
    }

    pub fn get_mut(&mut self, trigger: Trigger) -> &mut f32 {
        match trigger {
            Trigger::Novelty => &mut self.novelty,
            Trigger::Stress => &mut self.stress,
            Trigger::Reward => &mut self.reward,
        }
    }
}

/// One directed connection in flat form.
///
/// Tuple keys are not valid JSON object keys, so the weight map is saved as a
/// list of entries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub from: String,
    pub to: String,
    pub weight: f32,
}

/// Complete exported state of one creature.
///
/// Produced by `Creature::export_state` and consumed by `import_state`; the
/// persistence collaborator treats it as an opaque JSON-compatible record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedCreature {
    pub version: u32,
    pub id: Uuid,
    pub personality: String,
    pub neurons: Vec<Neuron>,
    pub weights: Vec<WeightEntry>,
    #[serde(default)]
    pub ceilings: BTreeMap<String, f32>,
    pub short_term: Vec<MemoryRecord>,
    pub long_term: Vec<MemoryRecord>,
    pub counters: NeurogenesisCounters,
    pub last_neuron_time: Option<f64>,
    /// Simulated time at export.
    pub saved_at: f64,
    #[serde(default)]
    pub config_fingerprint: String,
}
