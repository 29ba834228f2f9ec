//! The neuron-state graph.
//!
//! Owns every neuron value and every directed connection weight. Neurons
//! live in a `Vec` with a name index beside it; weights live in an ordered
//! map keyed by `(from, to)` so iteration order is stable across runs.

use crate::error::{CoreError, Result};
use squidmind_data::{Neuron, NeuronKind, NeuronValue, Shape, Trigger, WeightEntry};
use std::collections::{BTreeMap, HashMap};

/// Scalar stats every creature has.
pub const CORE_NEURONS: [&str; 7] = [
    "hunger",
    "happiness",
    "cleanliness",
    "sleepiness",
    "satisfaction",
    "anxiety",
    "curiosity",
];

/// Boolean state flags every creature has.
pub const CORE_FLAGS: [&str; 6] = [
    "is_sick",
    "is_eating",
    "is_sleeping",
    "pursuing_food",
    "is_startled",
    "is_fleeing",
];

/// Neurons a bulk snapshot may never overwrite. Use [`StateGraph::set_flag`].
pub const TRANSIENT_FLAGS: [&str; 7] = [
    "is_sick",
    "is_eating",
    "is_sleeping",
    "pursuing_food",
    "direction",
    "is_startled",
    "is_fleeing",
];

const CORE_POSITIONS: [(&str, (f32, f32)); 7] = [
    ("hunger", (127.0, 81.0)),
    ("happiness", (361.0, 81.0)),
    ("cleanliness", (627.0, 81.0)),
    ("sleepiness", (840.0, 81.0)),
    ("satisfaction", (271.0, 380.0)),
    ("anxiety", (491.0, 389.0)),
    ("curiosity", (701.0, 386.0)),
];

const CORE_COLOR: (u8, u8, u8) = (150, 150, 255);
const FLAG_ROW_Y: f32 = 560.0;

/// Snapshot pushed by the environment each tick.
pub type Snapshot = BTreeMap<String, NeuronValue>;

#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    neurons: Vec<Neuron>,
    index: HashMap<String, usize>,
    weights: BTreeMap<(String, String), f32>,
    ceilings: BTreeMap<String, f32>,
}

impl StateGraph {
    /// An empty graph with no neurons.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard creature layout: seven stats at 50, all flags cleared,
    /// `direction` pointing up.
    #[must_use]
    pub fn with_core_neurons(now: f64) -> Self {
        let mut graph = Self::new();
        for (name, position) in CORE_POSITIONS {
            graph.push(core_neuron(name, NeuronValue::Number(50.0), position, now));
        }
        for (i, name) in CORE_FLAGS.iter().enumerate() {
            let position = (127.0 + i as f32 * 140.0, FLAG_ROW_Y);
            graph.push(core_neuron(name, NeuronValue::Flag(false), position, now));
        }
        graph.push(core_neuron(
            "direction",
            NeuronValue::from("up"),
            (967.0, FLAG_ROW_Y),
            now,
        ));
        graph
    }

    /// Rebuilds a graph from exported parts.
    ///
    /// Weights whose endpoints are missing are dropped.
    pub fn from_parts(
        neurons: Vec<Neuron>,
        weights: &[WeightEntry],
        ceilings: BTreeMap<String, f32>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        for neuron in neurons {
            graph.insert(neuron)?;
        }
        for entry in weights {
            graph.set_weight(&entry.from, &entry.to, entry.weight);
        }
        graph.ceilings = ceilings;
        Ok(graph)
    }

    fn push(&mut self, neuron: Neuron) {
        self.index.insert(neuron.name.clone(), self.neurons.len());
        self.neurons.push(neuron);
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (idx, neuron) in self.neurons.iter().enumerate() {
            self.index.insert(neuron.name.clone(), idx);
        }
    }

    fn clamp_to_ceiling(&self, name: &str, value: NeuronValue) -> NeuronValue {
        match (value, self.ceilings.get(name)) {
            (NeuronValue::Number(v), Some(max)) => NeuronValue::Number(v.clamp(0.0, *max)),
            (value, _) => value,
        }
    }

    /// Merges a snapshot into existing neurons.
    ///
    /// Unknown names, transient flags and non-finite numbers are skipped.
    /// Returns how many neurons were written.
    pub fn update(&mut self, snapshot: &Snapshot) -> usize {
        let mut written = 0;
        for (name, value) in snapshot {
            if TRANSIENT_FLAGS.contains(&name.as_str()) {
                continue;
            }
            if matches!(value, NeuronValue::Number(v) if !v.is_finite()) {
                tracing::debug!(neuron = %name, "Skipping non-finite snapshot value");
                continue;
            }
            let Some(&idx) = self.index.get(name) else {
                continue;
            };
            let value = self.clamp_to_ceiling(name, value.clone());
            self.neurons[idx].value = value;
            written += 1;
        }
        written
    }

    /// Explicit write path; the only way to change a transient flag.
    ///
    /// Non-finite numbers are rejected and leave the neuron untouched.
    pub fn set_flag(&mut self, name: &str, value: impl Into<NeuronValue>) -> Result<()> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| CoreError::unknown_neuron(name))?;
        let value = value.into();
        if matches!(value, NeuronValue::Number(v) if !v.is_finite()) {
            return Err(CoreError::invalid_value(name));
        }
        let value = self.clamp_to_ceiling(name, value);
        self.neurons[idx].value = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&NeuronValue> {
        self.neuron(name)
            .map(|n| &n.value)
            .ok_or_else(|| CoreError::unknown_neuron(name))
    }

    #[must_use]
    pub fn neuron(&self, name: &str) -> Option<&Neuron> {
        self.index.get(name).map(|&idx| &self.neurons[idx])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Activation of `name` on the 0-100 scale, or `default` if absent.
    #[must_use]
    pub fn value_or(&self, name: &str, default: f32) -> f32 {
        self.neuron(name)
            .map_or(default, |n| n.value.activation())
    }

    /// Registers a neuron with a default layout position.
    pub fn add_neuron(
        &mut self,
        name: &str,
        value: impl Into<NeuronValue>,
        kind: NeuronKind,
        origin: Option<Trigger>,
        now: f64,
    ) -> Result<()> {
        let (color, shape) = origin.map_or((CORE_COLOR, Shape::Circle), |t| (t.color(), t.shape()));
        self.insert(Neuron {
            name: name.to_string(),
            value: value.into(),
            kind,
            origin,
            created_at: now,
            color,
            shape,
            position: self.centroid().unwrap_or((0.0, 0.0)),
        })
    }

    /// Registers a fully described neuron.
    pub fn insert(&mut self, neuron: Neuron) -> Result<()> {
        if self.contains(&neuron.name) {
            return Err(CoreError::duplicate_neuron(neuron.name));
        }
        self.push(neuron);
        Ok(())
    }

    /// Removes a generated neuron and every connection touching it.
    pub fn remove_neuron(&mut self, name: &str) -> Result<Neuron> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| CoreError::unknown_neuron(name))?;
        if self.neurons[idx].is_core() {
            return Err(CoreError::protected_neuron(name));
        }
        let removed = self.neurons.remove(idx);
        self.rebuild_index();
        self.weights.retain(|(from, to), _| from != name && to != name);
        self.ceilings.remove(name);
        Ok(removed)
    }

    /// Stores `value` clamped to `[-1, 1]`.
    ///
    /// Non-finite values, self-connections and unknown endpoints are ignored.
    pub fn set_weight(&mut self, from: &str, to: &str, value: f32) {
        if !value.is_finite() || from == to || !self.contains(from) || !self.contains(to) {
            return;
        }
        self.weights
            .insert((from.to_string(), to.to_string()), value.clamp(-1.0, 1.0));
    }

    /// Deletes one directed connection. Returns whether it existed.
    pub fn remove_weight(&mut self, from: &str, to: &str) -> bool {
        self.weights
            .remove(&(from.to_string(), to.to_string()))
            .is_some()
    }

    /// Weight of the directed connection, 0 if none exists.
    #[must_use]
    pub fn weight(&self, from: &str, to: &str) -> f32 {
        self.weights
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn has_connection(&self, from: &str, to: &str) -> bool {
        self.weights
            .contains_key(&(from.to_string(), to.to_string()))
    }

    pub fn weights(&self) -> impl Iterator<Item = (&str, &str, f32)> {
        self.weights
            .iter()
            .map(|((from, to), w)| (from.as_str(), to.as_str(), *w))
    }

    #[must_use]
    pub fn weight_entries(&self) -> Vec<WeightEntry> {
        self.weights()
            .map(|(from, to, weight)| WeightEntry {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            })
            .collect()
    }

    /// Shrinks every weight toward zero by `rate`.
    pub fn decay_weights(&mut self, rate: f32) {
        let factor = (1.0 - rate).clamp(0.0, 1.0);
        for w in self.weights.values_mut() {
            *w *= factor;
        }
    }

    /// Every connection with `name` as either endpoint.
    #[must_use]
    pub fn connections_of(&self, name: &str) -> Vec<(&str, &str, f32)> {
        self.weights()
            .filter(|(from, to, _)| *from == name || *to == name)
            .collect()
    }

    /// Mean absolute weight over the connections of `name`; 0 if it has none.
    #[must_use]
    pub fn average_connection_strength(&self, name: &str) -> f32 {
        let connections = self.connections_of(name);
        if connections.is_empty() {
            return 0.0;
        }
        connections.iter().map(|(_, _, w)| w.abs()).sum::<f32>() / connections.len() as f32
    }

    /// The `n` connections with the smallest magnitude.
    #[must_use]
    pub fn weakest_connections(&self, n: usize) -> Vec<WeightEntry> {
        let mut entries = self.weight_entries();
        entries.sort_by(|a, b| a.weight.abs().total_cmp(&b.weight.abs()));
        entries.truncate(n);
        entries
    }

    /// Mean |w| scaled to 0-100; 0 for an unconnected network.
    #[must_use]
    pub fn network_health(&self) -> f32 {
        if self.weights.is_empty() {
            return 0.0;
        }
        let total: f32 = self.weights.values().map(|w| w.abs()).sum();
        total / self.weights.len() as f32 * 100.0
    }

    pub fn set_ceiling(&mut self, name: &str, max: f32) -> Result<()> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| CoreError::unknown_neuron(name))?;
        self.ceilings.insert(name.to_string(), max);
        if let NeuronValue::Number(v) = &mut self.neurons[idx].value {
            *v = v.min(max);
        }
        Ok(())
    }

    #[must_use]
    pub fn ceiling(&self, name: &str) -> Option<f32> {
        self.ceilings.get(name).copied()
    }

    #[must_use]
    pub fn ceilings(&self) -> &BTreeMap<String, f32> {
        &self.ceilings
    }

    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn generated(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| !n.is_core())
    }

    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.generated().count()
    }

    #[must_use]
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }

    /// Mean layout position of all neurons.
    #[must_use]
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.neurons.is_empty() {
            return None;
        }
        let n = self.neurons.len() as f32;
        let (sx, sy) = self
            .neurons
            .iter()
            .fold((0.0, 0.0), |(x, y), neuron| (x + neuron.position.0, y + neuron.position.1));
        Some((sx / n, sy / n))
    }
}

fn core_neuron(name: &str, value: NeuronValue, position: (f32, f32), now: f64) -> Neuron {
    Neuron {
        name: name.to_string(),
        value,
        kind: NeuronKind::Core,
        origin: None,
        created_at: now,
        color: CORE_COLOR,
        shape: Shape::Circle,
        position,
    }
}
