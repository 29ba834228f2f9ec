//! Shared data structures for the squidmind cognitive engine.
//!
//! Everything here is plain serde data. Behavior lives in `squidmind_core`.

pub mod data;

pub use data::memory::{MemoryRecord, MemoryValue};
pub use data::neuron::{Neuron, NeuronKind, NeuronValue, Shape, Trigger};
pub use data::snapshot::{NeurogenesisCounters, SavedCreature, WeightEntry, SAVE_FORMAT_VERSION};
