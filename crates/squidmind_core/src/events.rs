//! Diagnostic side channel for brain activity.
//!
//! Growth, pruning and significant weight changes are handed to an
//! [`EventSink`]. Nothing in the engine depends on what the sink does with
//! them.

use crate::hebbian::WeightUpdate;
use crate::neurogenesis::PruneReason;
use serde::Serialize;
use squidmind_data::Trigger;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BrainEvent {
    NeuronCreated {
        name: String,
        trigger: Trigger,
        /// Counter value at the moment of creation.
        counter_value: f32,
        /// Outgoing connections wired at creation, `(target, weight)`.
        connections: Vec<(String, f32)>,
        /// Core stat values at creation, for the journal context line.
        context: Vec<(String, f32)>,
        at: f64,
    },
    NeuronPruned {
        name: String,
        reason: PruneReason,
        at: f64,
    },
    WeightChanged {
        update: WeightUpdate,
        at: f64,
    },
}

impl BrainEvent {
    #[must_use]
    pub fn at(&self) -> f64 {
        match self {
            Self::NeuronCreated { at, .. }
            | Self::NeuronPruned { at, .. }
            | Self::WeightChanged { at, .. } => *at,
        }
    }
}

/// Receiver of brain events.
pub trait EventSink: Send {
    fn record(&mut self, event: &BrainEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &BrainEvent) {}
}

/// Collects events in memory.
///
/// Clones share the same buffer, so a handle kept outside a creature can
/// observe what the creature recorded.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<BrainEvent>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<BrainEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Names of created neurons, in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BrainEvent::NeuronCreated { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn pruned(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BrainEvent::NeuronPruned { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &BrainEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
