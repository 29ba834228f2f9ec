use crate::config::NeurogenesisConfig;
use crate::events::BrainEvent;
use crate::graph::StateGraph;
use serde::{Deserialize, Serialize};

/// Neutral midpoint activity is measured against.
const NEUTRAL_ACTIVITY: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PruneReason {
    WeakConnections,
    LowActivity,
}

impl PruneReason {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WeakConnections => "weak connections",
            Self::LowActivity => "low activity",
        }
    }
}

/// Chance of attempting a prune at the current population.
///
/// Zero below `start_fraction` of the cap, rising linearly to one at the cap.
#[must_use]
pub fn prune_probability(generated: usize, max: usize, start_fraction: f32) -> f32 {
    if max == 0 {
        return 1.0;
    }
    let start = start_fraction * max as f32;
    let span = max as f32 - start;
    let count = generated as f32;
    if count < start {
        0.0
    } else if span <= 0.0 {
        1.0
    } else {
        ((count - start) / span).min(1.0)
    }
}

/// The generated neuron to remove next, if any qualifies.
///
/// Weakly connected neurons go first, then inactive ones; within a class the
/// oldest (earliest inserted) wins.
#[must_use]
pub fn find_candidate(graph: &StateGraph, config: &NeurogenesisConfig) -> Option<(String, PruneReason)> {
    let weak = graph
        .generated()
        .find(|n| graph.average_connection_strength(&n.name) < config.weak_connection)
        .map(|n| (n.name.clone(), PruneReason::WeakConnections));
    weak.or_else(|| {
        graph
            .generated()
            .find(|n| (n.value.activation() - NEUTRAL_ACTIVITY).abs() < config.low_activity)
            .map(|n| (n.name.clone(), PruneReason::LowActivity))
    })
}

/// Removes at most one generated neuron.
pub fn prune_weak_neurons(
    graph: &mut StateGraph,
    config: &NeurogenesisConfig,
    now: f64,
) -> Option<BrainEvent> {
    let (name, reason) = find_candidate(graph, config)?;
    match graph.remove_neuron(&name) {
        Ok(_) => {
            tracing::info!(neuron = %name, reason = reason.label(), "Neuron pruned");
            Some(BrainEvent::NeuronPruned {
                name,
                reason,
                at: now,
            })
        }
        Err(err) => {
            tracing::warn!(neuron = %name, error = %err, "Prune rejected");
            None
        }
    }
}
