use crate::config::NeurogenesisConfig;
use crate::error::Result;
use crate::events::BrainEvent;
use crate::graph::{StateGraph, CORE_NEURONS};
use crate::personality::Personality;
use rand::Rng;
use squidmind_data::{Neuron, NeuronKind, NeuronValue, Trigger};

/// Layout jitter around the centroid, in either axis.
const POSITION_JITTER: f32 = 50.0;
const REVERSE_FACTOR: f32 = 0.5;

/// Default outgoing connections for a neuron grown by `trigger`.
#[must_use]
pub fn connection_template(trigger: Trigger) -> &'static [(&'static str, f32)] {
    match trigger {
        Trigger::Novelty => &[("curiosity", 0.6), ("anxiety", -0.4)],
        Trigger::Stress => &[("happiness", 0.3), ("cleanliness", 0.2)],
        Trigger::Reward => &[("satisfaction", 0.8), ("happiness", 0.5)],
    }
}

/// `<prefix>_<n>` with the lowest `n` not already taken.
#[must_use]
pub fn next_name(graph: &StateGraph, trigger: Trigger) -> String {
    let prefix = trigger.prefix();
    (0..)
        .map(|i| format!("{prefix}_{i}"))
        .find(|name| !graph.contains(name))
        .unwrap_or_else(|| format!("{prefix}_{}", graph.neuron_count()))
}

/// Grows one neuron for `trigger` and wires its initial connections.
pub fn create_neuron<R: Rng>(
    graph: &mut StateGraph,
    trigger: Trigger,
    config: &NeurogenesisConfig,
    personality: Personality,
    counter_value: f32,
    now: f64,
    rng: &mut R,
) -> Result<BrainEvent> {
    let name = next_name(graph, trigger);
    let (cx, cy) = graph.centroid().unwrap_or((0.0, 0.0));
    let position = (
        cx + rng.gen_range(-POSITION_JITTER..=POSITION_JITTER),
        cy + rng.gen_range(-POSITION_JITTER..=POSITION_JITTER),
    );

    graph.insert(Neuron {
        name: name.clone(),
        value: NeuronValue::Number(config.initial_activation),
        kind: NeuronKind::Generated,
        origin: Some(trigger),
        created_at: now,
        color: trigger.color(),
        shape: trigger.shape(),
        position,
    })?;

    let modifier = personality.neurogenesis_modifier(trigger);
    for (target, weight) in connection_template(trigger) {
        if !graph.contains(target) {
            continue;
        }
        let forward = weight * modifier;
        graph.set_weight(&name, target, forward);
        graph.set_weight(target, &name, forward * REVERSE_FACTOR);
    }

    if trigger == Trigger::Stress {
        apply_stress_scar(graph, &name, config)?;
    }

    let connections: Vec<(String, f32)> = graph
        .connections_of(&name)
        .into_iter()
        .filter(|(from, _, _)| *from == name)
        .map(|(_, to, w)| (to.to_string(), w))
        .collect();
    let context: Vec<(String, f32)> = CORE_NEURONS
        .iter()
        .filter(|n| graph.contains(n))
        .map(|n| (n.to_string(), graph.value_or(n, 0.0)))
        .collect();

    tracing::info!(
        neuron = %name,
        trigger = ?trigger,
        counter = counter_value,
        connections = connections.len(),
        "Neuron created"
    );

    Ok(BrainEvent::NeuronCreated {
        name,
        trigger,
        counter_value,
        connections,
        context,
        at: now,
    })
}

/// Permanent side effect of stress growth: an inhibitory link to anxiety and
/// a lower anxiety ceiling.
fn apply_stress_scar(graph: &mut StateGraph, name: &str, config: &NeurogenesisConfig) -> Result<()> {
    if !graph.contains("anxiety") {
        return Ok(());
    }
    graph.set_weight(name, "anxiety", config.stress_inhibition);
    graph.set_weight("anxiety", name, config.stress_inhibition * REVERSE_FACTOR);

    let current = graph.ceiling("anxiety").unwrap_or(100.0);
    let lowered = (current - config.anxiety_ceiling_step).max(config.anxiety_ceiling_floor);
    if lowered < current {
        graph.set_ceiling("anxiety", lowered)?;
        tracing::info!(neuron = %name, ceiling = lowered, "Anxiety ceiling lowered");
    }
    Ok(())
}
