//! Runtime growth and pruning of the network.
//!
//! Three counters (novelty, stress, reward) accumulate pressure from the
//! creature's state and from external events. When one crosses its scaled
//! threshold, the cooldown has elapsed and the population is below the cap, a
//! neuron of that type is grown and the counter resets. As the population
//! nears the cap, weak or idle generated neurons are pruned.

pub mod creation;
pub mod pruning;
pub mod threshold;

pub use creation::{connection_template, create_neuron, next_name};
pub use pruning::{find_candidate, prune_probability, prune_weak_neurons, PruneReason};
pub use threshold::adjusted_threshold;

use crate::config::NeurogenesisConfig;
use crate::events::BrainEvent;
use crate::graph::StateGraph;
use crate::personality::Personality;
use rand::Rng;
use serde::{Deserialize, Serialize};
use squidmind_data::{NeurogenesisCounters, Trigger};

/// Magnitudes of discrete events pushed by the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalSignals {
    pub novelty_exposure: f32,
    pub sustained_stress: f32,
    pub recent_rewards: f32,
}

impl ExternalSignals {
    #[must_use]
    pub fn novelty(magnitude: f32) -> Self {
        Self {
            novelty_exposure: magnitude,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stress(magnitude: f32) -> Self {
        Self {
            sustained_stress: magnitude,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reward(magnitude: f32) -> Self {
        Self {
            recent_rewards: magnitude,
            ..Self::default()
        }
    }
}

/// What one check did to the network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeurogenesisOutcome {
    pub created: Option<String>,
    pub pruned: Option<String>,
    pub events: Vec<BrainEvent>,
}

#[derive(Debug, Clone)]
pub struct NeurogenesisEngine {
    config: NeurogenesisConfig,
    personality: Personality,
    counters: NeurogenesisCounters,
    last_creation: Option<f64>,
}

impl NeurogenesisEngine {
    #[must_use]
    pub fn new(config: NeurogenesisConfig, personality: Personality) -> Self {
        Self {
            config,
            personality,
            counters: NeurogenesisCounters::default(),
            last_creation: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NeurogenesisConfig {
        &self.config
    }

    #[must_use]
    pub fn counters(&self) -> NeurogenesisCounters {
        self.counters
    }

    #[must_use]
    pub fn last_creation(&self) -> Option<f64> {
        self.last_creation
    }

    /// Overwrites one counter, clamped into `[0, counter_cap]`.
    pub fn set_counter(&mut self, trigger: Trigger, value: f32) {
        *self.counters.get_mut(trigger) = sanitize(value, self.config.counter_cap);
    }

    /// Restores persisted counter state.
    pub fn restore(&mut self, counters: NeurogenesisCounters, last_creation: Option<f64>) {
        for trigger in Trigger::PRIORITY {
            self.set_counter(trigger, counters.get(trigger));
        }
        self.last_creation = last_creation;
    }

    #[must_use]
    pub fn threshold(&self, trigger: Trigger, graph: &StateGraph) -> f32 {
        adjusted_threshold(&self.config, trigger, graph.generated_count())
    }

    #[must_use]
    pub fn cooldown_elapsed(&self, now: f64) -> bool {
        self.last_creation
            .map_or(true, |last| now - last >= self.config.cooldown_secs)
    }

    /// Whether the population cap blocks growth. Only enforced while pruning
    /// is enabled.
    #[must_use]
    pub fn at_capacity(&self, graph: &StateGraph) -> bool {
        self.config.pruning_enabled && graph.generated_count() >= self.config.max_neurons
    }

    /// Adds this tick's state-derived and external increments.
    pub fn accumulate(&mut self, graph: &StateGraph, signals: &ExternalSignals) {
        let c = &self.config;
        let stat = |name: &str| graph.value_or(name, 50.0);

        let mut novelty = positive(signals.novelty_exposure);
        if stat("curiosity") > c.curiosity_high {
            novelty += c.novelty_increment;
        }

        let mut stress = positive(signals.sustained_stress);
        if stat("anxiety") > c.anxiety_high || stat("cleanliness") < c.cleanliness_low {
            stress += c.stress_increment;
        }
        if stat("anxiety") > c.anxiety_extreme {
            stress += c.emergency_stress_increment;
        }

        let mut reward = positive(signals.recent_rewards);
        if stat("happiness") > c.reward_high || stat("satisfaction") > c.reward_high {
            reward += c.reward_increment;
        }

        let cap = c.counter_cap;
        self.counters.novelty = sanitize(self.counters.novelty + novelty, cap);
        self.counters.stress = sanitize(self.counters.stress + stress, cap);
        self.counters.reward = sanitize(self.counters.reward + reward, cap);
    }

    /// First trigger, in priority order, whose counter exceeds its scaled
    /// threshold.
    #[must_use]
    pub fn ready_trigger(&self, graph: &StateGraph) -> Option<Trigger> {
        Trigger::PRIORITY
            .into_iter()
            .find(|&t| self.counters.get(t) > self.threshold(t, graph))
    }

    /// One full neurogenesis step: accumulate, maybe grow, maybe prune, decay.
    pub fn check<R: Rng>(
        &mut self,
        graph: &mut StateGraph,
        signals: &ExternalSignals,
        now: f64,
        rng: &mut R,
    ) -> NeurogenesisOutcome {
        let mut outcome = NeurogenesisOutcome::default();
        self.accumulate(graph, signals);

        if let Some(trigger) = self.ready_trigger(graph) {
            if !self.cooldown_elapsed(now) {
                tracing::debug!(trigger = ?trigger, "Neurogenesis on cooldown");
            } else if self.at_capacity(graph) {
                tracing::debug!(trigger = ?trigger, "Neurogenesis blocked by population cap");
            } else {
                self.grow(graph, trigger, now, rng, &mut outcome);
            }
        }

        if self.config.pruning_enabled {
            let p = prune_probability(
                graph.generated_count(),
                self.config.max_neurons,
                self.config.prune_start_fraction,
            );
            if p > 0.0 && rng.gen::<f32>() < p {
                if let Some(event) = prune_weak_neurons(graph, &self.config, now) {
                    if let BrainEvent::NeuronPruned { name, .. } = &event {
                        outcome.pruned = Some(name.clone());
                    }
                    outcome.events.push(event);
                }
            }
        }

        self.decay();
        outcome
    }

    /// Grows a neuron immediately, ignoring thresholds and cooldown.
    ///
    /// Still refuses when the population cap is reached.
    pub fn force_create<R: Rng>(
        &mut self,
        graph: &mut StateGraph,
        trigger: Trigger,
        now: f64,
        rng: &mut R,
    ) -> Option<BrainEvent> {
        if self.at_capacity(graph) {
            tracing::debug!(trigger = ?trigger, "Forced creation blocked by population cap");
            return None;
        }
        let mut outcome = NeurogenesisOutcome::default();
        self.grow(graph, trigger, now, rng, &mut outcome);
        outcome.events.pop()
    }

    fn grow<R: Rng>(
        &mut self,
        graph: &mut StateGraph,
        trigger: Trigger,
        now: f64,
        rng: &mut R,
        outcome: &mut NeurogenesisOutcome,
    ) {
        let counter_value = self.counters.get(trigger);
        match create_neuron(graph, trigger, &self.config, self.personality, counter_value, now, rng) {
            Ok(event) => {
                if let BrainEvent::NeuronCreated { name, .. } = &event {
                    outcome.created = Some(name.clone());
                }
                outcome.events.push(event);
                *self.counters.get_mut(trigger) = 0.0;
                self.last_creation = Some(now);
            }
            Err(err) => tracing::warn!(trigger = ?trigger, error = %err, "Neuron creation failed"),
        }
    }

    /// Multiplicative decay of all three counters.
    pub fn decay(&mut self) {
        let factor = self.config.decay;
        for trigger in Trigger::PRIORITY {
            let counter = self.counters.get_mut(trigger);
            *counter = (*counter * factor).max(0.0);
        }
    }
}

fn positive(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn sanitize(v: f32, cap: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, cap)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Snapshot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use squidmind_data::NeuronValue;

    fn engine() -> NeurogenesisEngine {
        NeurogenesisEngine::new(NeurogenesisConfig::default(), Personality::Greedy)
    }

    fn set(graph: &mut StateGraph, name: &str, value: f32) {
        let mut snapshot = Snapshot::new();
        snapshot.insert(name.to_string(), NeuronValue::Number(value));
        graph.update(&snapshot);
    }

    #[test]
    fn test_novelty_threshold_crossing() {
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        engine.set_counter(Trigger::Novelty, 2.9);
        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 0.0, &mut rng);
        assert!(outcome.created.is_none());
        assert_eq!(graph.generated_count(), 0);

        engine.set_counter(Trigger::Novelty, 3.1);
        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 1.0, &mut rng);
        assert_eq!(outcome.created.as_deref(), Some("novel_0"));
        assert_eq!(graph.generated_count(), 1);
        assert_eq!(engine.counters().novelty, 0.0);
        assert_eq!(engine.last_creation(), Some(1.0));
    }

    #[test]
    fn test_state_increments() {
        let mut graph = StateGraph::with_core_neurons(0.0);
        set(&mut graph, "curiosity", 80.0);
        set(&mut graph, "anxiety", 97.0);
        set(&mut graph, "satisfaction", 90.0);
        let mut engine = engine();

        engine.accumulate(&graph, &ExternalSignals::default());
        let c = engine.counters();
        assert!((c.novelty - 0.1).abs() < 1e-6);
        assert!((c.stress - 2.75).abs() < 1e-6);
        assert!((c.reward - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_external_signals_and_cap() {
        let graph = StateGraph::with_core_neurons(0.0);
        let mut engine = engine();
        engine.accumulate(&graph, &ExternalSignals::novelty(250.0));
        engine.accumulate(&graph, &ExternalSignals::stress(-4.0));
        engine.accumulate(&graph, &ExternalSignals::reward(f32::NAN));
        let c = engine.counters();
        assert_eq!(c.novelty, 100.0);
        assert_eq!(c.stress, 0.0);
        assert_eq!(c.reward, 0.0);
    }

    #[test]
    fn test_priority_order() {
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        engine.set_counter(Trigger::Stress, 5.0);
        engine.set_counter(Trigger::Reward, 5.0);

        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 0.0, &mut rng);
        assert_eq!(outcome.created.as_deref(), Some("stress_0"));
        assert!(engine.counters().reward > 0.0);
    }

    #[test]
    fn test_cooldown_blocks_second_creation() {
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        engine.set_counter(Trigger::Reward, 5.0);
        engine.check(&mut graph, &ExternalSignals::default(), 0.0, &mut rng);
        engine.set_counter(Trigger::Reward, 5.0);
        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 100.0, &mut rng);
        assert!(outcome.created.is_none());

        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 400.0, &mut rng);
        assert_eq!(outcome.created.as_deref(), Some("reward_1"));
    }

    #[test]
    fn test_cap_only_with_pruning() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = NeurogenesisConfig {
            max_neurons: 1,
            cooldown_secs: 0.0,
            pruning_enabled: false,
            ..Default::default()
        };
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = NeurogenesisEngine::new(config, Personality::Greedy);
        for t in 0..3 {
            engine.set_counter(Trigger::Reward, 50.0);
            engine.check(&mut graph, &ExternalSignals::default(), t as f64, &mut rng);
        }
        assert_eq!(graph.generated_count(), 3);
    }

    #[test]
    fn test_force_create_respects_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let config = NeurogenesisConfig {
            max_neurons: 1,
            ..Default::default()
        };
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = NeurogenesisEngine::new(config, Personality::Greedy);

        assert!(engine.force_create(&mut graph, Trigger::Novelty, 0.0, &mut rng).is_some());
        assert!(engine.force_create(&mut graph, Trigger::Novelty, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_counters_decay_after_check() {
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        engine.set_counter(Trigger::Novelty, 2.0);
        engine.check(&mut graph, &ExternalSignals::default(), 0.0, &mut rng);
        assert!((engine.counters().novelty - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_full_population_prunes() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let config = NeurogenesisConfig {
            max_neurons: 2,
            ..Default::default()
        };
        let mut graph = StateGraph::with_core_neurons(0.0);
        let mut engine = NeurogenesisEngine::new(config, Personality::Greedy);
        engine.force_create(&mut graph, Trigger::Novelty, 0.0, &mut rng);
        engine.force_create(&mut graph, Trigger::Reward, 0.0, &mut rng);
        let links: Vec<(String, String)> = graph
            .weights()
            .filter(|(f, t, _)| [*f, *t].iter().any(|n| *n == "novel_0" || *n == "reward_0"))
            .map(|(f, t, _)| (f.to_string(), t.to_string()))
            .collect();
        for (from, to) in links {
            graph.set_weight(&from, &to, 0.01);
        }

        let outcome = engine.check(&mut graph, &ExternalSignals::default(), 1.0, &mut rng);
        assert_eq!(outcome.pruned.as_deref(), Some("novel_0"));
        assert_eq!(graph.generated_count(), 1);
    }
}
