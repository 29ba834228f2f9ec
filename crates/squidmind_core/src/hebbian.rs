//! Hebbian learning over co-active neurons.
//!
//! Each learning tick samples a bounded number of active pairs and nudges one
//! directed weight of each pair by the product of their normalized
//! activations. Freshly grown neurons are force-included and additionally
//! wired toward the affect neurons so they never float disconnected. Stats
//! boosted by remembered decorations count as active too.

use crate::config::HebbianConfig;
use crate::graph::StateGraph;
use crate::memory::MemoryStore;
use crate::personality::Personality;
use rand::seq::index;
use rand::Rng;
use serde::Serialize;

/// Known stat pairs and what their association means.
static SEMANTIC_PAIRS: [(&str, &str, &str); 6] = [
    ("hunger", "satisfaction", "eating satisfies hunger"),
    ("curiosity", "happiness", "exploration is enjoyable"),
    ("anxiety", "cleanliness", "dirt causes stress"),
    ("sleepiness", "happiness", "rest improves mood"),
    ("anxiety", "curiosity", "fear limits exploration"),
    ("satisfaction", "happiness", "contentment lifts mood"),
];

/// Why a weight moved. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UpdateReason {
    CoActivation,
    StrongReinforcement,
    NewNeuronIntegration,
    Semantic(&'static str),
}

impl UpdateReason {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CoActivation => "co-activation",
            Self::StrongReinforcement => "strong reinforcement",
            Self::NewNeuronIntegration => "new neuron integration",
            Self::Semantic(label) => *label,
        }
    }
}

/// One applied weight change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightUpdate {
    pub from: String,
    pub to: String,
    pub old: f32,
    pub new: f32,
    pub delta: f32,
    pub reason: UpdateReason,
}

#[derive(Debug, Clone)]
pub struct HebbianLearner {
    config: HebbianConfig,
    personality: Personality,
}

impl HebbianLearner {
    #[must_use]
    pub fn new(config: HebbianConfig, personality: Personality) -> Self {
        Self {
            config,
            personality,
        }
    }

    #[must_use]
    pub fn config(&self) -> &HebbianConfig {
        &self.config
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.config.excluded_neurons.iter().any(|n| n == name)
    }

    fn is_new(&self, graph: &StateGraph, name: &str, now: f64) -> bool {
        graph
            .neuron(name)
            .is_some_and(|n| n.is_new(now, self.config.new_neuron_window_secs))
    }

    /// Names eligible for learning this tick: active neurons in graph order,
    /// then any `boosted` names not already included.
    #[must_use]
    pub fn active_neurons(&self, graph: &StateGraph, boosted: &[String], now: f64) -> Vec<String> {
        let mut active: Vec<String> = graph
            .neurons()
            .iter()
            .filter(|n| !self.is_excluded(&n.name))
            .filter(|n| {
                n.value.is_active(self.config.activation_threshold)
                    || n.is_new(now, self.config.new_neuron_window_secs)
            })
            .map(|n| n.name.clone())
            .collect();
        for name in boosted {
            if !self.is_excluded(name) && graph.contains(name) && !active.contains(name) {
                active.push(name.clone());
            }
        }
        active
    }

    /// Stats with a positive effect in short-term memories of the configured
    /// effect category, in first-seen order.
    #[must_use]
    pub fn memory_boosts(&self, memory: &MemoryStore) -> Vec<String> {
        let mut boosted: Vec<String> = Vec::new();
        let category = self.config.effect_memory_category.as_str();
        for record in memory.short_term().filter(|r| r.category == category) {
            let Some(effects) = record.value.as_effects() else {
                continue;
            };
            for (stat, boost) in effects {
                if *boost > 0.0 && !boosted.contains(stat) {
                    boosted.push(stat.clone());
                }
            }
        }
        boosted
    }

    /// Drops near-zero connections ahead of a learning pass.
    ///
    /// Links touching a generated neuron younger than
    /// `connection_min_age_secs` are kept. Returns how many were removed.
    pub fn prune_weak_connections(&self, graph: &mut StateGraph, now: f64) -> usize {
        let threshold = self.config.connection_prune_threshold;
        if threshold <= 0.0 {
            return 0;
        }
        let min_age = self.config.connection_min_age_secs;
        let young = |name: &str| graph.neuron(name).is_some_and(|n| n.is_new(now, min_age));
        let weak: Vec<(String, String)> = graph
            .weights()
            .filter(|(from, to, w)| w.abs() < threshold && !young(*from) && !young(*to))
            .map(|(from, to, _)| (from.to_string(), to.to_string()))
            .collect();
        for (from, to) in &weak {
            graph.remove_weight(from, to);
        }
        if !weak.is_empty() {
            tracing::debug!(count = weak.len(), threshold, "Pruned weak connections");
        }
        weak.len()
    }

    /// Runs one learning pass and returns every applied update.
    ///
    /// `boosted` names join the active set regardless of their value; see
    /// [`HebbianLearner::memory_boosts`].
    pub fn tick<R: Rng>(
        &self,
        graph: &mut StateGraph,
        boosted: &[String],
        now: f64,
        rng: &mut R,
    ) -> Vec<WeightUpdate> {
        let active = self.active_neurons(graph, boosted, now);
        if active.len() < 2 {
            return Vec::new();
        }

        let pair_count = active.len() * (active.len() - 1) / 2;
        let budget = self.config.sample_pairs.min(pair_count);
        let picks = index::sample(rng, pair_count, budget).into_vec();
        let sampled: Vec<(usize, usize)> = picks
            .into_iter()
            .map(|k| {
                let (i, j) = nth_pair(k, active.len());
                // Either direction of a pair may learn.
                if rng.gen_bool(0.5) {
                    (j, i)
                } else {
                    (i, j)
                }
            })
            .collect();

        let base_rate = self.config.learning_rate * self.personality.learning_modifier();
        let mut updates = Vec::with_capacity(budget);

        for (i, j) in sampled {
            let (a, b) = (&active[i], &active[j]);
            let boost = if self.is_new(graph, a, now) || self.is_new(graph, b, now) {
                self.config.new_neuron_boost
            } else {
                1.0
            };
            if let Some(update) = self.apply(graph, a, b, base_rate * boost, None) {
                updates.push(update);
            }
        }

        // Integration updates do not count against the sample budget.
        let integration_rate = base_rate * self.config.core_integration_boost;
        let new_names: Vec<&String> = active.iter().filter(|n| self.is_new(graph, n, now)).collect();
        for name in new_names {
            for target in &self.config.integration_targets {
                if target == name {
                    continue;
                }
                if let Some(update) = self.apply(
                    graph,
                    name,
                    target,
                    integration_rate,
                    Some(UpdateReason::NewNeuronIntegration),
                ) {
                    updates.push(update);
                }
            }
        }

        updates
    }

    fn apply(
        &self,
        graph: &mut StateGraph,
        from: &str,
        to: &str,
        rate: f32,
        reason: Option<UpdateReason>,
    ) -> Option<WeightUpdate> {
        let (Some(a), Some(b)) = (graph.neuron(from), graph.neuron(to)) else {
            tracing::debug!(from, to, "Skipping stale pair");
            return None;
        };
        let (v1, v2) = (a.value.normalized(), b.value.normalized());
        let delta = rate * v1 * v2;

        let old = graph.weight(from, to);
        graph.set_weight(from, to, old + delta);
        let new = graph.weight(from, to);

        let reason = reason.unwrap_or_else(|| self.infer_reason(from, to, delta));
        tracing::debug!(
            from,
            to,
            old_weight = old,
            new_weight = new,
            delta,
            reason = ?reason,
            "Weight updated"
        );
        Some(WeightUpdate {
            from: from.to_string(),
            to: to.to_string(),
            old,
            new,
            delta: new - old,
            reason,
        })
    }

    fn infer_reason(&self, from: &str, to: &str, delta: f32) -> UpdateReason {
        let semantic = SEMANTIC_PAIRS
            .iter()
            .find(|(a, b, _)| (*a == from && *b == to) || (*a == to && *b == from));
        if let Some((_, _, label)) = semantic {
            UpdateReason::Semantic(*label)
        } else if delta.abs() >= self.config.strong_change {
            UpdateReason::StrongReinforcement
        } else {
            UpdateReason::CoActivation
        }
    }

    /// Fades every connection by the configured decay rate.
    pub fn decay(&self, graph: &mut StateGraph) {
        graph.decay_weights(self.config.weight_decay);
    }
}

/// The `k`-th unordered pair `(i, j)` with `i < j < n`, in row order.
fn nth_pair(mut k: usize, n: usize) -> (usize, usize) {
    let mut i = 0;
    while k >= n - i - 1 {
        k -= n - i - 1;
        i += 1;
    }
    (i, i + 1 + k)
}
