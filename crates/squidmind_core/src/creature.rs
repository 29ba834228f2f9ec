//! Per-creature session context.
//!
//! A [`Creature`] owns every piece of cognitive state for one squid and runs
//! the components on their cadences. The owner drives it with [`Creature::tick`]
//! from a single thread; nothing here is global.

use crate::config::AppConfig;
use crate::decision::{Decision, DecisionEngine, Environment, Intent};
use crate::error::Result;
use crate::events::{BrainEvent, EventSink, NullSink};
use crate::graph::{Snapshot, StateGraph};
use crate::hebbian::HebbianLearner;
use crate::memory::{MemoryStore, ReviewReport, ShortTermInsert};
use crate::metrics::Metrics;
use crate::neurogenesis::{ExternalSignals, NeurogenesisEngine};
use crate::personality::Personality;
use rand::Rng;
use squidmind_data::{MemoryValue, SavedCreature, Trigger, SAVE_FORMAT_VERSION};
use std::time::Instant;
use uuid::Uuid;

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub decision: Option<Decision>,
    pub created: Option<String>,
    pub pruned: Option<String>,
    pub weight_updates: usize,
    /// Weak connections dropped ahead of this tick's learning pass.
    pub connections_pruned: usize,
    pub decayed: bool,
    pub review: Option<ReviewReport>,
    /// The autosave interval elapsed; the owner should persist a snapshot.
    pub autosave_due: bool,
}

#[derive(Debug, Clone, Copy)]
struct Clocks {
    hebbian: f64,
    decay: f64,
    review: f64,
    autosave: f64,
}

impl Clocks {
    fn starting_at(now: f64) -> Self {
        Self {
            hebbian: now,
            decay: now,
            review: now,
            autosave: now,
        }
    }
}

fn due(last: &mut f64, interval: f64, now: f64) -> bool {
    if now - *last >= interval {
        *last = now;
        true
    } else {
        false
    }
}

pub struct Creature {
    id: Uuid,
    personality: Personality,
    config: AppConfig,
    graph: StateGraph,
    neurogenesis: NeurogenesisEngine,
    learner: HebbianLearner,
    memory: MemoryStore,
    decisions: DecisionEngine,
    paused: bool,
    clocks: Clocks,
    last_tick: f64,
    metrics: Metrics,
    sink: Box<dyn EventSink>,
}

impl std::fmt::Debug for Creature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("personality", &self.personality)
            .field("neurons", &self.graph.neuron_count())
            .field("weights", &self.graph.weight_count())
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl Creature {
    #[must_use]
    pub fn new(personality: Personality, config: AppConfig, now: f64) -> Self {
        tracing::info!(personality = %personality, "Creature created");
        Self {
            id: Uuid::new_v4(),
            personality,
            graph: StateGraph::with_core_neurons(now),
            neurogenesis: NeurogenesisEngine::new(config.neurogenesis.clone(), personality),
            learner: HebbianLearner::new(config.hebbian.clone(), personality),
            memory: MemoryStore::new(config.memory.clone()),
            decisions: DecisionEngine::new(config.decision.clone()),
            config,
            paused: false,
            clocks: Clocks::starting_at(now),
            last_tick: now,
            metrics: Metrics::new(),
            sink: Box::new(NullSink),
        }
    }

    /// Creates a creature from a personality name.
    pub fn with_personality_id(id: &str, config: AppConfig, now: f64) -> Result<Self> {
        Ok(Self::new(id.parse()?, config, now))
    }

    /// Rebuilds a creature from a save.
    pub fn from_saved(saved: SavedCreature, config: AppConfig) -> Result<Self> {
        let personality: Personality = saved.personality.parse()?;
        let mut creature = Self::new(personality, config, saved.saved_at);
        creature.import_state(saved)?;
        Ok(creature)
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn emit(&mut self, event: &BrainEvent) {
        self.sink.record(event);
    }

    /// One simulation step.
    ///
    /// Order: state sync, neurogenesis, Hebbian learning and weight decay on
    /// their cadences, memory review on its cadence, then the decision.
    pub fn tick<R: Rng>(
        &mut self,
        snapshot: &Snapshot,
        signals: &ExternalSignals,
        environment: Environment,
        now: f64,
        rng: &mut R,
    ) -> TickReport {
        if self.paused {
            return TickReport::default();
        }
        let start = Instant::now();
        let mut report = TickReport::default();
        self.last_tick = now;

        self.graph.update(snapshot);

        let outcome = self.neurogenesis.check(&mut self.graph, signals, now, rng);
        if outcome.created.is_some() {
            self.metrics.record_neuron_created();
        }
        if outcome.pruned.is_some() {
            self.metrics.record_neuron_pruned();
        }
        for event in &outcome.events {
            self.emit(event);
        }
        report.created = outcome.created;
        report.pruned = outcome.pruned;

        let cadence = self.config.cadence.clone();
        if due(&mut self.clocks.hebbian, cadence.hebbian_secs, now) {
            if self.config.neurogenesis.pruning_enabled {
                let removed = self.learner.prune_weak_connections(&mut self.graph, now);
                report.connections_pruned = removed;
                if removed > 0 {
                    self.metrics.increment_counter("connections_pruned");
                }
            }
            let boosted = self.learner.memory_boosts(&self.memory);
            let updates = self.learner.tick(&mut self.graph, &boosted, now, rng);
            report.weight_updates = updates.len();
            self.metrics.record_weight_updates(updates.len());
            for update in updates {
                self.emit(&BrainEvent::WeightChanged { update, at: now });
            }
        }
        if due(&mut self.clocks.decay, cadence.weight_decay_secs, now) {
            self.learner.decay(&mut self.graph);
            report.decayed = true;
        }
        if due(&mut self.clocks.review, cadence.memory_review_secs, now) {
            let review = self.memory.review_and_transfer(now);
            self.metrics.record_review(review.promoted, review.forgotten);
            report.review = Some(review);
        }

        report.decision = self.decide(environment, rng);
        report.autosave_due = due(&mut self.clocks.autosave, cadence.autosave_secs, now);

        self.metrics.record_tick(
            start.elapsed(),
            self.graph.neuron_count(),
            self.graph.weight_count(),
        );
        report
    }

    /// Chooses the next action without advancing any cadence.
    ///
    /// Returns `None` while paused; nothing is marked or counted. Falling
    /// asleep raises `is_sleeping` and points `direction` down; waking up is
    /// left to the owner through [`Creature::set_flag`].
    pub fn decide<R: Rng>(&mut self, environment: Environment, rng: &mut R) -> Option<Decision> {
        if self.paused {
            return None;
        }
        let ctx = self
            .decisions
            .context(self.personality, &self.graph, &self.memory, environment);
        let decision = self.decisions.decide(&ctx, rng);
        let asleep = ctx.flags.get("is_sleeping").copied().unwrap_or(false);
        if matches!(decision.intent, Intent::Sleep) && !asleep {
            let _ = self.graph.set_flag("is_sleeping", true);
            let _ = self.graph.set_flag("direction", "down");
            tracing::debug!("Fell asleep");
        }
        if decision.weights.is_some() {
            for (category, key) in &ctx.consulted {
                self.memory.mark_accessed(category, key);
            }
        } else {
            self.metrics
                .increment_counter(&format!("override.{}", decision.label()));
        }
        self.metrics.record_decision();
        Some(decision)
    }

    /// Explicit write path for transient flags and single values.
    pub fn set_flag(&mut self, name: &str, value: impl Into<squidmind_data::NeuronValue>) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        self.graph.set_flag(name, value)
    }

    /// Stores the outcome of an executed action as a short-term memory.
    pub fn record_outcome(
        &mut self,
        category: &str,
        key: &str,
        value: MemoryValue,
        importance: f32,
        now: f64,
    ) -> Option<ShortTermInsert> {
        if self.paused {
            return None;
        }
        Some(
            self.memory
                .add_short_term(category, key, value, importance, Vec::new(), now),
        )
    }

    /// Grows a neuron of the given type right away.
    pub fn stimulate<R: Rng>(&mut self, trigger: Trigger, now: f64, rng: &mut R) -> Option<String> {
        if self.paused {
            return None;
        }
        let event = self
            .neurogenesis
            .force_create(&mut self.graph, trigger, now, rng)?;
        self.metrics.record_neuron_created();
        self.emit(&event);
        match event {
            BrainEvent::NeuronCreated { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Flat copy of all persistent state.
    #[must_use]
    pub fn export_state(&self) -> SavedCreature {
        SavedCreature {
            version: SAVE_FORMAT_VERSION,
            id: self.id,
            personality: self.personality.to_string(),
            neurons: self.graph.neurons().to_vec(),
            weights: self.graph.weight_entries(),
            ceilings: self.graph.ceilings().clone(),
            short_term: self.memory.short_term().cloned().collect(),
            long_term: self.memory.long_term().to_vec(),
            counters: self.neurogenesis.counters(),
            last_neuron_time: self.neurogenesis.last_creation(),
            saved_at: self.last_tick,
            config_fingerprint: self.config.fingerprint(),
        }
    }

    /// Replaces all persistent state with a save.
    ///
    /// Fails without touching the creature when the save names an unknown
    /// personality or a duplicate neuron.
    pub fn import_state(&mut self, saved: SavedCreature) -> Result<()> {
        let personality: Personality = saved.personality.parse()?;
        let graph = StateGraph::from_parts(saved.neurons, &saved.weights, saved.ceilings)?;

        if !saved.config_fingerprint.is_empty()
            && saved.config_fingerprint != self.config.fingerprint()
        {
            tracing::warn!("Save was produced with a different configuration");
        }

        self.id = saved.id;
        self.personality = personality;
        self.graph = graph;
        self.neurogenesis = NeurogenesisEngine::new(self.config.neurogenesis.clone(), personality);
        self.neurogenesis
            .restore(saved.counters, saved.last_neuron_time);
        self.learner = HebbianLearner::new(self.config.hebbian.clone(), personality);
        self.memory.restore(saved.short_term, saved.long_term);
        self.last_tick = saved.saved_at;
        self.clocks = Clocks::starting_at(saved.saved_at);

        tracing::info!(
            id = %self.id,
            neurons = self.graph.neuron_count(),
            weights = self.graph.weight_count(),
            "Creature state imported"
        );
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn personality(&self) -> Personality {
        self.personality
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    #[must_use]
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    #[must_use]
    pub fn neurogenesis(&self) -> &NeurogenesisEngine {
        &self.neurogenesis
    }

    pub fn neurogenesis_mut(&mut self) -> &mut NeurogenesisEngine {
        &mut self.neurogenesis
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Simulated time of the last tick, or of creation/import.
    #[must_use]
    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }
}
