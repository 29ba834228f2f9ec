//! Headless simulation driver.
//!
//! [`Aquarium`] stands in for the world the engine normally lives in: it owns
//! the physiological stats, drifts them over time, drops food and rocks, and
//! carries out whatever intent the brain picks. [`App`] wires an aquarium to a
//! [`Creature`], persists snapshots through the autosave worker and keeps a
//! run summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use squidmind_core::decision::ExploreStyle;
use squidmind_core::{
    AppConfig, Creature, Decision, Environment, ExternalSignals, Intent, MemoryValue, NeuronValue,
    Personality, Snapshot, Status, TickReport,
};
use squidmind_io::{AutosaveWorker, NeurogenesisJournal, SaveManager, AUTOSAVE_SLOT, MANUAL_SLOT};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

const STATS: [&str; 7] = [
    "hunger",
    "happiness",
    "cleanliness",
    "sleepiness",
    "satisfaction",
    "anxiety",
    "curiosity",
];

const TANK_WIDTH: f32 = 1200.0;
const TANK_HEIGHT: f32 = 900.0;

/// Memory category the decision engine reads effects from.
const EXPERIENCES: &str = "experiences";
/// Memory category whose effects feed Hebbian learning.
const DECORATIONS: &str = "decorations";

/// Result of carrying out an intent, stored as a memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub category: &'static str,
    pub key: &'static str,
    pub effects: Vec<(&'static str, f32)>,
    pub importance: f32,
}

/// Scripted stand-in for the tank, the food and the decorations.
#[derive(Debug, Clone)]
pub struct Aquarium {
    stats: BTreeMap<&'static str, f32>,
    food: Option<(f32, f32)>,
    nearby_rock: Option<u32>,
    carrying_rock: bool,
    decoration_nearby: bool,
    sleeping: bool,
    direction: &'static str,
    next_rock_id: u32,
    pending: ExternalSignals,
}

impl Default for Aquarium {
    fn default() -> Self {
        Self::new()
    }
}

impl Aquarium {
    #[must_use]
    pub fn new() -> Self {
        let stats = STATS
            .iter()
            .map(|&s| {
                let start = match s {
                    "hunger" => 25.0,
                    "sleepiness" => 30.0,
                    "anxiety" => 10.0,
                    _ => 50.0,
                };
                (s, start)
            })
            .collect();
        Self {
            stats,
            food: None,
            nearby_rock: None,
            carrying_rock: false,
            decoration_nearby: false,
            sleeping: false,
            direction: "left",
            next_rock_id: 1,
            pending: ExternalSignals::default(),
        }
    }

    #[must_use]
    pub fn stat(&self, name: &str) -> f32 {
        self.stats.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_stat(&mut self, name: &'static str, value: f32) {
        self.stats.insert(name, value.clamp(0.0, 100.0));
    }

    fn adjust(&mut self, name: &'static str, delta: f32) {
        let value = self.stat(name) + delta;
        self.set_stat(name, value);
    }

    #[must_use]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Current stat values in the form the brain syncs from.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.stats
            .iter()
            .map(|(name, value)| (name.to_string(), NeuronValue::Number(*value)))
            .collect()
    }

    #[must_use]
    pub fn direction(&self) -> &'static str {
        self.direction
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        Environment {
            food: self.food,
            nearby_rock: self.nearby_rock,
            carrying_rock: self.carrying_rock,
            decoration_nearby: self.decoration_nearby,
        }
    }

    /// Signals gathered since the last call.
    pub fn take_signals(&mut self) -> ExternalSignals {
        std::mem::take(&mut self.pending)
    }

    /// Advances the passive world by `dt` seconds.
    pub fn drift<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.sleeping {
            self.adjust("sleepiness", -0.5 * dt);
            if self.stat("sleepiness") <= 5.0 {
                self.sleeping = false;
                tracing::debug!("Woke up");
            }
        } else {
            self.adjust("hunger", 0.1 * dt);
            self.adjust("sleepiness", 0.1 * dt);
        }
        self.adjust("happiness", -0.1 * dt);
        self.adjust("cleanliness", -0.1 * dt);

        let uneasy = self.stat("cleanliness") < 30.0 || self.stat("hunger") > 70.0;
        self.adjust("anxiety", if uneasy { 0.5 * dt } else { -0.5 * dt });
        let calm = self.stat("anxiety") < 50.0;
        self.adjust("curiosity", if calm { 0.2 * dt } else { -0.2 * dt });
        let fed = self.stat("hunger") < 60.0;
        self.adjust("satisfaction", if fed { 0.05 * dt } else { -0.1 * dt });

        if self.food.is_none() && rng.gen_bool(f64::from((0.02 * dt).min(1.0))) {
            let spot = (rng.gen_range(0.0..TANK_WIDTH), rng.gen_range(0.0..TANK_HEIGHT));
            self.food = Some(spot);
            tracing::debug!(x = spot.0, y = spot.1, "Food dropped");
        }
        if self.nearby_rock.is_none()
            && !self.carrying_rock
            && rng.gen_bool(f64::from((0.01 * dt).min(1.0)))
        {
            self.nearby_rock = Some(self.next_rock_id);
            self.next_rock_id += 1;
            self.pending.novelty_exposure += 0.5;
        }
        if rng.gen_bool(f64::from((0.005 * dt).min(1.0))) {
            self.decoration_nearby = !self.decoration_nearby;
            if self.decoration_nearby {
                self.pending.novelty_exposure += 0.3;
            }
        }
        if rng.gen_bool(f64::from((0.002 * dt).min(1.0))) {
            self.adjust("anxiety", 15.0);
            self.pending.sustained_stress += 0.5;
            tracing::debug!("Startled");
        }
    }

    /// Carries out a decision. Returns the outcome worth remembering.
    pub fn apply<R: Rng>(&mut self, decision: &Decision, rng: &mut R) -> Option<Outcome> {
        match &decision.intent {
            Intent::MoveToFood { .. } => {
                self.food = None;
                let effects = vec![("hunger", -20.0), ("happiness", 10.0), ("satisfaction", 10.0)];
                self.apply_effects(&effects);
                self.pending.recent_rewards += 0.5;
                Some(Outcome {
                    category: EXPERIENCES,
                    key: "ate_food",
                    effects,
                    importance: 2.0,
                })
            }
            Intent::ApproachObject { .. } => {
                self.nearby_rock = None;
                self.carrying_rock = rng.gen_bool(0.5);
                let effects = vec![("curiosity", -5.0), ("happiness", 3.0)];
                self.apply_effects(&effects);
                Some(Outcome {
                    category: EXPERIENCES,
                    key: "played_with_rock",
                    effects,
                    importance: 1.5,
                })
            }
            Intent::Throw { direction } => {
                self.carrying_rock = false;
                self.direction = if direction == "right" { "right" } else { "left" };
                let effects = vec![("happiness", 5.0), ("satisfaction", 3.0)];
                self.apply_effects(&effects);
                self.pending.recent_rewards += 0.3;
                Some(Outcome {
                    category: EXPERIENCES,
                    key: "threw_rock",
                    effects,
                    importance: 1.5,
                })
            }
            Intent::Organize => {
                let effects = vec![("satisfaction", 5.0), ("cleanliness", 2.0)];
                self.apply_effects(&effects);
                Some(Outcome {
                    category: DECORATIONS,
                    key: "organized_decorations",
                    effects,
                    importance: 1.0,
                })
            }
            Intent::Flee { erratic } => {
                self.adjust("anxiety", if *erratic { -2.0 } else { -5.0 });
                self.direction = if rng.gen_bool(0.5) { "left" } else { "right" };
                None
            }
            Intent::Sleep => {
                self.sleeping = true;
                None
            }
            Intent::Explore { style } => {
                let cost = match style {
                    ExploreStyle::Slow => 0.5,
                    ExploreStyle::Normal => 1.0,
                    ExploreStyle::Erratic => 2.0,
                };
                self.adjust("curiosity", -cost);
                if rng.gen_bool(0.05) {
                    self.direction = if self.direction == "left" { "right" } else { "left" };
                }
                None
            }
            Intent::None => {
                if decision.status == Status::Investigating {
                    self.adjust("curiosity", -10.0);
                    self.pending.novelty_exposure += 0.2;
                }
                None
            }
        }
    }

    fn apply_effects(&mut self, effects: &[(&'static str, f32)]) {
        for &(stat, delta) in effects {
            self.adjust(stat, delta);
        }
    }
}

/// Run parameters.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub personality: Personality,
    pub config: AppConfig,
    pub seed: Option<u64>,
    pub save_dir: Option<PathBuf>,
    pub journal: Option<PathBuf>,
    pub tick_secs: f64,
    /// Continue from the autosave slot when one exists.
    pub resume: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            personality: Personality::Adventurous,
            config: AppConfig::default(),
            seed: None,
            save_dir: None,
            journal: None,
            tick_secs: 1.0,
            resume: false,
        }
    }
}

/// End-of-run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub creature: uuid::Uuid,
    pub personality: String,
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub ticks: u64,
    pub simulated_secs: f64,
    pub neurons: usize,
    pub connections: usize,
    pub network_health: f32,
    pub grown: Vec<String>,
    pub pruned: Vec<String>,
    pub short_term_memories: usize,
    pub long_term_memories: usize,
    pub statuses: BTreeMap<String, u64>,
    pub saves_written: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Creature {} ({})", self.creature, self.personality)?;
        writeln!(
            f,
            "  {} ticks, {:.0}s simulated, seed {}",
            self.ticks, self.simulated_secs, self.seed
        )?;
        writeln!(
            f,
            "  Network: {} neurons, {} connections, health {:.1}%",
            self.neurons, self.connections, self.network_health
        )?;
        writeln!(f, "  Grown: {}", list_or_none(&self.grown))?;
        writeln!(f, "  Pruned: {}", list_or_none(&self.pruned))?;
        writeln!(
            f,
            "  Memories: {} short-term, {} long-term",
            self.short_term_memories, self.long_term_memories
        )?;
        let statuses = self
            .statuses
            .iter()
            .map(|(status, n)| format!("{status} {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "  Statuses: {statuses}")?;
        write!(f, "  Saves written: {}", self.saves_written)
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.join(", ")
    }
}

pub struct App {
    pub creature: Creature,
    pub aquarium: Aquarium,
    rng: ChaCha8Rng,
    seed: u64,
    now: f64,
    tick_secs: f64,
    ticks: u64,
    started_at: DateTime<Utc>,
    saves: Option<SaveManager>,
    autosave: Option<AutosaveWorker>,
    statuses: BTreeMap<String, u64>,
    grown: Vec<String>,
    pruned: Vec<String>,
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self> {
        anyhow::ensure!(
            options.tick_secs.is_finite() && options.tick_secs > 0.0,
            "tick length must be positive"
        );
        let seed = options
            .seed
            .or(options.config.seed)
            .unwrap_or_else(rand::random);

        let saves = options
            .save_dir
            .as_ref()
            .map(SaveManager::new)
            .transpose()
            .context("opening save directory")?;

        let resumed = match &saves {
            Some(saves) if options.resume && saves.exists(AUTOSAVE_SLOT) => {
                let saved = saves.load(AUTOSAVE_SLOT).context("loading autosave")?;
                Some(Creature::from_saved(saved, options.config.clone())?)
            }
            _ => None,
        };
        let mut creature = match resumed {
            Some(creature) => {
                tracing::info!(id = %creature.id(), "Resuming from autosave");
                creature
            }
            None => Creature::new(options.personality, options.config.clone(), 0.0),
        };
        let now = creature.last_tick();

        if let Some(path) = &options.journal {
            let journal = NeurogenesisJournal::open(path)
                .with_context(|| format!("opening journal {}", path.display()))?;
            creature.set_sink(Box::new(journal));
        }

        let autosave = saves.clone().map(AutosaveWorker::new).transpose()?;

        tracing::info!(
            personality = %creature.personality(),
            seed,
            tick_secs = options.tick_secs,
            "Simulation ready"
        );

        Ok(Self {
            creature,
            aquarium: Aquarium::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            now,
            tick_secs: options.tick_secs,
            ticks: 0,
            started_at: Utc::now(),
            saves,
            autosave,
            statuses: BTreeMap::new(),
            grown: Vec::new(),
            pruned: Vec::new(),
        })
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// One simulated tick: world drift, brain tick, then acting on the
    /// decision.
    pub fn step(&mut self) -> Result<TickReport> {
        self.now += self.tick_secs;
        self.ticks += 1;
        self.aquarium.drift(self.tick_secs as f32, &mut self.rng);

        self.creature
            .set_flag("is_sleeping", self.aquarium.is_sleeping())?;
        self.creature
            .set_flag("direction", self.aquarium.direction())?;
        let signals = self.aquarium.take_signals();
        let report = self.creature.tick(
            &self.aquarium.snapshot(),
            &signals,
            self.aquarium.environment(),
            self.now,
            &mut self.rng,
        );

        if let Some(name) = &report.created {
            self.grown.push(name.clone());
        }
        if let Some(name) = &report.pruned {
            self.pruned.push(name.clone());
        }
        if let Some(decision) = &report.decision {
            *self.statuses.entry(decision.label().to_string()).or_insert(0) += 1;
            if let Some(outcome) = self.aquarium.apply(decision, &mut self.rng) {
                let value = MemoryValue::effects(
                    outcome.effects.iter().map(|(s, d)| (*s, f64::from(*d))),
                );
                self.creature
                    .record_outcome(outcome.category, outcome.key, value, outcome.importance, self.now);
            }
        }
        if report.autosave_due {
            if let Some(worker) = &self.autosave {
                worker.submit(self.creature.export_state())?;
            }
        }
        Ok(report)
    }

    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Writes a manual save and stops the autosave worker.
    pub fn finish(mut self) -> Result<RunSummary> {
        let mut saves_written = 0;
        if let Some(worker) = self.autosave.take() {
            worker.submit_to(MANUAL_SLOT, self.creature.export_state())?;
            saves_written = worker.shutdown()?;
            if let Some(saves) = &self.saves {
                tracing::info!(dir = %saves.dir().display(), "Saves written");
            }
        }

        let graph = self.creature.graph();
        let memory = self.creature.memory();
        Ok(RunSummary {
            creature: self.creature.id(),
            personality: self.creature.personality().to_string(),
            seed: self.seed,
            started_at: self.started_at,
            ticks: self.ticks,
            simulated_secs: self.ticks as f64 * self.tick_secs,
            neurons: graph.neuron_count(),
            connections: graph.weight_count(),
            network_health: graph.network_health(),
            grown: self.grown,
            pruned: self.pruned,
            short_term_memories: memory.short_term_len(),
            long_term_memories: memory.long_term_len(),
            statuses: self.statuses,
            saves_written,
        })
    }
}
