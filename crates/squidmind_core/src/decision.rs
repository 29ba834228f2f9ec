//! Action selection.
//!
//! A decision is a pure function of the live neuron values, the environment,
//! recent memories, the personality and a random source. Critical
//! physiological states short-circuit into fixed statuses; otherwise every
//! action in a small vocabulary is scored, modified by personality, jittered,
//! and the best one is turned into an intent for the movement layer.

use crate::config::DecisionConfig;
use crate::error::{CoreError, Result};
use crate::graph::StateGraph;
use crate::memory::MemoryStore;
use crate::personality::Personality;
use rand::Rng;
use serde::{Deserialize, Serialize};
use squidmind_data::NeuronValue;
use std::collections::BTreeMap;
use std::fmt;

/// Scored action vocabulary. Declaration order breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Exploring,
    Eating,
    ApproachingRock,
    ThrowingRock,
    AvoidingThreat,
    Organizing,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Exploring,
        Action::Eating,
        Action::ApproachingRock,
        Action::ThrowingRock,
        Action::AvoidingThreat,
        Action::Organizing,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Exploring => "exploring",
            Self::Eating => "eating",
            Self::ApproachingRock => "approaching_rock",
            Self::ThrowingRock => "throwing_rock",
            Self::AvoidingThreat => "avoiding_threat",
            Self::Organizing => "organizing",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What the creature is doing, as reported to the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Act(Action),
    Sleeping,
    Panicking,
    Investigating,
}

impl Status {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Act(action) => action.label(),
            Self::Sleeping => "sleeping",
            Self::Panicking => "panicking",
            Self::Investigating => "investigating",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExploreStyle {
    Normal,
    Slow,
    Erratic,
}

/// Side effect requested from the movement collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    MoveToFood { x: f32, y: f32 },
    ApproachObject { id: u32 },
    Throw { direction: String },
    Organize,
    Flee { erratic: bool },
    Explore { style: ExploreStyle },
    Sleep,
    None,
}

/// Environment facts that are not neurons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Nearest visible food.
    pub food: Option<(f32, f32)>,
    /// Nearest rock that can be picked up.
    pub nearby_rock: Option<u32>,
    pub carrying_rock: bool,
    pub decoration_nearby: bool,
}

/// One score per action, indexed in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionWeights([f32; 6]);

impl DecisionWeights {
    #[must_use]
    pub fn get(&self, action: Action) -> f32 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, weight: f32) {
        self.0[action.index()] = weight.max(0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f32)> + '_ {
        Action::ALL.into_iter().map(|a| (a, self.get(a)))
    }

    /// Highest weight; the first declared action wins ties.
    #[must_use]
    pub fn best(&self) -> Action {
        let mut best = Action::Exploring;
        for (action, weight) in self.iter() {
            if weight > self.get(best) {
                best = action;
            }
        }
        best
    }
}

/// Everything one decision reads, assembled fresh each cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext {
    pub personality: Personality,
    /// Numeric neuron values after memory influence.
    pub state: BTreeMap<String, f32>,
    /// Numeric neuron values as pushed by the environment.
    pub live: BTreeMap<String, f32>,
    pub flags: BTreeMap<String, bool>,
    pub direction: Option<String>,
    pub environment: Environment,
    pub memory_influence: BTreeMap<String, f32>,
    /// `(category, key)` of every memory that contributed.
    pub consulted: Vec<(String, String)>,
}

impl DecisionContext {
    /// Context with no memory influence.
    #[must_use]
    pub fn from_values(
        personality: Personality,
        values: &[(&str, f32)],
        environment: Environment,
    ) -> Self {
        let state: BTreeMap<String, f32> = values
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        Self {
            personality,
            live: state.clone(),
            state,
            flags: BTreeMap::new(),
            direction: None,
            environment,
            memory_influence: BTreeMap::new(),
            consulted: Vec::new(),
        }
    }
}

/// A finished decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub status: Status,
    pub intent: Intent,
    /// Final jittered weights; `None` when an override fired.
    pub weights: Option<DecisionWeights>,
    /// The scored winner could not be carried out.
    pub fell_back: bool,
}

impl Decision {
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.status.label()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Builds a context for a personality given by name.
    ///
    /// This is the only fallible step of a decision.
    pub fn context_for(
        &self,
        personality: Option<&str>,
        graph: &StateGraph,
        memory: &MemoryStore,
        environment: Environment,
    ) -> Result<DecisionContext> {
        let id = personality.ok_or_else(|| CoreError::UnknownPersonality(String::new()))?;
        let personality = id.parse::<Personality>()?;
        Ok(self.context(personality, graph, memory, environment))
    }

    /// Merges live neuron values, environment and memory influence.
    #[must_use]
    pub fn context(
        &self,
        personality: Personality,
        graph: &StateGraph,
        memory: &MemoryStore,
        environment: Environment,
    ) -> DecisionContext {
        let mut live = BTreeMap::new();
        let mut flags = BTreeMap::new();
        let mut direction = None;
        for neuron in graph.neurons() {
            match &neuron.value {
                NeuronValue::Number(v) => {
                    live.insert(neuron.name.clone(), *v);
                }
                NeuronValue::Flag(b) => {
                    flags.insert(neuron.name.clone(), *b);
                }
                NeuronValue::Label(s) if neuron.name == "direction" => direction = Some(s.clone()),
                NeuronValue::Label(_) => {}
            }
        }

        let mut influence: BTreeMap<String, f32> = BTreeMap::new();
        let mut consulted = Vec::new();
        for record in memory.active_memories(&self.config.memory_category, self.config.memory_recall) {
            let Some(effects) = record.value.as_effects() else {
                continue;
            };
            for (stat, delta) in effects {
                *influence.entry(stat.clone()).or_insert(0.0) +=
                    *delta as f32 * self.config.memory_damping;
            }
            consulted.push((record.category.clone(), record.key.clone()));
        }

        let mut state = live.clone();
        for (stat, delta) in &influence {
            if let Some(v) = state.get_mut(stat) {
                *v = (*v + delta).clamp(0.0, 100.0);
            }
        }

        DecisionContext {
            personality,
            state,
            live,
            flags,
            direction,
            environment,
            memory_influence: influence,
            consulted,
        }
    }

    fn value(&self, ctx: &DecisionContext, name: &str) -> f32 {
        ctx.state
            .get(name)
            .copied()
            .unwrap_or(self.config.default_value)
    }

    fn live_value(&self, ctx: &DecisionContext, name: &str) -> f32 {
        ctx.live
            .get(name)
            .copied()
            .unwrap_or(self.config.default_value)
    }

    /// Physiological overrides, checked against live values in priority order.
    #[must_use]
    pub fn override_for(&self, ctx: &DecisionContext) -> Option<Decision> {
        let fixed = |status, intent| Decision {
            status,
            intent,
            weights: None,
            fell_back: false,
        };
        if self.live_value(ctx, "sleepiness") >= self.config.sleep_override {
            return Some(fixed(Status::Sleeping, Intent::Sleep));
        }
        if ctx.flags.get("is_sleeping").copied().unwrap_or(false) {
            return Some(fixed(Status::Sleeping, Intent::Sleep));
        }
        if self.live_value(ctx, "anxiety") >= self.config.panic_override {
            return Some(fixed(Status::Panicking, Intent::Flee { erratic: true }));
        }
        if self.live_value(ctx, "curiosity") >= self.config.curiosity_override {
            return Some(fixed(Status::Investigating, Intent::None));
        }
        None
    }

    /// Unmodified scores derived from affect values.
    #[must_use]
    pub fn base_weights(&self, ctx: &DecisionContext) -> DecisionWeights {
        let curiosity = self.value(ctx, "curiosity");
        let anxiety = self.value(ctx, "anxiety");
        let hunger = self.value(ctx, "hunger");
        let satisfaction = self.value(ctx, "satisfaction");
        let env = &ctx.environment;

        let mut weights = DecisionWeights::default();
        weights.set(Action::Exploring, curiosity * 0.8 * (1.0 - anxiety / 100.0));
        if env.food.is_some() {
            weights.set(Action::Eating, hunger * 1.2);
        }
        if !env.carrying_rock {
            weights.set(Action::ApproachingRock, curiosity * 0.7);
        } else {
            weights.set(Action::ThrowingRock, satisfaction * 0.7);
        }
        weights.set(Action::AvoidingThreat, anxiety * 0.9);
        weights.set(Action::Organizing, satisfaction * 0.5);
        weights
    }

    /// Base scores with personality modifiers applied, before jitter.
    #[must_use]
    pub fn weights(&self, ctx: &DecisionContext) -> DecisionWeights {
        let mut weights = self.base_weights(ctx);
        for (action, modifier) in ctx.personality.decision_modifiers() {
            weights.set(*action, weights.get(*action) * modifier);
        }
        weights
    }

    pub fn decide<R: Rng>(&self, ctx: &DecisionContext, rng: &mut R) -> Decision {
        if let Some(decision) = self.override_for(ctx) {
            tracing::debug!(status = %decision.status, "Decision override");
            return decision;
        }

        let mut weights = self.weights(ctx);
        for action in Action::ALL {
            let jitter = rng.gen_range(self.config.jitter_min..=self.config.jitter_max);
            weights.set(action, weights.get(action) * jitter);
        }

        let best = weights.best();
        let decision = match self.intent_for(best, ctx, rng) {
            Some(intent) => Decision {
                status: Status::Act(best),
                intent,
                weights: Some(weights),
                fell_back: false,
            },
            None => {
                tracing::debug!(action = best.label(), "Action not possible, exploring instead");
                Decision {
                    status: Status::Act(Action::Exploring),
                    intent: Intent::Explore {
                        style: random_style(rng),
                    },
                    weights: Some(weights),
                    fell_back: true,
                }
            }
        };
        tracing::debug!(status = %decision.status, "Decision made");
        decision
    }

    fn intent_for<R: Rng>(&self, action: Action, ctx: &DecisionContext, rng: &mut R) -> Option<Intent> {
        let env = &ctx.environment;
        match action {
            Action::Exploring => Some(Intent::Explore {
                style: random_style(rng),
            }),
            Action::Eating => env.food.map(|(x, y)| Intent::MoveToFood { x, y }),
            Action::ApproachingRock => env
                .nearby_rock
                .filter(|_| !env.carrying_rock)
                .map(|id| Intent::ApproachObject { id }),
            Action::ThrowingRock => env.carrying_rock.then(|| Intent::Throw {
                direction: ctx.direction.clone().unwrap_or_else(|| "up".to_string()),
            }),
            Action::AvoidingThreat => {
                let anxiety = self.value(ctx, "anxiety");
                (anxiety > self.config.avoid_anxiety).then_some(Intent::Flee {
                    erratic: anxiety > 90.0,
                })
            }
            Action::Organizing => env.decoration_nearby.then_some(Intent::Organize),
        }
    }
}

fn random_style<R: Rng>(rng: &mut R) -> ExploreStyle {
    match rng.gen_range(0..3) {
        0 => ExploreStyle::Normal,
        1 => ExploreStyle::Slow,
        _ => ExploreStyle::Erratic,
    }
}
