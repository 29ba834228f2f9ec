//! Configuration management for the cognitive engine.
//!
//! Strongly-typed parameter sections mirroring `config.toml`. Loading the
//! file is the caller's business; the core only consumes the resulting values.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = 42
//!
//! [hebbian]
//! learning_rate = 0.1
//! sample_pairs = 5
//!
//! [neurogenesis]
//! novelty_threshold = 3.0
//! cooldown_secs = 300.0
//! max_neurons = 20
//!
//! [memory]
//! short_term_capacity = 50
//! ```
//!
//! Every section is optional; omitted keys fall back to their defaults.

use serde::{Deserialize, Serialize};

/// Hebbian learning parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HebbianConfig {
    /// Scalar neurons above this value are active.
    pub activation_threshold: f32,
    pub learning_rate: f32,
    /// Upper bound on unordered pairs sampled per learning tick.
    pub sample_pairs: usize,
    /// Rate multiplier when either endpoint is newly grown.
    pub new_neuron_boost: f32,
    /// Seconds during which a generated neuron counts as new.
    pub new_neuron_window_secs: f64,
    /// Rate multiplier for the forced new-neuron/affect updates.
    pub core_integration_boost: f32,
    /// Affect neurons every new neuron is forcibly associated with.
    pub integration_targets: Vec<String>,
    /// Fraction removed from every weight on each decay pass.
    pub weight_decay: f32,
    /// |Δw| at or above this is reported as strong reinforcement.
    pub strong_change: f32,
    /// Neurons never considered for learning.
    pub excluded_neurons: Vec<String>,
    /// Connections with |w| below this are dropped before each learning
    /// pass while pruning is enabled. Zero disables the pass.
    pub connection_prune_threshold: f32,
    /// Links touching a generated neuron younger than this are never dropped.
    pub connection_min_age_secs: f64,
    /// Short-term memory category whose positive stat effects join the
    /// active set.
    pub effect_memory_category: String,
}

impl Default for HebbianConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 50.0,
            learning_rate: 0.1,
            sample_pairs: 5,
            new_neuron_boost: 1.5,
            new_neuron_window_secs: 300.0,
            core_integration_boost: 2.0,
            integration_targets: vec![
                "satisfaction".to_string(),
                "anxiety".to_string(),
                "curiosity".to_string(),
            ],
            weight_decay: 0.01,
            strong_change: 0.05,
            excluded_neurons: vec!["direction".to_string()],
            connection_prune_threshold: 0.05,
            connection_min_age_secs: 600.0,
            effect_memory_category: "decorations".to_string(),
        }
    }
}

/// Neurogenesis triggers, growth limits and pruning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NeurogenesisConfig {
    pub novelty_threshold: f32,
    pub stress_threshold: f32,
    pub reward_threshold: f32,
    /// Multiplicative per-tick counter decay, in (0, 1).
    pub decay: f32,
    pub cooldown_secs: f64,
    /// Cap on generated neurons; enforced only while pruning is enabled.
    pub max_neurons: usize,
    pub pruning_enabled: bool,
    /// Generated-neuron count up to which thresholds stay at base.
    pub scaling_baseline: usize,
    pub novelty_scaling: f32,
    pub stress_scaling: f32,
    pub reward_scaling: f32,
    pub counter_cap: f32,
    pub initial_activation: f32,

    pub curiosity_high: f32,
    pub novelty_increment: f32,
    pub anxiety_high: f32,
    pub cleanliness_low: f32,
    pub stress_increment: f32,
    pub anxiety_extreme: f32,
    pub emergency_stress_increment: f32,
    pub reward_high: f32,
    pub reward_increment: f32,

    /// Average |w| below this marks a generated neuron as weakly connected.
    pub weak_connection: f32,
    /// |value - 50| below this marks a generated neuron as inactive.
    pub low_activity: f32,
    /// Fraction of the cap at which prune attempts begin.
    pub prune_start_fraction: f32,

    pub stress_inhibition: f32,
    pub anxiety_ceiling_step: f32,
    pub anxiety_ceiling_floor: f32,
}

impl Default for NeurogenesisConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: 3.0,
            stress_threshold: 0.7,
            reward_threshold: 0.6,
            decay: 0.95,
            cooldown_secs: 300.0,
            max_neurons: 20,
            pruning_enabled: true,
            scaling_baseline: 3,
            novelty_scaling: 0.25,
            stress_scaling: 0.1,
            reward_scaling: 0.08,
            counter_cap: 100.0,
            initial_activation: 65.0,
            curiosity_high: 75.0,
            novelty_increment: 0.1,
            anxiety_high: 80.0,
            cleanliness_low: 20.0,
            stress_increment: 0.25,
            anxiety_extreme: 95.0,
            emergency_stress_increment: 2.5,
            reward_high: 85.0,
            reward_increment: 0.2,
            weak_connection: 0.2,
            low_activity: 10.0,
            prune_start_fraction: 0.8,
            stress_inhibition: -0.7,
            anxiety_ceiling_step: 5.0,
            anxiety_ceiling_floor: 50.0,
        }
    }
}

/// Short/long-term memory parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub short_term_capacity: usize,
    pub short_term_window_secs: f64,
    /// Importance added when the same (category, key) is stored again.
    pub repeat_bonus: f32,
    /// Importance at which a repeated record moves straight to long-term.
    pub immediate_promotion: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: 50,
            short_term_window_secs: 300.0,
            repeat_bonus: 0.5,
            immediate_promotion: 3.0,
        }
    }
}

/// Decision scoring parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DecisionConfig {
    pub memory_damping: f32,
    pub memory_recall: usize,
    pub memory_category: String,
    pub jitter_min: f32,
    pub jitter_max: f32,
    pub sleep_override: f32,
    pub panic_override: f32,
    pub curiosity_override: f32,
    /// Anxiety needed before avoidance is carried out.
    pub avoid_anxiety: f32,
    /// Substituted for missing neuron values.
    pub default_value: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            memory_damping: 0.5,
            memory_recall: 3,
            memory_category: "experiences".to_string(),
            jitter_min: 0.85,
            jitter_max: 1.15,
            sleep_override: 95.0,
            panic_override: 95.0,
            curiosity_override: 95.0,
            avoid_anxiety: 70.0,
            default_value: 50.0,
        }
    }
}

/// Intervals, in simulated seconds, of the slower cadences.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CadenceConfig {
    pub hebbian_secs: f64,
    pub weight_decay_secs: f64,
    pub memory_review_secs: f64,
    pub autosave_secs: f64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            hebbian_secs: 2.0,
            weight_decay_secs: 60.0,
            memory_review_secs: 300.0,
            autosave_secs: 300.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub hebbian: HebbianConfig,
    pub neurogenesis: NeurogenesisConfig,
    pub memory: MemoryConfig,
    pub decision: DecisionConfig,
    pub cadence: CadenceConfig,
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let h = &self.hebbian;
        anyhow::ensure!(
            h.activation_threshold >= 0.0,
            "Activation threshold must be non-negative"
        );
        anyhow::ensure!(
            h.learning_rate >= 0.0 && h.learning_rate <= 1.0,
            "Learning rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(h.new_neuron_boost >= 1.0, "New neuron boost must be >= 1.0");
        anyhow::ensure!(
            h.core_integration_boost >= 0.0,
            "Core integration boost must be non-negative"
        );
        anyhow::ensure!(
            h.weight_decay >= 0.0 && h.weight_decay < 1.0,
            "Weight decay must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            h.new_neuron_window_secs >= 0.0,
            "New neuron window must be non-negative"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&h.connection_prune_threshold),
            "Connection prune threshold must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            h.connection_min_age_secs >= 0.0,
            "Connection minimum age must be non-negative"
        );

        let n = &self.neurogenesis;
        anyhow::ensure!(
            n.decay > 0.0 && n.decay < 1.0,
            "Counter decay must be in (0.0, 1.0)"
        );
        anyhow::ensure!(
            n.novelty_threshold >= 0.0 && n.stress_threshold >= 0.0 && n.reward_threshold >= 0.0,
            "Neurogenesis thresholds must be non-negative"
        );
        anyhow::ensure!(
            n.novelty_scaling >= 0.0 && n.stress_scaling >= 0.0 && n.reward_scaling >= 0.0,
            "Threshold scaling factors must be non-negative"
        );
        anyhow::ensure!(n.cooldown_secs >= 0.0, "Cooldown must be non-negative");
        anyhow::ensure!(n.max_neurons > 0, "Max neurons must be positive");
        anyhow::ensure!(n.counter_cap > 0.0, "Counter cap must be positive");
        anyhow::ensure!(
            n.prune_start_fraction > 0.0 && n.prune_start_fraction < 1.0,
            "Prune start fraction must be in (0.0, 1.0)"
        );
        anyhow::ensure!(
            (-1.0..=1.0).contains(&n.stress_inhibition),
            "Stress inhibition must be in [-1.0, 1.0]"
        );
        anyhow::ensure!(
            n.anxiety_ceiling_step >= 0.0,
            "Anxiety ceiling step must be non-negative"
        );

        let m = &self.memory;
        anyhow::ensure!(
            m.short_term_capacity > 0,
            "Short-term capacity must be positive"
        );
        anyhow::ensure!(
            m.short_term_window_secs > 0.0,
            "Short-term window must be positive"
        );
        anyhow::ensure!(m.repeat_bonus >= 0.0, "Repeat bonus must be non-negative");

        let d = &self.decision;
        anyhow::ensure!(
            d.memory_damping >= 0.0 && d.memory_damping <= 1.0,
            "Memory damping must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            d.jitter_min > 0.0 && d.jitter_min <= d.jitter_max,
            "Jitter band must be positive and ordered"
        );

        let c = &self.cadence;
        anyhow::ensure!(
            c.hebbian_secs > 0.0
                && c.weight_decay_secs > 0.0
                && c.memory_review_secs > 0.0
                && c.autosave_secs > 0.0,
            "Cadence intervals must be positive"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of every behavior-relevant section.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.hebbian).as_bytes());
        hasher.update(format!("{:?}", self.neurogenesis).as_bytes());
        hasher.update(format!("{:?}", self.memory).as_bytes());
        hasher.update(format!("{:?}", self.decision).as_bytes());
        hex::encode(hasher.finalize())
    }
}
