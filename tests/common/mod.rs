pub mod macros;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squidmind_lib::squidmind_core::events::MemorySink;
use squidmind_lib::squidmind_data::NeuronValue;
use squidmind_lib::{AppConfig, Creature, Personality, Snapshot};

#[allow(dead_code)]
pub struct CreatureBuilder {
    personality: Personality,
    config: AppConfig,
    stats: Vec<(&'static str, f32)>,
    seed: u64,
    now: f64,
    sink: Option<MemorySink>,
}

#[allow(dead_code)]
impl CreatureBuilder {
    pub fn new() -> Self {
        Self {
            personality: Personality::Adventurous,
            config: AppConfig::default(),
            stats: Vec::new(),
            seed: 42,
            now: 0.0,
            sink: None,
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Sets a numeric neuron before the first tick.
    pub fn with_stat(mut self, name: &'static str, value: f32) -> Self {
        self.stats.push((name, value));
        self
    }

    pub fn at(mut self, now: f64) -> Self {
        self.now = now;
        self
    }

    /// Routes brain events into a shared sink the test keeps a clone of.
    pub fn with_sink(mut self, sink: MemorySink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> (Creature, ChaCha8Rng) {
        let mut creature = Creature::new(self.personality, self.config, self.now);
        for (name, value) in self.stats {
            creature
                .set_flag(name, value)
                .expect("builder stats must name existing neurons");
        }
        if let Some(sink) = self.sink {
            creature.set_sink(Box::new(sink));
        }
        (creature, ChaCha8Rng::seed_from_u64(self.seed))
    }
}

/// Snapshot holding exactly the listed stats.
#[allow(dead_code)]
pub fn snapshot(values: &[(&str, f32)]) -> Snapshot {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), NeuronValue::Number(*value)))
        .collect()
}
