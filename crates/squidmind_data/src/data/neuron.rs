use serde::{Deserialize, Serialize};

/// Value held by a neuron.
///
/// Snapshots mix scalar stats, boolean state flags and the occasional string
/// label (e.g. `direction`), so the neuron map stores a tagged variant rather
/// than a bare float.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NeuronValue {
    /// Scalar activation, nominally on a 0-100 scale.
    Number(f32),
    /// Boolean state flag.
    Flag(bool),
    /// Free-form label.
    Label(String),
}

impl NeuronValue {
    /// Activation on the 0-100 scale.
    ///
    /// Flags map to 100/0. A non-empty label counts as a fixed 75.
    #[must_use]
    pub fn activation(&self) -> f32 {
        match self {
            Self::Number(v) => *v,
            Self::Flag(true) => 100.0,
            Self::Flag(false) => 0.0,
            Self::Label(s) if s.is_empty() => 0.0,
            Self::Label(_) => 75.0,
        }
    }

    /// Activation normalized into `[0, 1]`.
    #[must_use]
    pub fn normalized(&self) -> f32 {
        (self.activation() / 100.0).clamp(0.0, 1.0)
    }

    /// Whether this value counts as "active" for learning.
    ///
    /// Numbers must exceed the threshold, flags must be set, labels must be
    /// present.
    #[must_use]
    pub fn is_active(&self, threshold: f32) -> bool {
        match self {
            Self::Number(v) => *v > threshold,
            Self::Flag(b) => *b,
            Self::Label(s) => !s.is_empty(),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f32> for NeuronValue {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for NeuronValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for NeuronValue {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

/// Lifecycle class of a neuron.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NeuronKind {
    /// Built-in neuron; lives for the whole simulation and is never pruned.
    Core,
    /// Created at runtime by neurogenesis; may be pruned.
    Generated,
}

/// Signal type that caused a neuron to be grown.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trigger {
    Novelty,
    Stress,
    Reward,
}

impl Trigger {
    /// Evaluation order when several counters are ready in the same tick.
    pub const PRIORITY: [Trigger; 3] = [Trigger::Novelty, Trigger::Stress, Trigger::Reward];

    /// Name prefix for neurons grown by this trigger.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Novelty => "novel",
            Self::Stress => "stress",
            Self::Reward => "reward",
        }
    }

    #[must_use]
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Self::Novelty => (255, 255, 150),
            Self::Stress => (255, 150, 150),
            Self::Reward => (173, 216, 230),
        }
    }

    #[must_use]
    pub fn shape(self) -> Shape {
        match self {
            Self::Novelty => Shape::Diamond,
            Self::Stress => Shape::Square,
            Self::Reward => Shape::Triangle,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Novelty => "Novelty",
            Self::Stress => "Stress",
            Self::Reward => "Reward",
        }
    }
}

/// Drawing shape used by the renderer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
}

/// A named state variable in the associative network.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Neuron {
    /// Unique neuron name (the graph key).
    pub name: String,
    pub value: NeuronValue,
    pub kind: NeuronKind,
    /// Trigger that grew this neuron; `None` for core neurons.
    pub origin: Option<Trigger>,
    /// Simulated time of creation, in seconds.
    pub created_at: f64,
    pub color: (u8, u8, u8),
    pub shape: Shape,
    /// Layout position; cosmetic.
    pub position: (f32, f32),
}

impl Neuron {
    #[must_use]
    pub fn is_core(&self) -> bool {
        self.kind == NeuronKind::Core
    }

    /// Whether this neuron was generated within `window` seconds of `now`.
    #[must_use]
    pub fn is_new(&self, now: f64, window: f64) -> bool {
        self.kind == NeuronKind::Generated && now - self.created_at < window
    }
}
