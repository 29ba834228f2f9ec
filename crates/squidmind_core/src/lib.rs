//! # Squidmind Core
//!
//! The cognitive engine of an artificial squid.
//!
//! This crate contains the deterministic brain logic, including:
//! - A neuron-state graph with bounded, directed association weights
//! - Hebbian learning over co-active neurons
//! - Neurogenesis: counter-driven growth with scaled thresholds and pruning
//! - Two-tier (short/long-term) experience memory
//! - Personality-modulated, jittered action selection with hard overrides
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! A [`Creature`] owns one instance of every component and drives them on
//! three cadences: per tick (state sync, neurogenesis, decision), every few
//! seconds (learning) and every few minutes (weight decay, memory review,
//! autosave). Every random entry point takes an explicit `Rng`, so a seeded
//! generator gives reproducible runs.
//!
//! ## Example
//!
//! ```
//! use squidmind_core::{AppConfig, Creature, Environment, ExternalSignals, Personality, Snapshot};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut squid = Creature::new(Personality::Adventurous, AppConfig::default(), 0.0);
//!
//! let report = squid.tick(
//!     &Snapshot::new(),
//!     &ExternalSignals::novelty(4.0),
//!     Environment::default(),
//!     1.0,
//!     &mut rng,
//! );
//! assert_eq!(report.created.as_deref(), Some("novel_0"));
//! ```

/// Configuration management for brain parameters
pub mod config;
/// Per-creature session context and cadences
pub mod creature;
/// Action scoring and selection
pub mod decision;
/// Typed errors for integration mistakes
pub mod error;
/// Diagnostic event sink
pub mod events;
/// Neuron values and association weights
pub mod graph;
/// Hebbian weight updates
pub mod hebbian;
/// Short- and long-term experience memory
pub mod memory;
/// Performance metrics collection and logging
pub mod metrics;
/// Network growth and pruning
pub mod neurogenesis;
/// Personality tags and modifier tables
pub mod personality;

pub use config::AppConfig;
pub use creature::{Creature, TickReport};
pub use decision::{Action, Decision, DecisionContext, DecisionEngine, Environment, Intent, Status};
pub use error::{CoreError, Result};
pub use events::{BrainEvent, EventSink, MemorySink, NullSink};
pub use graph::{Snapshot, StateGraph, CORE_NEURONS, TRANSIENT_FLAGS};
pub use hebbian::{HebbianLearner, UpdateReason, WeightUpdate};
pub use memory::{MemoryStore, ReviewReport, ShortTermInsert};
pub use metrics::{init_logging, Metrics};
pub use neurogenesis::{ExternalSignals, NeurogenesisEngine, NeurogenesisOutcome, PruneReason};
pub use personality::Personality;
pub use squidmind_data::{MemoryRecord, MemoryValue, Neuron, NeuronKind, NeuronValue, Trigger};
