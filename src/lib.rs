//! # Squidmind
//!
//! Cognitive engine for an artificial squid, plus a headless driver.
//!
//! The engine itself lives in `squidmind_core`; persistence in
//! `squidmind_io`. This crate re-exports both and adds [`app::App`], a
//! scripted environment that exercises a creature end to end.

pub mod app;

pub use squidmind_core::{
    AppConfig, BrainEvent, Creature, Decision, Environment, EventSink, ExternalSignals, Intent,
    Personality, Snapshot, Status, TickReport,
};
pub use squidmind_data::SavedCreature;
pub use squidmind_io::{AutosaveWorker, NeurogenesisJournal, SaveManager};
pub use squidmind_core;
pub use squidmind_data;
pub use squidmind_io;
