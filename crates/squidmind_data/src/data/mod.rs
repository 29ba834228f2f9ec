//! Core data structures for the squidmind simulation.

pub mod memory;
pub mod neuron;
pub mod snapshot;
