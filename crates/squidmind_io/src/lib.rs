//! # Squidmind IO
//!
//! Persistence layer for the squidmind cognitive engine.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON serialization helpers
//! - Gzip save slots and a background autosave writer
//! - The append-only neurogenesis journal

/// Background writer thread for periodic saves
pub mod autosave;
/// Error types and result aliases for I/O operations
pub mod error;
/// Human-readable log of network growth and pruning
pub mod journal;
/// Save slot management
pub mod persistence;
/// JSON helpers used by the save slots
pub mod serialization;

pub use autosave::{AutosaveCommand, AutosaveWorker};
pub use error::{IoError, Result};
pub use journal::NeurogenesisJournal;
pub use persistence::{SaveManager, AUTOSAVE_SLOT, MANUAL_SLOT};
pub use serialization::{from_json, read_json_file, to_json, write_json_file};
