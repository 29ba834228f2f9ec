//! Append-only neurogenesis journal.
//!
//! A plain-text record of every neuron grown or pruned, stamped with
//! wall-clock time:
//!
//! ```text
//! 2026-10-18 14:03:11 Neuron created: novel_0
//!   Trigger: Novelty (Value at creation: 3.10)
//!   Context: hunger 50.0, happiness 50.0, ...
//!   Connections: curiosity +0.60  |  anxiety -0.40
//! 2026-10-18 14:09:40 PRUNED: novel_0 due to weak connections
//! ```

use crate::error::{IoError, Result};
use squidmind_core::events::{BrainEvent, EventSink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File-backed [`EventSink`].
pub struct NeurogenesisJournal {
    path: PathBuf,
    writer: BufWriter<File>,
    include_weights: bool,
    failed: bool,
}

impl NeurogenesisJournal {
    /// Opens `path` for appending, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("opening journal {path:?}")))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            include_weights: false,
            failed: false,
        })
    }

    /// Also journal individual weight changes. Off by default; a learning
    /// tick can emit several per second.
    #[must_use]
    pub fn with_weight_changes(mut self, enabled: bool) -> Self {
        self.include_weights = enabled;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn append(&mut self, entry: &str) -> Result<()> {
        self.writer.write_all(entry.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Renders one event as journal text, or `None` if it is not journaled.
#[must_use]
pub fn format_event(event: &BrainEvent, stamp: &str, include_weights: bool) -> Option<String> {
    match event {
        BrainEvent::NeuronCreated {
            name,
            trigger,
            counter_value,
            connections,
            context,
            ..
        } => {
            let context = context
                .iter()
                .map(|(stat, value)| format!("{stat} {value:.1}"))
                .collect::<Vec<_>>()
                .join(", ");
            let connections = connections
                .iter()
                .map(|(target, weight)| format!("{target} {weight:+.2}"))
                .collect::<Vec<_>>()
                .join("  |  ");
            Some(format!(
                "{stamp} Neuron created: {name}\n  Trigger: {} (Value at creation: {counter_value:.2})\n  Context: {context}\n  Connections: {connections}\n",
                trigger.label()
            ))
        }
        BrainEvent::NeuronPruned { name, reason, .. } => {
            Some(format!("{stamp} PRUNED: {name} due to {}\n", reason.label()))
        }
        BrainEvent::WeightChanged { update, .. } if include_weights => Some(format!(
            "{stamp} Weight: {} -> {} {:.3} -> {:.3} ({})\n",
            update.from,
            update.to,
            update.old,
            update.new,
            update.reason.label()
        )),
        BrainEvent::WeightChanged { .. } => None,
    }
}

impl EventSink for NeurogenesisJournal {
    fn record(&mut self, event: &BrainEvent) {
        let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
        let Some(entry) = format_event(event, &stamp, self.include_weights) else {
            return;
        };
        match self.append(&entry) {
            Ok(()) => self.failed = false,
            // Warn once per failure streak.
            Err(e) if !self.failed => {
                self.failed = true;
                tracing::warn!(path = ?self.path, error = %e, "Journal write failed");
            }
            Err(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squidmind_core::hebbian::{UpdateReason, WeightUpdate};
    use squidmind_core::neurogenesis::PruneReason;
    use squidmind_core::Trigger;
    use uuid::Uuid;

    fn created() -> BrainEvent {
        BrainEvent::NeuronCreated {
            name: "novel_0".into(),
            trigger: Trigger::Novelty,
            counter_value: 3.1,
            connections: vec![("curiosity".into(), 0.6), ("anxiety".into(), -0.4)],
            context: vec![("hunger".into(), 50.0), ("curiosity".into(), 80.0)],
            at: 10.0,
        }
    }

    #[test]
    fn test_created_format() {
        let text = format_event(&created(), "T", false).unwrap();
        assert_eq!(
            text,
            "T Neuron created: novel_0\n  Trigger: Novelty (Value at creation: 3.10)\n  Context: hunger 50.0, curiosity 80.0\n  Connections: curiosity +0.60  |  anxiety -0.40\n"
        );
    }

    #[test]
    fn test_pruned_format() {
        let event = BrainEvent::NeuronPruned {
            name: "stress_1".into(),
            reason: PruneReason::LowActivity,
            at: 0.0,
        };
        assert_eq!(
            format_event(&event, "T", false).unwrap(),
            "T PRUNED: stress_1 due to low activity\n"
        );
    }

    #[test]
    fn test_weight_changes_opt_in() {
        let event = BrainEvent::WeightChanged {
            update: WeightUpdate {
                from: "hunger".into(),
                to: "satisfaction".into(),
                old: 0.1,
                new: 0.15,
                delta: 0.05,
                reason: UpdateReason::Semantic("eating satisfies hunger"),
            },
            at: 0.0,
        };
        assert!(format_event(&event, "T", false).is_none());
        let text = format_event(&event, "T", true).unwrap();
        assert!(text.contains("hunger -> satisfaction 0.100 -> 0.150 (eating satisfies hunger)"));
    }

    #[test]
    fn test_journal_appends() {
        let path = std::env::temp_dir()
            .join(format!("squidmind-journal-{}", Uuid::new_v4()))
            .join("neurogenesis.log");

        let mut journal = NeurogenesisJournal::open(&path).unwrap();
        journal.record(&created());
        drop(journal);

        let mut journal = NeurogenesisJournal::open(&path).unwrap();
        journal.record(&BrainEvent::NeuronPruned {
            name: "novel_0".into(),
            reason: PruneReason::WeakConnections,
            at: 1.0,
        });
        journal.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Neuron created: novel_0"));
        assert!(text.contains("PRUNED: novel_0 due to weak connections"));
        assert!(text.find("Neuron created").unwrap() < text.find("PRUNED").unwrap());
    }
}
