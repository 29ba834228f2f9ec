//! Two-tier experience memory.
//!
//! Short-term memory is a bounded FIFO of recent records, deduplicated by
//! `(category, key)`. Long-term memory is an unbounded append-only log. Records
//! move from the first to the second either immediately, when repeated
//! insertion pushes their importance high enough, or during an explicit review
//! once they have aged out of the short-term window.

use crate::config::MemoryConfig;
use squidmind_data::{MemoryRecord, MemoryValue};
use std::collections::VecDeque;

/// Result of a short-term insertion.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortTermInsert {
    /// New record appended; the oldest record is returned if it was evicted.
    Inserted { evicted: Option<MemoryRecord> },
    /// Existing record reinforced in place.
    Reinforced { importance: f32 },
    /// Existing record reinforced past the promotion threshold and moved.
    Promoted,
}

/// Outcome of one review pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewReport {
    pub promoted: usize,
    pub forgotten: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    config: MemoryConfig,
    short_term: VecDeque<MemoryRecord>,
    long_term: Vec<MemoryRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            short_term: VecDeque::with_capacity(config.short_term_capacity + 1),
            long_term: Vec::new(),
            config,
        }
    }

    /// Whether a record has earned long-term storage.
    #[must_use]
    pub fn should_promote(record: &MemoryRecord) -> bool {
        record.importance >= 7.0
            || record.access_count >= 3
            || (record.importance >= 5.0 && record.access_count >= 2)
    }

    pub fn add_short_term(
        &mut self,
        category: &str,
        key: &str,
        value: MemoryValue,
        importance: f32,
        related: Vec<String>,
        now: f64,
    ) -> ShortTermInsert {
        if let Some(idx) = self.short_term.iter().position(|r| r.matches(category, Some(key))) {
            let record = &mut self.short_term[idx];
            record.importance += self.config.repeat_bonus;
            record.timestamp = now;
            record.value = value;
            for tag in related {
                if !record.related.contains(&tag) {
                    record.related.push(tag);
                }
            }
            let importance = record.importance;

            if importance >= self.config.immediate_promotion {
                if let Some(record) = self.short_term.remove(idx) {
                    tracing::debug!(category, key, importance, "Memory promoted on repetition");
                    self.long_term.push(record);
                }
                return ShortTermInsert::Promoted;
            }
            return ShortTermInsert::Reinforced { importance };
        }

        let mut record = MemoryRecord::new(category, key, value, importance, now);
        record.related = related;
        self.short_term.push_back(record);

        let evicted = if self.short_term.len() > self.config.short_term_capacity {
            self.short_term.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            tracing::debug!(category = %old.category, key = %old.key, "Short-term memory evicted");
        }
        ShortTermInsert::Inserted { evicted }
    }

    /// Appends to long-term memory. No cap, no expiry.
    pub fn add_long_term(&mut self, category: &str, key: &str, value: MemoryValue, now: f64) {
        self.long_term
            .push(MemoryRecord::new(category, key, value, 1.0, now));
    }

    /// Promotes or forgets every short-term record older than the window.
    pub fn review_and_transfer(&mut self, now: f64) -> ReviewReport {
        let window = self.config.short_term_window_secs;
        let mut report = ReviewReport::default();
        let mut kept = VecDeque::with_capacity(self.short_term.len());

        for record in self.short_term.drain(..) {
            if now - record.timestamp <= window {
                kept.push_back(record);
            } else if Self::should_promote(&record) {
                report.promoted += 1;
                self.long_term.push(record);
            } else {
                report.forgotten += 1;
            }
        }
        self.short_term = kept;

        if report.promoted + report.forgotten > 0 {
            tracing::info!(
                promoted = report.promoted,
                forgotten = report.forgotten,
                remaining = self.short_term.len(),
                "Memory review"
            );
        }
        report
    }

    /// Matching records, short-term first.
    #[must_use]
    pub fn query(&self, category: &str, key: Option<&str>) -> Vec<&MemoryRecord> {
        self.short_term
            .iter()
            .chain(self.long_term.iter())
            .filter(|r| r.matches(category, key))
            .collect()
    }

    /// Up to `limit` short-term records of `category`, most important first,
    /// then most recent.
    #[must_use]
    pub fn active_memories(&self, category: &str, limit: usize) -> Vec<&MemoryRecord> {
        let mut records: Vec<&MemoryRecord> = self
            .short_term
            .iter()
            .filter(|r| r.category == category)
            .collect();
        records.sort_by(|a, b| {
            b.importance
                .total_cmp(&a.importance)
                .then(b.timestamp.total_cmp(&a.timestamp))
        });
        records.truncate(limit);
        records
    }

    /// Bumps the access count of the first matching record. Returns whether
    /// one was found.
    pub fn mark_accessed(&mut self, category: &str, key: &str) -> bool {
        let record = self
            .short_term
            .iter_mut()
            .chain(self.long_term.iter_mut())
            .find(|r| r.matches(category, Some(key)));
        match record {
            Some(record) => {
                record.access_count += 1;
                true
            }
            None => false,
        }
    }

    /// Looks up a record and marks it accessed.
    pub fn recall(&mut self, category: &str, key: &str) -> Option<MemoryRecord> {
        if !self.mark_accessed(category, key) {
            return None;
        }
        self.query(category, Some(key)).first().map(|r| (*r).clone())
    }

    pub fn clear_short_term(&mut self) {
        self.short_term.clear();
    }

    /// Replaces both tiers, e.g. after loading a save.
    pub fn restore(&mut self, short_term: Vec<MemoryRecord>, long_term: Vec<MemoryRecord>) {
        self.short_term = short_term.into();
        while self.short_term.len() > self.config.short_term_capacity {
            self.short_term.pop_front();
        }
        self.long_term = long_term;
    }

    pub fn short_term(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.short_term.iter()
    }

    #[must_use]
    pub fn long_term(&self) -> &[MemoryRecord] {
        &self.long_term
    }

    #[must_use]
    pub fn short_term_len(&self) -> usize {
        self.short_term.len()
    }

    #[must_use]
    pub fn long_term_len(&self) -> usize {
        self.long_term.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}
