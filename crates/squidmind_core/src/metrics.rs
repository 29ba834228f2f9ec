//! Counters and logging setup for the cognitive engine.
//!
//! Tracks how busy the brain is (ticks, decisions, learning, growth) and
//! emits a periodic summary through `tracing`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Ticks between periodic summaries.
const SUMMARY_INTERVAL: u64 = 1000;

/// Running counters for one creature.
pub struct Metrics {
    tick_count: AtomicU64,
    decisions: AtomicU64,
    neurons_created: AtomicU64,
    neurons_pruned: AtomicU64,
    weight_updates: AtomicU64,
    memories_promoted: AtomicU64,
    memories_forgotten: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("ticks", &self.tick_count())
            .field("decisions", &self.decisions())
            .field("neurons_created", &self.neurons_created())
            .field("neurons_pruned", &self.neurons_pruned())
            .field("weight_updates", &self.weight_updates())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            decisions: AtomicU64::new(0),
            neurons_created: AtomicU64::new(0),
            neurons_pruned: AtomicU64::new(0),
            weight_updates: AtomicU64::new(0),
            memories_promoted: AtomicU64::new(0),
            memories_forgotten: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration and the network size.
    pub fn record_tick(&self, duration: Duration, neurons: usize, weights: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                tick = tick,
                neurons = neurons,
                weights = weights,
                created = self.neurons_created(),
                pruned = self.neurons_pruned(),
                weight_updates = self.weight_updates(),
                duration_us = duration.as_micros() as u64,
                "Brain tick"
            );
        }
    }

    pub fn record_decision(&self) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_neuron_created(&self) {
        self.neurons_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_neuron_pruned(&self) {
        self.neurons_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_weight_updates(&self, count: usize) {
        self.weight_updates
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_review(&self, promoted: usize, forgotten: usize) {
        self.memories_promoted
            .fetch_add(promoted as u64, Ordering::Relaxed);
        self.memories_forgotten
            .fetch_add(forgotten as u64, Ordering::Relaxed);
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn decisions(&self) -> u64 {
        self.decisions.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn neurons_created(&self) -> u64 {
        self.neurons_created.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn neurons_pruned(&self) -> u64 {
        self.neurons_pruned.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn weight_updates(&self) -> u64 {
        self.weight_updates.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn memories_promoted(&self) -> u64 {
        self.memories_promoted.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn memories_forgotten(&self) -> u64 {
        self.memories_forgotten.load(Ordering::Relaxed)
    }

    /// Wall-clock time since the collector was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Later calls are ignored.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.neurons_created(), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_micros(40), 14, 20);
        assert_eq!(metrics.tick_count(), 1);
    }

    #[test]
    fn test_growth_and_review_counters() {
        let metrics = Metrics::new();
        metrics.record_neuron_created();
        metrics.record_neuron_created();
        metrics.record_neuron_pruned();
        metrics.record_weight_updates(7);
        metrics.record_review(2, 5);
        assert_eq!(metrics.neurons_created(), 2);
        assert_eq!(metrics.neurons_pruned(), 1);
        assert_eq!(metrics.weight_updates(), 7);
        assert_eq!(metrics.memories_promoted(), 2);
        assert_eq!(metrics.memories_forgotten(), 5);
    }

    #[test]
    fn test_named_counter() {
        let metrics = Metrics::new();
        metrics.increment_counter("override.sleeping");
        metrics.increment_counter("override.sleeping");
        assert_eq!(metrics.counter("override.sleeping"), 2);
        assert_eq!(metrics.counter("missing"), 0);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
