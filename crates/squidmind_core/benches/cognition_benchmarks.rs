use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use squidmind_core::config::{AppConfig, HebbianConfig};
use squidmind_core::{
    Creature, DecisionEngine, Environment, ExternalSignals, HebbianLearner, MemoryStore,
    NeuronValue, Personality, Snapshot, StateGraph, Trigger, CORE_NEURONS,
};

fn busy_graph(rng: &mut ChaCha8Rng) -> StateGraph {
    let mut creature = Creature::new(Personality::Energetic, AppConfig::default(), 0.0);
    for trigger in [Trigger::Novelty, Trigger::Stress, Trigger::Reward].repeat(4) {
        creature.stimulate(trigger, 0.0, rng);
    }
    let mut graph = creature.graph().clone();
    let snapshot: Snapshot = CORE_NEURONS
        .iter()
        .map(|n| (n.to_string(), NeuronValue::Number(80.0)))
        .collect();
    graph.update(&snapshot);
    graph
}

/// Benchmark one Hebbian learning pass over a grown network.
fn bench_hebbian_tick(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let graph = busy_graph(&mut rng);
    let learner = HebbianLearner::new(HebbianConfig::default(), Personality::Energetic);

    c.bench_function("hebbian_tick", |b| {
        b.iter(|| {
            let mut graph = graph.clone();
            let updates = learner.tick(&mut graph, &[], black_box(10.0), &mut rng);
            black_box(updates)
        })
    });
}

/// Benchmark context assembly plus scoring.
fn bench_decide(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let graph = busy_graph(&mut rng);
    let memory = MemoryStore::default();
    let engine = DecisionEngine::default();
    let env = Environment {
        food: Some((10.0, 20.0)),
        nearby_rock: Some(1),
        ..Default::default()
    };

    c.bench_function("decide", |b| {
        b.iter(|| {
            let ctx = engine.context(Personality::Greedy, &graph, &memory, env.clone());
            black_box(engine.decide(&ctx, &mut rng))
        })
    });
}

/// Benchmark a full creature tick.
fn bench_creature_tick(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut creature = Creature::new(Personality::Timid, AppConfig::default(), 0.0);
    let snapshot: Snapshot = CORE_NEURONS
        .iter()
        .map(|n| (n.to_string(), NeuronValue::Number(60.0)))
        .collect();
    let mut now = 0.0;

    c.bench_function("creature_tick", |b| {
        b.iter(|| {
            now += 0.5;
            let report = creature.tick(
                &snapshot,
                &ExternalSignals::default(),
                Environment::default(),
                now,
                &mut rng,
            );
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_hebbian_tick, bench_decide, bench_creature_tick);
criterion_main!(benches);
