mod common;

use common::{snapshot, CreatureBuilder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use squidmind_lib::squidmind_core::CORE_NEURONS;
use squidmind_lib::{Creature, Environment, ExternalSignals, Personality};

/// Drives a creature through a seeded but varied environment and records
/// every status it reports.
fn run(personality: Personality, seed: u64, ticks: u32) -> (Creature, Vec<String>) {
    let (mut creature, mut rng) = CreatureBuilder::new()
        .with_personality(personality)
        .with_seed(seed)
        .build();
    let mut world = ChaCha8Rng::seed_from_u64(seed ^ 0xDEAD_BEEF);
    let mut statuses = Vec::new();

    for t in 1..=ticks {
        let values: Vec<(&str, f32)> = CORE_NEURONS
            .iter()
            .map(|n| (*n, world.gen_range(0.0..100.0)))
            .collect();
        let env = Environment {
            food: world.gen_bool(0.3).then_some((10.0, 20.0)),
            nearby_rock: world.gen_bool(0.2).then_some(7),
            carrying_rock: world.gen_bool(0.1),
            decoration_nearby: world.gen_bool(0.2),
        };
        let signals = ExternalSignals {
            novelty_exposure: world.gen_range(0.0..0.5),
            sustained_stress: world.gen_range(0.0..0.2),
            recent_rewards: world.gen_range(0.0..0.2),
        };
        let report = creature.tick(&snapshot(&values), &signals, env, f64::from(t), &mut rng);
        if let Some(decision) = report.decision {
            statuses.push(decision.label().to_string());
        }
    }
    (creature, statuses)
}

#[test]
fn test_same_seed_same_life() {
    for personality in Personality::ALL {
        let (a, statuses_a) = run(personality, 1234, 800);
        let (b, statuses_b) = run(personality, 1234, 800);

        assert_eq!(statuses_a, statuses_b, "{personality} diverged");
        assert_eq!(a.graph().weight_entries(), b.graph().weight_entries());
        assert_eq!(
            a.graph().generated().map(|n| n.name.clone()).collect::<Vec<_>>(),
            b.graph().generated().map(|n| n.name.clone()).collect::<Vec<_>>()
        );
        assert_eq!(a.neurogenesis().counters(), b.neurogenesis().counters());
    }
}

#[test]
fn test_different_seeds_diverge() {
    let (_, a) = run(Personality::Energetic, 1, 400);
    let (_, b) = run(Personality::Energetic, 2, 400);
    assert_ne!(a, b);
}

#[test]
fn test_long_run_stays_bounded() {
    let (creature, _) = run(Personality::Adventurous, 99, 5_000);
    assert_weights_bounded!(creature.graph());
    let cap = creature.config().neurogenesis.max_neurons;
    assert!(creature.graph().generated_count() <= cap);
    for name in CORE_NEURONS {
        assert_has_neuron!(creature, name);
    }
}
