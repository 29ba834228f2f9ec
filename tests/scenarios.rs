mod common;

use common::{snapshot, CreatureBuilder};
use squidmind_lib::squidmind_core::decision::{Action, DecisionContext, DecisionEngine};
use squidmind_lib::squidmind_core::events::MemorySink;
use squidmind_lib::squidmind_core::{CoreError, MemoryValue, Trigger, CORE_NEURONS};
use squidmind_lib::{Creature, Environment, ExternalSignals, Personality, Snapshot, Status};

#[test]
fn test_novelty_fires_just_above_threshold() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    let quiet = ExternalSignals::default();

    creature.neurogenesis_mut().set_counter(Trigger::Novelty, 2.9);
    let report = creature.tick(&Snapshot::new(), &quiet, Environment::default(), 1.0, &mut rng);
    assert!(report.created.is_none());
    assert_eq!(creature.graph().generated_count(), 0);

    creature.neurogenesis_mut().set_counter(Trigger::Novelty, 3.1);
    let report = creature.tick(&Snapshot::new(), &quiet, Environment::default(), 2.0, &mut rng);
    assert_eq!(report.created.as_deref(), Some("novel_0"));
    assert_eq!(creature.graph().generated_count(), 1);
    assert_eq!(creature.neurogenesis().counters().novelty, 0.0);
    assert_has_neuron!(creature, "novel_0");
}

#[test]
fn test_cooldown_blocks_second_neuron() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    let burst = ExternalSignals::novelty(5.0);

    let first = creature.tick(&Snapshot::new(), &burst, Environment::default(), 1.0, &mut rng);
    assert_eq!(first.created.as_deref(), Some("novel_0"));

    let blocked = creature.tick(&Snapshot::new(), &burst, Environment::default(), 100.0, &mut rng);
    assert!(blocked.created.is_none());

    let second = creature.tick(&Snapshot::new(), &burst, Environment::default(), 301.0, &mut rng);
    assert_eq!(second.created.as_deref(), Some("novel_1"));
}

#[test]
fn test_priority_prefers_novelty() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    let everything = ExternalSignals {
        novelty_exposure: 10.0,
        sustained_stress: 10.0,
        recent_rewards: 10.0,
    };
    let report = creature.tick(&Snapshot::new(), &everything, Environment::default(), 1.0, &mut rng);
    assert_eq!(report.created.as_deref(), Some("novel_0"));
    assert_no_neuron!(creature, "stress_0");
}

#[test]
fn test_extreme_sleepiness_always_sleeps() {
    for seed in 0..20 {
        let (mut creature, mut rng) = CreatureBuilder::new()
            .with_personality(Personality::Energetic)
            .with_seed(seed)
            .build();
        let state = snapshot(&[
            ("sleepiness", 96.0),
            ("anxiety", 99.0),
            ("curiosity", 99.0),
            ("hunger", 100.0),
        ]);
        let env = Environment {
            food: Some((1.0, 1.0)),
            ..Default::default()
        };
        let report = creature.tick(&state, &ExternalSignals::default(), env, 1.0, &mut rng);
        assert_status!(report, Status::Sleeping);
        assert!(creature.graph().get("is_sleeping").is_ok_and(|v| v.is_active(0.0)));
    }
}

#[test]
fn test_sleeping_flag_keeps_sleeping() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    creature.set_flag("is_sleeping", true).unwrap();
    // Bulk snapshots cannot clear a transient flag.
    let mut state = snapshot(&[("sleepiness", 10.0)]);
    state.insert("is_sleeping".into(), false.into());

    let report = creature.tick(&state, &ExternalSignals::default(), Environment::default(), 1.0, &mut rng);
    assert_status!(report, Status::Sleeping);
}

#[test]
fn test_greedy_eating_multiplier() {
    let engine = DecisionEngine::default();
    let env = Environment {
        food: Some((40.0, 40.0)),
        ..Default::default()
    };
    let ctx = DecisionContext::from_values(Personality::Greedy, &[("hunger", 80.0)], env);

    let base = engine.base_weights(&ctx).get(Action::Eating);
    let modified = engine.weights(&ctx).get(Action::Eating);
    assert!((base - 96.0).abs() < 1e-4);
    assert!((modified - base * 1.5).abs() < 1e-4);
    assert!(modified > engine.weights(&ctx).get(Action::Exploring));
}

#[test]
fn test_stress_neuron_leaves_a_scar() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    let name = creature.stimulate(Trigger::Stress, 1.0, &mut rng).unwrap();

    assert_eq!(name, "stress_0");
    assert!((creature.graph().weight("stress_0", "anxiety") + 0.7).abs() < 1e-6);
    assert_eq!(creature.graph().ceiling("anxiety"), Some(95.0));

    let state = snapshot(&[("anxiety", 100.0)]);
    creature.tick(&state, &ExternalSignals::default(), Environment::default(), 2.0, &mut rng);
    assert_eq!(creature.graph().value_or("anxiety", 0.0), 95.0);
}

#[test]
fn test_core_neurons_survive_pruning_pressure() {
    let (mut creature, mut rng) = CreatureBuilder::new()
        .with_config(|c| {
            c.neurogenesis.max_neurons = 3;
            c.neurogenesis.cooldown_secs = 0.0;
        })
        .build();
    for trigger in [Trigger::Novelty, Trigger::Reward, Trigger::Novelty] {
        creature.stimulate(trigger, 0.0, &mut rng);
    }
    assert_eq!(creature.graph().generated_count(), 3);

    // A value at the midpoint makes every generated neuron a low-activity
    // candidate.
    for name in ["novel_0", "reward_0", "novel_1"] {
        creature.set_flag(name, 50.0).unwrap();
    }
    let neutral: Vec<(&str, f32)> = CORE_NEURONS.iter().map(|n| (*n, 50.0)).collect();
    let state = snapshot(&neutral);
    let mut now = 1.0;
    for _ in 0..50 {
        creature.tick(&state, &ExternalSignals::default(), Environment::default(), now, &mut rng);
        now += 1.0;
    }

    for name in CORE_NEURONS {
        assert_has_neuron!(creature, name);
    }
    // Below 80% of the cap the prune chance drops to zero.
    assert_eq!(creature.graph().generated_count(), 2);
    assert_eq!(creature.metrics().neurons_pruned(), 1);
}

#[test]
fn test_events_reach_the_sink() {
    let sink = MemorySink::new();
    let (mut creature, mut rng) = CreatureBuilder::new().with_sink(sink.clone()).build();

    creature.tick(
        &Snapshot::new(),
        &ExternalSignals::reward(2.0),
        Environment::default(),
        1.0,
        &mut rng,
    );
    assert_eq!(sink.created(), vec!["reward_0".to_string()]);
}

#[test]
fn test_hebbian_runs_on_its_cadence() {
    let (mut creature, mut rng) = CreatureBuilder::new().build();
    let busy: Vec<(&str, f32)> = CORE_NEURONS.iter().map(|n| (*n, 90.0)).collect();
    let state = snapshot(&busy);

    let early = creature.tick(&state, &ExternalSignals::default(), Environment::default(), 1.0, &mut rng);
    assert_eq!(early.weight_updates, 0);

    let due = creature.tick(&state, &ExternalSignals::default(), Environment::default(), 2.0, &mut rng);
    assert!(due.weight_updates > 0);
    assert_weights_bounded!(creature.graph());
}

#[test]
fn test_pause_freezes_everything() {
    let (mut creature, mut rng) = CreatureBuilder::new().with_stat("hunger", 10.0).build();
    creature.record_outcome(
        "experiences",
        "ate_food",
        MemoryValue::effects([("hunger", -20.0)]),
        1.0,
        0.0,
    );
    creature.pause();

    let report = creature.tick(
        &snapshot(&[("hunger", 90.0)]),
        &ExternalSignals::novelty(50.0),
        Environment::default(),
        1.0,
        &mut rng,
    );
    assert!(report.decision.is_none());
    assert!(creature.record_outcome("experiences", "x", MemoryValue::from(1.0), 1.0, 1.0).is_none());
    assert!(creature.stimulate(Trigger::Reward, 1.0, &mut rng).is_none());
    creature.set_flag("hunger", 55.0).unwrap();
    assert_eq!(creature.graph().value_or("hunger", 0.0), 10.0);
    assert_eq!(creature.neurogenesis().counters().novelty, 0.0);
    for _ in 0..5 {
        assert!(creature.decide(Environment::default(), &mut rng).is_none());
    }
    let record = &creature.memory().query("experiences", Some("ate_food"))[0];
    assert_eq!(record.access_count, 0);
    assert_eq!(creature.metrics().decisions(), 0);

    creature.resume();
    let report = creature.tick(&Snapshot::new(), &ExternalSignals::default(), Environment::default(), 2.0, &mut rng);
    assert!(report.decision.is_some());
}

#[test]
fn test_memory_fifo_through_creature() {
    let (mut creature, _) = CreatureBuilder::new().build();
    for i in 0..51 {
        creature.record_outcome("experiences", &format!("event_{i}"), MemoryValue::from("x"), 1.0, i as f64);
    }
    assert_eq!(creature.memory().short_term_len(), 50);
    assert!(creature.memory().query("experiences", Some("event_0")).is_empty());
}

#[test]
fn test_memories_shift_the_decision_state() {
    let (mut creature, _) = CreatureBuilder::new().with_stat("anxiety", 40.0).build();
    creature.record_outcome(
        "experiences",
        "scary_rock",
        MemoryValue::effects([("anxiety", 30.0)]),
        2.0,
        0.0,
    );

    let engine = DecisionEngine::default();
    let ctx = engine.context(
        creature.personality(),
        creature.graph(),
        creature.memory(),
        Environment::default(),
    );
    assert_eq!(ctx.state["anxiety"], 55.0);
    assert_eq!(ctx.live["anxiety"], 40.0);
    assert_eq!(ctx.consulted, vec![("experiences".to_string(), "scary_rock".to_string())]);
}

#[test]
fn test_unknown_personality_is_rejected() {
    let err = Creature::with_personality_id("brave", Default::default(), 0.0).unwrap_err();
    assert_eq!(err, CoreError::UnknownPersonality("brave".into()));
}
