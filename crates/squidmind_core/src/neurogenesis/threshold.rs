use crate::config::NeurogenesisConfig;
use squidmind_data::Trigger;

#[must_use]
pub fn base_threshold(config: &NeurogenesisConfig, trigger: Trigger) -> f32 {
    match trigger {
        Trigger::Novelty => config.novelty_threshold,
        Trigger::Stress => config.stress_threshold,
        Trigger::Reward => config.reward_threshold,
    }
}

#[must_use]
pub fn scaling_factor(config: &NeurogenesisConfig, trigger: Trigger) -> f32 {
    match trigger {
        Trigger::Novelty => config.novelty_scaling,
        Trigger::Stress => config.stress_scaling,
        Trigger::Reward => config.reward_scaling,
    }
}

/// Effective threshold for `trigger` once `generated` neurons exist.
///
/// Stays at base up to the scaling baseline, then grows linearly with every
/// additional generated neuron.
#[must_use]
pub fn adjusted_threshold(config: &NeurogenesisConfig, trigger: Trigger, generated: usize) -> f32 {
    let base = base_threshold(config, trigger);
    if generated <= config.scaling_baseline {
        return base;
    }
    let excess = (generated - config.scaling_baseline + 1) as f32;
    base * (1.0 + scaling_factor(config, trigger) * excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_below_baseline() {
        let config = NeurogenesisConfig::default();
        for generated in 0..=3 {
            assert_eq!(adjusted_threshold(&config, Trigger::Novelty, generated), 3.0);
        }
    }

    #[test]
    fn test_scaling_above_baseline() {
        let config = NeurogenesisConfig::default();
        // 3.0 * (1 + 0.25 * 2)
        assert!((adjusted_threshold(&config, Trigger::Novelty, 4) - 4.5).abs() < 1e-6);
        // 0.7 * (1 + 0.1 * 2)
        assert!((adjusted_threshold(&config, Trigger::Stress, 4) - 0.84).abs() < 1e-6);
    }

    #[test]
    fn test_novelty_scales_fastest() {
        let config = NeurogenesisConfig::default();
        let ratio = |t| adjusted_threshold(&config, t, 10) / base_threshold(&config, t);
        assert!(ratio(Trigger::Novelty) > ratio(Trigger::Stress));
        assert!(ratio(Trigger::Stress) > ratio(Trigger::Reward));
    }
}
