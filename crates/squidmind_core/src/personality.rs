//! Personality tags and their fixed modifier tables.
//!
//! A personality is chosen once at creation and never changes. It is a closed
//! set: every behavioral difference is a lookup in one of the tables below.

use crate::decision::Action;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use squidmind_data::Trigger;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Timid,
    Adventurous,
    Lazy,
    Energetic,
    Introvert,
    Greedy,
    Stubborn,
}

impl Personality {
    pub const ALL: [Personality; 7] = [
        Personality::Timid,
        Personality::Adventurous,
        Personality::Lazy,
        Personality::Energetic,
        Personality::Introvert,
        Personality::Greedy,
        Personality::Stubborn,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timid => "timid",
            Self::Adventurous => "adventurous",
            Self::Lazy => "lazy",
            Self::Energetic => "energetic",
            Self::Introvert => "introvert",
            Self::Greedy => "greedy",
            Self::Stubborn => "stubborn",
        }
    }

    /// Multiplier applied to every Hebbian weight change.
    #[must_use]
    pub fn learning_modifier(self) -> f32 {
        match self {
            Self::Timid => 0.8,
            Self::Adventurous => 1.3,
            Self::Lazy => 0.6,
            Self::Energetic => 1.5,
            Self::Introvert => 0.9,
            Self::Greedy => 1.0,
            Self::Stubborn => 0.7,
        }
    }

    /// Multiplier applied to the connection template of a newly grown neuron.
    #[must_use]
    pub fn neurogenesis_modifier(self, trigger: Trigger) -> f32 {
        match (self, trigger) {
            (Self::Timid, Trigger::Novelty) => 1.2,
            (Self::Timid, Trigger::Stress) => 0.8,
            (Self::Adventurous, Trigger::Novelty) => 0.8,
            (Self::Adventurous, Trigger::Stress) => 1.2,
            (Self::Stubborn, Trigger::Novelty) => 1.1,
            (Self::Stubborn, Trigger::Stress) => 0.9,
            _ => 1.0,
        }
    }

    /// Decision-weight multipliers. Actions not listed keep weight ×1.
    #[must_use]
    pub fn decision_modifiers(self) -> &'static [(Action, f32)] {
        match self {
            Self::Timid => &[(Action::AvoidingThreat, 1.5), (Action::ApproachingRock, 0.7)],
            Self::Adventurous => &[(Action::Exploring, 1.3), (Action::ApproachingRock, 1.2)],
            Self::Lazy => &[
                (Action::Eating, 1.2),
                (Action::Exploring, 0.6),
                (Action::ApproachingRock, 0.8),
            ],
            Self::Energetic => &[
                (Action::Exploring, 1.4),
                (Action::ThrowingRock, 1.3),
                (Action::Organizing, 0.8),
            ],
            Self::Introvert => &[
                (Action::Organizing, 1.3),
                (Action::AvoidingThreat, 1.1),
                (Action::Exploring, 0.9),
            ],
            Self::Greedy => &[(Action::Eating, 1.5)],
            Self::Stubborn => &[
                (Action::Organizing, 1.2),
                (Action::ThrowingRock, 1.1),
                (Action::AvoidingThreat, 0.8),
            ],
        }
    }

    /// Decision multiplier for a single action.
    #[must_use]
    pub fn decision_modifier(self, action: Action) -> f32 {
        self.decision_modifiers()
            .iter()
            .find(|(a, _)| *a == action)
            .map_or(1.0, |(_, m)| *m)
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownPersonality(s.to_string()))
    }
}
