//! Enemy stance and plan records.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardKind};
use crate::core::{RandomSource, StanceWeights};

/// The enemy's behavioral bias for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Aggressive,
    Defensive,
    Balanced,
}

impl Stance {
    /// All stances, in weight-table order.
    pub const ALL: [Stance; 3] = [Stance::Aggressive, Stance::Defensive, Stance::Balanced];

    /// Roll a stance from the configured odds.
    ///
    /// Falls back to `Balanced` when every weight is zero.
    pub fn roll(rng: &mut dyn RandomSource, weights: &StanceWeights) -> Self {
        rng.choose_weighted(&weights.as_array())
            .map_or(Stance::Balanced, |i| Self::ALL[i])
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aggressive => write!(f, "aggressive"),
            Self::Defensive => write!(f, "defensive"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

/// The enemy's planned actions for one turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlan {
    pub stance: Stance,
    pub actions: Vec<Card>,
    /// An in-combat effect removed planned actions; the plan must not be
    /// regenerated this turn.
    pub perturbed: bool,
    /// The enemy will pay for overdrive on confirm.
    pub overdrive: bool,
}

impl EnemyPlan {
    pub fn new(stance: Stance, actions: Vec<Card>) -> Self {
        Self {
            stance,
            actions,
            perturbed: false,
            overdrive: false,
        }
    }

    /// Whether any planned action is an attack.
    #[must_use]
    pub fn has_attack(&self) -> bool {
        self.actions.iter().any(|c| c.kind == CardKind::Attack)
    }

    /// Remove one planned action, marking the plan perturbed.
    pub fn remove(&mut self, index: usize) -> Option<Card> {
        if index >= self.actions.len() {
            return None;
        }
        self.perturbed = true;
        Some(self.actions.remove(index))
    }
}
