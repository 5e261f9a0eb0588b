//! Battle configuration.
//!
//! Every tuning constant the engine uses lives here and is handed to the
//! `TurnController` at construction:
//! - `ComboTable`: ether multiplier per combo name
//! - `RarityTable`: ether gain scaling per card rarity
//! - `StanceWeights`: odds of each enemy stance
//! - `BattleConfig`: combines all of the above with budget and timeline constants
//!
//! Hosts may load a `BattleConfig` from JSON; omitted fields fall back to
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::cards::Rarity;
use crate::combo::ComboName;
use crate::planner::Stance;

/// Ether multiplier per combo name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTable {
    pub none: f64,
    pub pair: f64,
    pub two_pair: f64,
    pub triple: f64,
    pub flush: f64,
    pub full_house: f64,
    pub four_of_a_kind: f64,
    pub five_of_a_kind: f64,
}

impl Default for ComboTable {
    fn default() -> Self {
        Self {
            none: 1.0,
            pair: 2.0,
            two_pair: 2.5,
            triple: 3.0,
            flush: 3.25,
            full_house: 3.5,
            four_of_a_kind: 4.0,
            five_of_a_kind: 5.0,
        }
    }
}

impl ComboTable {
    /// Base multiplier for a combo (or for no combo).
    #[must_use]
    pub fn get(&self, combo: Option<ComboName>) -> f64 {
        match combo {
            None => self.none,
            Some(ComboName::Pair) => self.pair,
            Some(ComboName::TwoPair) => self.two_pair,
            Some(ComboName::Triple) => self.triple,
            Some(ComboName::Flush) => self.flush,
            Some(ComboName::FullHouse) => self.full_house,
            Some(ComboName::FourOfAKind) => self.four_of_a_kind,
            Some(ComboName::FiveOfAKind) => self.five_of_a_kind,
        }
    }
}

/// Ether gain scaling per card rarity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityTable {
    pub common: f64,
    pub rare: f64,
    pub special: f64,
    pub legendary: f64,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            common: 1.0,
            rare: 1.5,
            special: 2.0,
            legendary: 3.0,
        }
    }
}

impl RarityTable {
    /// Multiplier for a rarity tier.
    #[must_use]
    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Special => self.special,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Relative odds of each enemy stance when no stance is pinned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceWeights {
    pub aggressive: f64,
    pub defensive: f64,
    pub balanced: f64,
}

impl Default for StanceWeights {
    fn default() -> Self {
        Self {
            aggressive: 0.4,
            defensive: 0.3,
            balanced: 0.3,
        }
    }
}

impl StanceWeights {
    /// Weights in `Stance::ALL` order.
    #[must_use]
    pub fn as_array(&self) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (slot, stance) in out.iter_mut().zip(Stance::ALL) {
            *slot = match stance {
                Stance::Aggressive => self.aggressive,
                Stance::Defensive => self.defensive,
                Stance::Balanced => self.balanced,
            };
        }
        out
    }
}

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Ether multiplier per combo.
    pub combo_multipliers: ComboTable,

    /// Geometric decay base for repeated combos (0.5 = halve each reuse).
    pub deflation_base: f64,

    /// Flat ether contributed by each non-ghost card before rarity scaling.
    pub ether_per_card: i64,

    /// Rarity scaling of per-card ether.
    pub rarity_multipliers: RarityTable,

    /// Default player energy budget per turn.
    pub max_energy: i32,

    /// Default player speed budget per turn.
    pub max_speed: i32,

    /// Default number of cards the player may submit per turn.
    pub max_submit: usize,

    /// Enemy energy budget per turn (the enemy payload carries none).
    pub enemy_max_energy: i32,

    /// Enemy card cap per turn before multi-unit widening.
    pub enemy_max_cards: usize,

    /// Fractional speed change per agility point (positive agility = faster).
    pub agility_step: f64,

    /// Smallest effective speed cost any card can have.
    pub min_speed: i32,

    /// Disrupt removes opposing actions within this many sp above the trigger.
    pub disable_window: i32,

    /// Echo ghosts land this many sp after the trigger.
    pub ghost_offset: i32,

    /// Stagger pushes opposing actions back by this many sp.
    pub stagger_delta: i32,

    /// How many merges a Freeze keeps manual order for.
    pub freeze_uses: u32,

    /// Per-hit jam chance for weapon cards, rolled before every hit after the first.
    pub jam_chance: f64,

    /// Attacker vulnerability per point of block left standing.
    pub vulnerability_factor: f64,

    /// Turns an accrued vulnerability lasts if no hit consumes it.
    pub vulnerability_turns: u32,

    /// Ether per overdrive slot.
    pub ether_slot_cost: i64,

    /// Base chance for each secondary card to be dealt.
    pub secondary_odds: f64,

    /// Enemy stance odds.
    pub stance_weights: StanceWeights,

    /// Planner speed widening per unit beyond the first.
    pub planner_speed_widen: i32,

    /// Planner energy widening per unit beyond the first.
    pub planner_energy_widen: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            combo_multipliers: ComboTable::default(),
            deflation_base: 0.5,
            ether_per_card: 10,
            rarity_multipliers: RarityTable::default(),
            max_energy: 6,
            max_speed: 30,
            max_submit: 5,
            enemy_max_energy: 6,
            enemy_max_cards: 3,
            agility_step: 0.1,
            min_speed: 1,
            disable_window: 5,
            ghost_offset: 3,
            stagger_delta: 4,
            freeze_uses: 1,
            jam_chance: 0.15,
            vulnerability_factor: 0.5,
            vulnerability_turns: 1,
            ether_slot_cost: 100,
            secondary_odds: 0.5,
            stance_weights: StanceWeights::default(),
            planner_speed_widen: 10,
            planner_energy_widen: 3,
        }
    }
}

impl BattleConfig {
    /// Set the deflation base.
    #[must_use]
    pub fn with_deflation_base(mut self, base: f64) -> Self {
        self.deflation_base = base;
        self
    }

    /// Set the combo multiplier table.
    #[must_use]
    pub fn with_combo_multipliers(mut self, table: ComboTable) -> Self {
        self.combo_multipliers = table;
        self
    }

    /// Set the jam chance for weapon cards.
    #[must_use]
    pub fn with_jam_chance(mut self, chance: f64) -> Self {
        self.jam_chance = chance;
        self
    }

    /// Set the chance for secondary cards to be dealt.
    #[must_use]
    pub fn with_secondary_odds(mut self, odds: f64) -> Self {
        self.secondary_odds = odds;
        self
    }

    /// Set the enemy stance odds.
    #[must_use]
    pub fn with_stance_weights(mut self, weights: StanceWeights) -> Self {
        self.stance_weights = weights;
        self
    }

    /// Set the player's default energy and speed budgets.
    #[must_use]
    pub fn with_budgets(mut self, max_energy: i32, max_speed: i32) -> Self {
        self.max_energy = max_energy;
        self.max_speed = max_speed;
        self
    }
}
