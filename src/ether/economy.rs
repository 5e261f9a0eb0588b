//! Ether economy.
//!
//! ## Turn Flow
//!
//! 1. During resolution every non-ghost card adds a flat, rarity-scaled gain
//!    to its side's `EtherAccumulator`. Pools are not touched yet.
//! 2. At turn end each side banks its accumulator:
//!    ```text
//!    multiplier = combo table[combo] × relic multiplier
//!    deflation  = deflation_base ^ times this combo was already banked
//!    gain       = round(round(accumulated × multiplier) × deflation)
//!    ```
//!    A `no_ether` token forces the gain to zero.
//! 3. Pools settle zero-sum: the side with the larger gain takes the
//!    difference from the other side's pool, limited by what that pool holds
//!    and by the taker's capacity. A defeated enemy's remaining pool is swept
//!    to the player.
//!
//! An enemy pool driven to exactly zero by the transfer is an ether victory.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::CardView;
use crate::combat::{BattleEvent, EventBatch, EventKind};
use crate::combatant::{Combatant, NO_ETHER};
use crate::combo::ComboName;
use crate::core::{BattleConfig, Side, SideMap};

/// Per-side ether gathered during one turn's resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EtherAccumulator {
    totals: SideMap<i64>,
    cards: SideMap<usize>,
}

impl EtherAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolved card. Ghost actions contribute nothing.
    ///
    /// Returns the gain added.
    pub fn record(&mut self, side: Side, view: &CardView, ghost: bool, config: &BattleConfig) -> i64 {
        if ghost {
            return 0;
        }
        let gain = EtherEconomy::card_gain(view, config);
        self.totals[side] += gain;
        self.cards[side] += 1;
        gain
    }

    #[must_use]
    pub fn total(&self, side: Side) -> i64 {
        self.totals[side]
    }

    /// Non-ghost cards recorded for a side.
    #[must_use]
    pub fn cards_played(&self, side: Side) -> usize {
        self.cards[side]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One side's banked turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnBank {
    pub side: Side,
    pub combo: Option<ComboName>,
    pub accumulated: i64,
    /// Combo multiplier including relic adjustments.
    pub multiplier: f64,
    pub deflation: f64,
    pub gain: i64,
    /// A `no_ether` status zeroed the gain.
    pub suppressed: bool,
}

/// Result of settling both sides' gains against the pools.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Side that received the transfer, if anything moved.
    pub gainer: Option<Side>,
    pub transferred: i64,
    /// Enemy ether swept to the player after an hp kill.
    pub swept: i64,
    /// The transfer emptied the enemy pool.
    pub enemy_depleted: bool,
}

/// Stateless ether calculations.
pub struct EtherEconomy;

impl EtherEconomy {
    /// Flat per-card gain scaled by rarity.
    #[must_use]
    pub fn card_gain(view: &CardView, config: &BattleConfig) -> i64 {
        let scale = config.rarity_multipliers.get(view.card.rarity);
        (config.ether_per_card as f64 * scale).round() as i64
    }

    /// Geometric decay for a combo banked `uses` times already.
    #[must_use]
    pub fn deflation(base: f64, uses: u32) -> f64 {
        base.powi(uses.min(i32::MAX as u32) as i32)
    }

    /// `round(round(accumulated × multiplier) × deflation)`.
    #[must_use]
    pub fn final_gain(accumulated: i64, multiplier: f64, deflation: f64) -> i64 {
        let boosted = (accumulated as f64 * multiplier).round();
        (boosted * deflation).round() as i64
    }

    /// Bank one side's turn, incrementing its combo usage.
    ///
    /// `relic_multiplier` is already resolved for this turn's card count.
    pub fn bank(
        side: Side,
        combatant: &mut Combatant,
        combo: Option<ComboName>,
        accumulated: i64,
        relic_multiplier: f64,
        config: &BattleConfig,
    ) -> TurnBank {
        let multiplier = config.combo_multipliers.get(combo) * relic_multiplier;
        let uses = combo.map_or(0, |name| combatant.combo_uses(name));
        let deflation = Self::deflation(config.deflation_base, uses);
        let suppressed = combatant.token_stacks(NO_ETHER) > 0;

        let gain = if suppressed {
            0
        } else {
            Self::final_gain(accumulated, multiplier, deflation)
        };

        if let Some(name) = combo {
            *combatant.combo_usage.entry(name).or_insert(0) += 1;
        }

        debug!(%side, ?combo, accumulated, multiplier, deflation, gain, suppressed, "ether banked");

        TurnBank {
            side,
            combo,
            accumulated,
            multiplier,
            deflation,
            gain,
            suppressed,
        }
    }

    /// Move ether between pools according to both sides' gains.
    pub fn settle(combatants: &mut SideMap<Combatant>, player_gain: i64, enemy_gain: i64) -> Settlement {
        let mut settlement = Settlement::default();
        let net = player_gain - enemy_gain;

        if net != 0 {
            let gainer = if net > 0 { Side::Player } else { Side::Enemy };
            let (to, from) = combatants.pair_mut(gainer);
            let amount = net.abs().min(from.ether).min(to.ether_headroom()).max(0);
            from.ether -= amount;
            to.ether += amount;

            if amount > 0 {
                settlement.gainer = Some(gainer);
                settlement.transferred = amount;
                settlement.enemy_depleted = gainer == Side::Player && from.ether == 0;
            }
        }

        let (player, enemy) = combatants.pair_mut(Side::Player);
        if enemy.is_defeated() && enemy.ether > 0 {
            let swept = enemy.ether.min(player.ether_headroom());
            enemy.ether -= swept;
            player.ether += swept;
            settlement.swept = swept;
        }

        settlement
    }

    /// Events describing a bank.
    pub fn bank_events(bank: &TurnBank, events: &mut EventBatch) {
        if bank.suppressed {
            events.push(
                BattleEvent::new(bank.side, EventKind::NoEther)
                    .with_value(bank.accumulated)
                    .with_message("ether gain suppressed"),
            );
            return;
        }

        let label = bank.combo.map_or("no combo", ComboName::label);
        events.push(
            BattleEvent::new(bank.side, EventKind::Ether)
                .with_value(bank.accumulated)
                .with_value((bank.multiplier * 100.0).round() as i64)
                .with_value(bank.gain)
                .with_message(format!(
                    "{} ether ({}, x{:.2}, decay {:.2})",
                    bank.gain, label, bank.multiplier, bank.deflation
                )),
        );
    }

    /// Event describing a settlement, if anything moved.
    pub fn settlement_event(settlement: &Settlement, combatants: &SideMap<Combatant>) -> Option<BattleEvent> {
        let moved = settlement.transferred + settlement.swept;
        if moved == 0 {
            return None;
        }

        let gainer = settlement.gainer.unwrap_or(Side::Player);
        Some(
            BattleEvent::new(gainer, EventKind::Transfer)
                .with_value(moved)
                .with_value(combatants[Side::Player].ether)
                .with_value(combatants[Side::Enemy].ether)
                .with_message(format!("{gainer} takes {moved} ether")),
        )
    }
}
