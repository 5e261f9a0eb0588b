//! Turn carry effects.
//!
//! Produced at turn end from the traits of the cards a side actually
//! resolved, consumed by the next turn's setup.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardView, TraitTag};

/// Secondary-card odds added per `Lucky` card.
const LUCKY_BOOST: f64 = 0.25;
/// Speed budget added per `Haste` card.
const HASTE_SPEED: i32 = 5;

/// Effects that carry from one turn into the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnCarryEffects {
    /// Cards dealt into next turn's hand regardless of odds.
    pub guaranteed: Vec<CardId>,
    /// Added to next turn's energy (may be negative).
    pub energy_delta: i32,
    /// Next turn's ether gain is forced to zero.
    pub no_ether: bool,
    /// Only primary cards are dealt next turn.
    pub only_primary: bool,
    /// Added to next turn's secondary-card odds.
    pub secondary_boost: f64,
    /// Added to next turn's speed budget.
    pub extra_speed: i32,
    /// Added to next turn's submission cap.
    pub extra_slots: usize,
}

impl TurnCarryEffects {
    /// Collect carry effects from resolved cards.
    pub fn collect<'a>(played: impl IntoIterator<Item = &'a CardView>) -> Self {
        let mut carry = Self::default();
        for view in played {
            for tag in &view.card.traits {
                match tag {
                    TraitTag::Recall => {
                        if !carry.guaranteed.contains(view.id()) {
                            carry.guaranteed.push(view.id().clone());
                        }
                    }
                    TraitTag::Surge => carry.energy_delta += 1,
                    TraitTag::Drain => carry.energy_delta -= 1,
                    TraitTag::Void => carry.no_ether = true,
                    TraitTag::Focus => carry.only_primary = true,
                    TraitTag::Lucky => carry.secondary_boost += LUCKY_BOOST,
                    TraitTag::Haste => carry.extra_speed += HASTE_SPEED,
                    TraitTag::Expand => carry.extra_slots += 1,
                    _ => {}
                }
            }
        }
        carry
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
