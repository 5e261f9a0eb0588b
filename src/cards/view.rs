//! Enhanced card views.
//!
//! A `CardView` is what the scheduler and resolver actually work with: the
//! untouched catalog record plus the effective stats after trait, combo and
//! usage modifiers.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardCategory, CardId, CardKind};
use super::tags::{SpecialEffect, TraitTag};

/// A card as it will be scheduled and resolved this turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    /// Per-turn instance id, unique within one side's submission.
    pub uid: u32,

    /// The catalog record this view was derived from.
    pub card: Card,

    pub damage: i32,
    pub block: i32,
    pub hits: u32,
    pub energy_cost: i32,
    pub speed_cost: i32,
    pub counter: Option<i32>,

    /// Whether the card's energy cost is part of the submitted combo.
    pub in_combo: bool,
}

impl CardView {
    /// A view with no modifiers applied.
    #[must_use]
    pub fn plain(uid: u32, card: &Card) -> Self {
        Self {
            uid,
            damage: card.damage,
            block: card.block,
            hits: card.hits.max(1),
            energy_cost: card.energy_cost,
            speed_cost: card.speed_cost,
            counter: card.counter,
            in_combo: false,
            card: card.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.card.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.card.kind
    }

    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.card.kind == CardKind::Attack
    }

    #[must_use]
    pub fn is_weapon(&self) -> bool {
        self.card.category == CardCategory::Weapon
    }

    #[must_use]
    pub fn special(&self) -> Option<SpecialEffect> {
        self.card.special
    }

    #[must_use]
    pub fn has_trait(&self, tag: TraitTag) -> bool {
        self.card.has_trait(tag)
    }
}
