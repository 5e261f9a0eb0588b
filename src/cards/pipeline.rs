//! Trait pipeline - pure stat transforms.
//!
//! Percentage modifiers are summed and applied first, then flat modifiers:
//!
//! ```text
//! damage = round(base_damage × (1 + Σ damage%)) + Σ flat damage
//! block  = round(base_block  × (1 + Σ block%))
//! speed  = round(base_speed  × (1 + Σ speed%))
//! ```
//!
//! Strength is not folded in here; the combat resolver adds the actor's
//! current strength at the moment each hit lands.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardId};
use super::tags::TraitTag;
use super::view::CardView;
use crate::combo::ComboResult;

/// Inputs the pipeline needs beyond the card itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnhanceContext {
    /// The card's energy cost is a combo member.
    pub in_combo: bool,
    /// Times this card id was already played this battle.
    pub prior_uses: u32,
}

/// Applies trait, combo and usage modifiers to produce card views.
pub struct TraitPipeline;

impl TraitPipeline {
    /// Enhance a single card.
    #[must_use]
    pub fn enhance(card: &Card, uid: u32, ctx: EnhanceContext) -> CardView {
        let mut damage_pct = 0.0;
        let mut block_pct = 0.0;
        let mut speed_pct = 0.0;
        let mut flat_damage = 0;

        for tag in &card.traits {
            match tag {
                TraitTag::Swift => speed_pct -= 0.25,
                TraitTag::Heavy => {
                    speed_pct += 0.25;
                    damage_pct += 0.25;
                }
                TraitTag::Resonant if ctx.in_combo => {
                    damage_pct += 0.5;
                    block_pct += 0.5;
                }
                TraitTag::Mastery => flat_damage += ctx.prior_uses as i32,
                _ => {}
            }
        }

        let mut view = CardView::plain(uid, card);
        view.in_combo = ctx.in_combo;
        view.damage = scale(card.damage, damage_pct) + if card.damage > 0 { flat_damage } else { 0 };
        view.block = scale(card.block, block_pct);
        view.speed_cost = scale(card.speed_cost, speed_pct);
        view
    }

    /// Enhance a submitted set, marking combo members.
    ///
    /// `cards` pairs each card with its per-turn uid.
    #[must_use]
    pub fn enhance_set(
        cards: &[(u32, Card)],
        combo: Option<&ComboResult>,
        usage: &FxHashMap<CardId, u32>,
    ) -> Vec<CardView> {
        cards
            .iter()
            .map(|(uid, card)| {
                let ctx = EnhanceContext {
                    in_combo: combo.is_some_and(|c| c.includes_cost(card.energy_cost)),
                    prior_uses: usage.get(&card.id).copied().unwrap_or(0),
                };
                Self::enhance(card, *uid, ctx)
            })
            .collect()
    }
}

fn scale(base: i32, pct: f64) -> i32 {
    if base == 0 {
        return 0;
    }
    (f64::from(base) * (1.0 + pct)).round().max(0.0) as i32
}
