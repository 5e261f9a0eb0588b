//! Trait tags and special effects carried by cards.
//!
//! Trait tags are passive modifiers read by the [`TraitPipeline`](super::TraitPipeline)
//! (stat changes) and by turn-end carry resolution (next-turn effects).
//! Special effects are one-off mechanics fired when the card resolves.

use serde::{Deserialize, Serialize};

/// Passive card modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitTag {
    /// Damage counts double when compared against block.
    Crush,
    /// Speed cost -25%.
    Swift,
    /// Speed cost +25%, damage +25%.
    Heavy,
    /// +1 damage for every earlier use of this card this battle.
    Mastery,
    /// Damage and block +50% while the card is a combo member.
    Resonant,

    // Turn-end carry traits
    /// Guaranteed in next turn's hand.
    Recall,
    /// +1 energy next turn.
    Surge,
    /// -1 energy next turn.
    Drain,
    /// No ether gain next turn.
    Void,
    /// Only primary cards are dealt next turn.
    Focus,
    /// Secondary cards are more likely next turn.
    Lucky,
    /// Extra speed budget next turn.
    Haste,
    /// One more submission slot next turn.
    Expand,
}

/// One-off mechanic triggered when a card resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Remove opposing actions inside the disable window after this one.
    Disrupt,
    /// Insert a ghost copy of this card later on the timeline.
    Echo,
    /// Push every unresolved opposing action back.
    Stagger,
    /// Keep manual submission order for the next merge(s).
    Freeze,
    /// Put burn stacks on the defender.
    Burn(u32),
    /// Grant the actor bonus damage on their next attack.
    Empower(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_serde() {
        let json = serde_json::to_string(&SpecialEffect::Burn(3)).unwrap();
        let back: SpecialEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SpecialEffect::Burn(3));
    }
}
