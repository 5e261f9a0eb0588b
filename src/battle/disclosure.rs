//! Insight/shroud disclosure of the enemy plan.
//!
//! The core only computes how much the host may show; rendering is the
//! host's decision.

use serde::{Deserialize, Serialize};

/// Reveal levels are clamped to `-REVEAL_RANGE..=REVEAL_RANGE`.
pub const REVEAL_RANGE: i32 = 3;

/// `clamp(insight - shroud, -3, 3)`.
#[must_use]
pub fn reveal_level(insight: i32, shroud: i32) -> i32 {
    insight.saturating_sub(shroud).clamp(-REVEAL_RANGE, REVEAL_RANGE)
}

/// Standard mapping from reveal level to what may be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealTier {
    /// Nothing about the plan.
    Hidden,
    /// How many actions are planned.
    Count,
    /// Count and rough timeline order.
    Order,
    /// Card identity, speed and effects.
    Full,
}

impl RevealTier {
    #[must_use]
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=0 => Self::Hidden,
            1 => Self::Count,
            2 => Self::Order,
            _ => Self::Full,
        }
    }

    #[must_use]
    pub fn shows_count(self) -> bool {
        self >= Self::Count
    }

    #[must_use]
    pub fn shows_order(self) -> bool {
        self >= Self::Order
    }

    #[must_use]
    pub fn shows_cards(self) -> bool {
        self == Self::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_level_clamps() {
        assert_eq!(reveal_level(2, 1), 1);
        assert_eq!(reveal_level(9, 0), 3);
        assert_eq!(reveal_level(0, 9), -3);
        assert_eq!(reveal_level(i32::MIN, i32::MAX), -3);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(RevealTier::from_level(-2), RevealTier::Hidden);
        assert_eq!(RevealTier::from_level(0), RevealTier::Hidden);
        assert_eq!(RevealTier::from_level(1), RevealTier::Count);
        assert_eq!(RevealTier::from_level(2), RevealTier::Order);
        assert_eq!(RevealTier::from_level(3), RevealTier::Full);

        assert!(RevealTier::Count.shows_count());
        assert!(!RevealTier::Count.shows_order());
        assert!(RevealTier::Full.shows_cards());
        assert!(!RevealTier::Hidden.shows_count());
    }
}
