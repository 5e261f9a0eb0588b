//! Card definitions - static card data.
//!
//! `Card` holds the immutable catalog record for a card. The engine never
//! mutates it; trait, combo and usage modifiers produce a separate
//! [`CardView`](super::CardView) instead.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tags::{SpecialEffect, TraitTag};

/// Catalog identifier for a card.
///
/// Ordered lexicographically, which the enemy planner relies on for its
/// final tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a card does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Defense,
}

/// Weapon class of a card.
///
/// `Weapon` cards roll for a jam before every hit after the first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    #[default]
    Standard,
    Weapon,
}

/// Rarity tier, used to scale per-card ether gain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Special,
    Legendary,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ether_duel::cards::{Card, CardKind, TraitTag};
///
/// let slash = Card::attack("slash", "Slash", 1, 5, 8)
///     .with_hits(2)
///     .with_trait(TraitTag::Crush);
///
/// assert_eq!(slash.kind, CardKind::Attack);
/// assert!(slash.has_trait(TraitTag::Crush));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    pub energy_cost: i32,
    pub speed_cost: i32,
    #[serde(default)]
    pub damage: i32,
    /// Hits per play; always at least 1.
    #[serde(default = "default_hits")]
    pub hits: u32,
    #[serde(default)]
    pub block: i32,
    /// Counter damage set on the actor when this defense card resolves.
    #[serde(default)]
    pub counter: Option<i32>,
    #[serde(default)]
    pub traits: SmallVec<[TraitTag; 4]>,
    #[serde(default)]
    pub category: CardCategory,
    #[serde(default)]
    pub special: Option<SpecialEffect>,
    #[serde(default)]
    pub rarity: Rarity,
}

fn default_hits() -> u32 {
    1
}

impl Card {
    /// Create a card with zeroed combat stats.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        kind: CardKind,
        energy_cost: i32,
        speed_cost: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            energy_cost,
            speed_cost,
            damage: 0,
            hits: 1,
            block: 0,
            counter: None,
            traits: SmallVec::new(),
            category: CardCategory::Standard,
            special: None,
            rarity: Rarity::Common,
        }
    }

    /// Create an attack card.
    #[must_use]
    pub fn attack(
        id: impl Into<CardId>,
        name: impl Into<String>,
        energy_cost: i32,
        speed_cost: i32,
        damage: i32,
    ) -> Self {
        let mut card = Self::new(id, name, CardKind::Attack, energy_cost, speed_cost);
        card.damage = damage;
        card
    }

    /// Create a defense card.
    #[must_use]
    pub fn defense(
        id: impl Into<CardId>,
        name: impl Into<String>,
        energy_cost: i32,
        speed_cost: i32,
        block: i32,
    ) -> Self {
        let mut card = Self::new(id, name, CardKind::Defense, energy_cost, speed_cost);
        card.block = block;
        card
    }

    /// Set the hit count (clamped to at least 1).
    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.max(1);
        self
    }

    /// Set the counter value granted on defense.
    #[must_use]
    pub fn with_counter(mut self, counter: i32) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Add a trait tag.
    #[must_use]
    pub fn with_trait(mut self, tag: TraitTag) -> Self {
        if !self.traits.contains(&tag) {
            self.traits.push(tag);
        }
        self
    }

    /// Set the weapon category.
    #[must_use]
    pub fn with_category(mut self, category: CardCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the special effect.
    #[must_use]
    pub fn with_special(mut self, special: SpecialEffect) -> Self {
        self.special = Some(special);
        self
    }

    /// Set the rarity tier.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Check for a trait tag.
    #[must_use]
    pub fn has_trait(&self, tag: TraitTag) -> bool {
        self.traits.contains(&tag)
    }

    /// Damage summed over every declared hit.
    #[must_use]
    pub fn total_damage(&self) -> i32 {
        self.damage * self.hits as i32
    }
}
