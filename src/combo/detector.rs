//! Combo classification.
//!
//! A submitted set is classified by how many cards share the same energy
//! cost, poker style. Checks run in priority order:
//!
//! 1. five cards on one cost → `FiveOfAKind`
//! 2. four cards on one cost → `FourOfAKind`
//! 3. a three-group plus a two-group → `FullHouse`
//! 4. four or more cards, all attack or all defense → `Flush`
//! 5. two or more two-groups → `TwoPair`
//! 6. a three-group → `Triple`
//! 7. a two-group → `Pair`
//!
//! Classification only looks at the multiset of (cost, kind), so any
//! permutation of the same cards classifies identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardKind, CardView};

/// Named card combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComboName {
    Pair,
    TwoPair,
    Triple,
    Flush,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl ComboName {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::TwoPair => "two-pair",
            Self::Triple => "triple",
            Self::Flush => "flush",
            Self::FullHouse => "full-house",
            Self::FourOfAKind => "four-of-a-kind",
            Self::FiveOfAKind => "five-of-a-kind",
        }
    }
}

impl std::fmt::Display for ComboName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying a card set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboResult {
    pub name: ComboName,

    /// Energy costs that count as combo members, ascending.
    /// `None` means every card qualifies (flush).
    pub bonus_keys: Option<SmallVec<[i32; 4]>>,
}

impl ComboResult {
    fn with_keys(name: ComboName, keys: impl IntoIterator<Item = i32>) -> Self {
        let mut keys: SmallVec<[i32; 4]> = keys.into_iter().collect();
        keys.sort_unstable();
        Self {
            name,
            bonus_keys: Some(keys),
        }
    }

    /// Whether a card with this energy cost is a combo member.
    #[must_use]
    pub fn includes_cost(&self, energy_cost: i32) -> bool {
        match &self.bonus_keys {
            None => true,
            Some(keys) => keys.contains(&energy_cost),
        }
    }
}

/// Anything the detector can classify.
pub trait ComboCard {
    fn combo_cost(&self) -> i32;
    fn combo_kind(&self) -> CardKind;
}

impl ComboCard for Card {
    fn combo_cost(&self) -> i32 {
        self.energy_cost
    }

    fn combo_kind(&self) -> CardKind {
        self.kind
    }
}

impl ComboCard for CardView {
    fn combo_cost(&self) -> i32 {
        // Membership is keyed on the printed cost, not on modified stats
        self.card.energy_cost
    }

    fn combo_kind(&self) -> CardKind {
        self.card.kind
    }
}

/// Pure combo classifier.
pub struct ComboDetector;

impl ComboDetector {
    /// Classify a card set. Returns `None` when no combo is formed.
    #[must_use]
    pub fn classify<C: ComboCard>(cards: &[C]) -> Option<ComboResult> {
        if cards.len() < 2 {
            return None;
        }

        let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
        for card in cards {
            *histogram.entry(card.combo_cost()).or_insert(0) += 1;
        }

        let groups_of = |n: usize| -> SmallVec<[i32; 4]> {
            histogram
                .iter()
                .filter(|(_, count)| **count == n)
                .map(|(cost, _)| *cost)
                .collect()
        };
        let at_least = |n: usize| histogram.iter().find(|(_, count)| **count >= n).map(|(cost, _)| *cost);

        if let Some(cost) = at_least(5) {
            return Some(ComboResult::with_keys(ComboName::FiveOfAKind, [cost]));
        }
        if let Some(cost) = at_least(4) {
            return Some(ComboResult::with_keys(ComboName::FourOfAKind, [cost]));
        }

        let triples = groups_of(3);
        let pairs = groups_of(2);

        if let (Some(&triple), Some(&pair)) = (triples.first(), pairs.first()) {
            return Some(ComboResult::with_keys(ComboName::FullHouse, [triple, pair]));
        }

        let first_kind = cards[0].combo_kind();
        if cards.len() >= 4 && cards.iter().all(|c| c.combo_kind() == first_kind) {
            return Some(ComboResult {
                name: ComboName::Flush,
                bonus_keys: None,
            });
        }

        if pairs.len() >= 2 {
            return Some(ComboResult::with_keys(ComboName::TwoPair, pairs));
        }
        if let Some(&triple) = triples.first() {
            return Some(ComboResult::with_keys(ComboName::Triple, [triple]));
        }
        if let Some(&pair) = pairs.first() {
            return Some(ComboResult::with_keys(ComboName::Pair, [pair]));
        }

        None
    }
}
