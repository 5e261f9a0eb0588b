//! Relics that adjust the player's ether multiplier.
//!
//! Relic definitions come from a static catalog keyed by id. An unknown id
//! is treated as absent rather than an error.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cards that must be played in one turn for `EtherFullHand` to fire.
pub const FULL_HAND_CARDS: usize = 5;

/// How a relic changes the combo multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RelicEffect {
    /// Multiply by `1 + x × cards played`.
    EtherPerCard(f64),
    /// Multiply by `x` when at least five cards were played.
    EtherFullHand(f64),
    /// Multiply by `x` on the first banked turn, then spent.
    EtherAmplifier(f64),
}

/// A relic definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relic {
    pub id: String,
    pub name: String,
    pub effect: RelicEffect,
}

impl Relic {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effect: RelicEffect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effect,
        }
    }
}

/// Static relic catalog.
#[derive(Clone, Debug, Default)]
pub struct RelicCatalog {
    relics: FxHashMap<String, Relic>,
}

impl RelicCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from relic definitions.
    pub fn from_relics(relics: impl IntoIterator<Item = Relic>) -> Self {
        let mut catalog = Self::new();
        for relic in relics {
            catalog.register(relic);
        }
        catalog
    }

    /// Add a relic, returning any definition it replaced.
    pub fn register(&mut self, relic: Relic) -> Option<Relic> {
        self.relics.insert(relic.id.clone(), relic)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Relic> {
        self.relics.get(id)
    }

    /// Look up a list of ids, dropping unknown ones.
    #[must_use]
    pub fn resolve(&self, ids: &[String]) -> Vec<Relic> {
        ids.iter()
            .filter_map(|id| {
                let relic = self.get(id);
                if relic.is_none() {
                    debug!(relic = %id, "unknown relic id ignored");
                }
                relic.cloned()
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relics.is_empty()
    }
}

/// The relics one side carries into battle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicSet {
    relics: Vec<Relic>,
    /// Amplifiers not yet spent, by index into `relics`.
    unspent: Vec<usize>,
}

impl RelicSet {
    pub fn new(relics: Vec<Relic>) -> Self {
        let unspent = relics
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r.effect, RelicEffect::EtherAmplifier(_)))
            .map(|(i, _)| i)
            .collect();
        Self { relics, unspent }
    }

    #[must_use]
    pub fn relics(&self) -> &[Relic] {
        &self.relics
    }

    /// Combined multiplier for a turn with `cards_played` cards.
    ///
    /// Spends every unspent amplifier when at least one card was played.
    pub fn multiplier(&mut self, cards_played: usize) -> f64 {
        let mut multiplier = 1.0;
        for relic in &self.relics {
            match relic.effect {
                RelicEffect::EtherPerCard(x) => multiplier *= 1.0 + x * cards_played as f64,
                RelicEffect::EtherFullHand(x) if cards_played >= FULL_HAND_CARDS => multiplier *= x,
                _ => {}
            }
        }

        if cards_played > 0 {
            for index in self.unspent.drain(..) {
                if let RelicEffect::EtherAmplifier(x) = self.relics[index].effect {
                    debug!(relic = %self.relics[index].id, factor = x, "amplifier spent");
                    multiplier *= x;
                }
            }
        }

        multiplier
    }
}
