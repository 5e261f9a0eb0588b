//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores the static card records a battle draws from.
//! Lookups are tolerant: an id the catalog does not know is treated as an
//! absent card, never as an error.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::definition::{Card, CardId};

/// Read-only catalog of card definitions, keyed by id.
///
/// ## Example
///
/// ```
/// use ether_duel::cards::{Card, CardCatalog, CardId};
///
/// let catalog = CardCatalog::from_cards([Card::attack("jab", "Jab", 1, 3, 4)]);
///
/// assert_eq!(catalog.get(&CardId::new("jab")).unwrap().damage, 4);
/// assert!(catalog.get(&CardId::new("missing")).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Card>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from card records. Later duplicates replace earlier ones.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card);
        }
        catalog
    }

    /// Register a card definition, returning any record it replaced.
    pub fn register(&mut self, card: Card) -> Option<Card> {
        self.cards.insert(card.id.clone(), card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Resolve a list of ids to cards, dropping unknown ids.
    #[must_use]
    pub fn resolve(&self, ids: &[CardId]) -> Vec<Card> {
        ids.iter()
            .filter_map(|id| {
                let card = self.get(id);
                if card.is_none() {
                    debug!(card = %id, "unknown card id ignored");
                }
                card.cloned()
            })
            .collect()
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
