//! The card store: every card a game knows, with its progress.

use crate::types::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Authoritative collection of cards, keyed by identity.
///
/// A source is a named origin of cards (the base set, a feature, a word
/// list). Sources only record which seeds have run; cards themselves are
/// shared, so two sources producing the same prompt yield one card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardStore {
    cards: BTreeMap<CardId, Card>,
    #[serde(default)]
    sources: BTreeSet<String>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `source` with `cards`.
    ///
    /// Running it again for an initialized source does nothing unless
    /// `force` is set, which resets those cards to their fresh state.
    /// Returns the number of cards written.
    pub fn initialize(&mut self, source: &str, cards: Vec<Card>, force: bool) -> usize {
        if self.sources.contains(source) && !force {
            return 0;
        }
        self.sources.insert(source.to_string());
        let count = cards.len();
        for card in cards {
            self.cards.insert(card.id.clone(), card);
        }
        count
    }

    /// Add `cards` under `source`, keeping any card already present.
    /// Returns how many were new.
    pub fn add_cards(&mut self, source: &str, cards: Vec<Card>) -> usize {
        self.sources.insert(source.to_string());
        let before = self.cards.len();
        let mut offered = 0;
        for card in cards {
            offered += 1;
            self.cards.entry(card.id.clone()).or_insert(card);
        }
        let added = self.cards.len() - before;
        debug_assert!(added <= offered, "store grew by more cards than offered");
        added
    }

    /// Delete cards and their progress, and forget `source`. Returns how
    /// many cards were deleted.
    pub fn remove_cards(&mut self, source: &str, ids: &BTreeSet<CardId>) -> usize {
        self.sources.remove(source);
        let before = self.cards.len();
        self.cards.retain(|id, _| !ids.contains(id));
        before - self.cards.len()
    }

    /// Replace a stored card with its updated state. Cards not in the store
    /// are ignored.
    pub(crate) fn replace(&mut self, card: Card) -> bool {
        match self.cards.get_mut(&card.id) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    pub fn is_initialized(&self, source: &str) -> bool {
        self.sources.contains(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
