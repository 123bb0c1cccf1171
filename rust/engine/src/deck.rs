use std::collections::VecDeque;

use crate::cards::{full_deck, Card, CardRecord};
use crate::errors::ValidationError;
use crate::random::Shuffler;

/// Number of cards in a complete deck.
pub const DECK_SIZE: usize = 108;

/// Ordered stack of cards, dealt from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// All 108 cards in canonical order; call [`Deck::shuffle`] before dealing.
    pub fn standard() -> Self {
        Self::from_cards(full_deck())
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Put a card on top, so it is the next one dealt.
    pub fn push_front(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Put a card at the bottom.
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn shuffle<S: Shuffler + ?Sized>(&mut self, shuffler: &mut S) {
        shuffler.shuffle(self.cards.make_contiguous());
    }

    pub fn filter<P>(&self, mut predicate: P) -> Deck
    where
        P: FnMut(&Card) -> bool,
    {
        Deck {
            cards: self.cards.iter().filter(|c| predicate(c)).copied().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }

    pub fn to_snapshot(&self) -> Vec<CardRecord> {
        self.cards.iter().map(Card::to_record).collect()
    }

    /// Rebuild a deck from plain records, rejecting the first malformed one.
    pub fn from_snapshot(records: &[CardRecord]) -> Result<Self, ValidationError> {
        let cards = records
            .iter()
            .map(Card::try_from)
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self { cards })
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::from_cards(iter)
    }
}
