//! Builders for rounds in a chosen position.
//!
//! Every crafted round still holds the full 108 cards: whatever the hands and
//! discard pile do not use goes to the draw pile in canonical order.
#![allow(dead_code)]

use uno_engine::cards::{full_deck, Card, Color};
use uno_engine::random::identity_shuffler;
use uno_engine::round::{Direction, Round, RoundSnapshot};

pub fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{}", i)).collect()
}

pub fn num(color: Color, number: u8) -> Card {
    Card::Numbered { color, number }
}

/// Snapshot with the given hands, discard pile (top first) and seat in turn.
pub fn snapshot(
    hands: Vec<Vec<Card>>,
    discard: Vec<Card>,
    player_in_turn: Option<usize>,
    direction: Direction,
) -> RoundSnapshot {
    let mut pool = full_deck();
    for card in hands.iter().flatten().chain(discard.iter()) {
        let pos = pool
            .iter()
            .position(|c| c == card)
            .unwrap_or_else(|| panic!("no {} left in the deck", card));
        pool.remove(pos);
    }
    let current_color = discard.first().and_then(Card::color).or(Some(Color::Red));
    RoundSnapshot {
        players: names(hands.len()),
        hands: hands
            .iter()
            .map(|h| h.iter().map(Card::to_record).collect())
            .collect(),
        draw_pile: pool.iter().map(Card::to_record).collect(),
        discard_pile: discard.iter().map(Card::to_record).collect(),
        current_color,
        current_direction: direction,
        dealer: 0,
        player_in_turn,
    }
}

/// Clockwise round with `top` on the discard pile and `in_turn` to act.
pub fn round(hands: Vec<Vec<Card>>, top: Card, in_turn: usize) -> Round {
    let snap = snapshot(hands, vec![top], Some(in_turn), Direction::Clockwise);
    Round::from_snapshot(&snap, identity_shuffler()).expect("crafted snapshot is valid")
}
