//! Card and table formatters for terminal display.
//!
//! ```rust
//! use uno_engine::cards::{Card, Color};
//! use uno_cli::formatters::format_hand;
//!
//! let hand = [Card::Numbered { color: Color::Red, number: 7 }, Card::Wild];
//! assert_eq!(format_hand(&hand), "[0] RED 7  [1] WILD");
//! ```

use uno_engine::cards::{Card, Color};
use uno_engine::round::{Direction, Round};

/// Cards with the index a player would use to play them.
pub fn format_hand(hand: &[Card]) -> String {
    hand.iter()
        .enumerate()
        .map(|(i, card)| format!("[{}] {}", i, card))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn format_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Clockwise => "clockwise",
        Direction::Counterclockwise => "counterclockwise",
    }
}

/// Color in play, or `any` before the first color is named.
pub fn format_color(color: Option<Color>) -> String {
    color.map_or_else(|| "any".to_string(), |c| c.to_string())
}

/// One-line view of the discard top, e.g. `WILD (BLUE)` or `RED 7`.
pub fn format_top(round: &Round) -> String {
    match round.discard_top() {
        Some(card) if card.is_wild() => {
            format!("{} ({})", card, format_color(round.current_color()))
        }
        Some(card) => card.to_string(),
        None => "-".to_string(),
    }
}
