use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;

/// One of the four card colors.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Blue,
    Green,
    Red,
    Yellow,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Red => "RED",
            Color::Yellow => "YELLOW",
        }
    }

    pub fn parse(s: &str) -> Option<Color> {
        match s {
            "BLUE" => Some(Color::Blue),
            "GREEN" => Some(Color::Green),
            "RED" => Some(Color::Red),
            "YELLOW" => Some(Color::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn all_colors() -> [Color; 4] {
    [Color::Blue, Color::Green, Color::Red, Color::Yellow]
}

/// A single UNO card.
///
/// The variants are closed: legality, scoring and serialization all match on
/// them exhaustively.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Card {
    /// Colored card with a face value 0-9
    Numbered { color: Color, number: u8 },
    /// Next player loses their turn
    Skip(Color),
    /// Direction of play flips
    Reverse(Color),
    /// Next player draws two and loses their turn
    Draw(Color),
    /// Player chooses the color in play
    Wild,
    /// Player chooses the color; next player draws four and loses their turn
    WildDraw,
}

/// Points for card kinds other than numbered cards.
pub const ACTION_POINTS: u32 = 20;
pub const WILD_POINTS: u32 = 50;

impl Card {
    /// Wire name of the card kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Card::Numbered { .. } => "NUMBERED",
            Card::Skip(_) => "SKIP",
            Card::Reverse(_) => "REVERSE",
            Card::Draw(_) => "DRAW",
            Card::Wild => "WILD",
            Card::WildDraw => "WILD DRAW",
        }
    }

    /// Printed color, `None` for wild cards.
    pub fn color(&self) -> Option<Color> {
        match *self {
            Card::Numbered { color, .. }
            | Card::Skip(color)
            | Card::Reverse(color)
            | Card::Draw(color) => Some(color),
            Card::Wild | Card::WildDraw => None,
        }
    }

    pub fn number(&self) -> Option<u8> {
        match *self {
            Card::Numbered { number, .. } => Some(number),
            _ => None,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDraw)
    }

    /// Points counted against a player still holding this card at round end.
    pub fn points(&self) -> u32 {
        match self {
            Card::Numbered { number, .. } => u32::from(*number),
            Card::Skip(_) | Card::Reverse(_) | Card::Draw(_) => ACTION_POINTS,
            Card::Wild | Card::WildDraw => WILD_POINTS,
        }
    }

    /// Whether this card may be played on `top` while `color` is in play.
    ///
    /// Wilds are always legal. Colored cards match on color, on number
    /// (numbered cards) or on symbol (action cards). With no color in play,
    /// as after a wild start card, every card is legal.
    pub fn can_play_on(&self, top: &Card, color: Option<Color>) -> bool {
        let Some(color) = color else {
            return true;
        };
        match (*self, *top) {
            (Card::Wild, _) | (Card::WildDraw, _) => true,
            (c, _) if c.color() == Some(color) => true,
            (Card::Numbered { number: a, .. }, Card::Numbered { number: b, .. }) => a == b,
            (Card::Skip(_), Card::Skip(_))
            | (Card::Reverse(_), Card::Reverse(_))
            | (Card::Draw(_), Card::Draw(_)) => true,
            _ => false,
        }
    }

    pub fn to_record(&self) -> CardRecord {
        CardRecord {
            kind: self.type_name().to_string(),
            color: self.color().map(|c| c.as_str().to_string()),
            number: self.number().map(i64::from),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Numbered { color, number } => write!(f, "{} {}", color, number),
            Card::Skip(color) | Card::Reverse(color) | Card::Draw(color) => {
                write!(f, "{} {}", color, self.type_name())
            }
            Card::Wild | Card::WildDraw => f.write_str(self.type_name()),
        }
    }
}

/// Plain-data card as it appears in snapshots: `{type, color?, number?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        card.to_record()
    }
}

impl TryFrom<&CardRecord> for Card {
    type Error = ValidationError;

    fn try_from(record: &CardRecord) -> Result<Self, Self::Error> {
        let color = |kind: &'static str| -> Result<Color, ValidationError> {
            let raw = record
                .color
                .as_deref()
                .ok_or(ValidationError::MissingColor { kind })?;
            Color::parse(raw).ok_or_else(|| ValidationError::UnknownColor(raw.to_string()))
        };
        match record.kind.as_str() {
            "NUMBERED" => {
                let color = color("NUMBERED")?;
                let number = record.number.ok_or(ValidationError::MissingNumber)?;
                if !(0..=9).contains(&number) {
                    return Err(ValidationError::NumberOutOfRange(number));
                }
                Ok(Card::Numbered {
                    color,
                    number: number as u8,
                })
            }
            "SKIP" => Ok(Card::Skip(color("SKIP")?)),
            "REVERSE" => Ok(Card::Reverse(color("REVERSE")?)),
            "DRAW" => Ok(Card::Draw(color("DRAW")?)),
            "WILD" => Ok(Card::Wild),
            "WILD DRAW" => Ok(Card::WildDraw),
            other => Err(ValidationError::UnknownCardType(other.to_string())),
        }
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = ValidationError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        Card::try_from(&record)
    }
}

impl Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = CardRecord::deserialize(deserializer)?;
        Card::try_from(&record).map_err(serde::de::Error::custom)
    }
}

/// The 108-card deck in canonical (unshuffled) order.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(crate::deck::DECK_SIZE);
    for &color in &all_colors() {
        v.push(Card::Numbered { color, number: 0 });
        for number in 1..=9 {
            v.push(Card::Numbered { color, number });
            v.push(Card::Numbered { color, number });
        }
    }
    for &color in &all_colors() {
        for _ in 0..2 {
            v.push(Card::Skip(color));
        }
        for _ in 0..2 {
            v.push(Card::Reverse(color));
        }
        for _ in 0..2 {
            v.push(Card::Draw(color));
        }
    }
    for _ in 0..4 {
        v.push(Card::Wild);
        v.push(Card::WildDraw);
    }
    v
}
