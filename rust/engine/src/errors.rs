use thiserror::Error;

use crate::cards::Card;

/// Malformed card data in a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid card type: {0}")]
    UnknownCardType(String),
    #[error("Invalid color: {0}")]
    UnknownColor(String),
    #[error("{kind} cards must have color")]
    MissingColor { kind: &'static str },
    #[error("Numbered cards must have color and number")]
    MissingNumber,
    #[error("Card number {0} is outside 0-9")]
    NumberOutOfRange(i64),
}

/// An action the rules do not allow in the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Round has already ended")]
    RoundEnded,
    #[error("Match is already finished")]
    MatchFinished,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("Seat {seat} is out of bounds for {player_count} players")]
    SeatOutOfBounds { seat: usize, player_count: usize },
    #[error("Card index {index} is out of bounds for a hand of {hand_size}")]
    CardIndexOutOfBounds { index: usize, hand_size: usize },
    #[error("{card} cannot be played on {top} with {color} in play")]
    IllegalCard {
        card: Card,
        top: Card,
        color: crate::cards::Color,
    },
    #[error("Wild cards require a chosen color")]
    MissingWildColor,
}

/// Snapshot fields that are individually well-formed but inconsistent together.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Expected {expected} cards in play, found {actual}")]
    CardCount { expected: usize, actual: usize },
    #[error("Unexpected number of {0} cards")]
    CardComposition(Card),
    #[error("Number of hands ({hands}) must match number of players ({players})")]
    HandCount { hands: usize, players: usize },
    #[error("Number of scores must match number of players")]
    ScoreCount,
    #[error("At least 2 players are required, found {0}")]
    TooFewPlayers(usize),
    #[error("Discard pile cannot be empty")]
    EmptyDiscardPile,
    #[error("Seat {seat} is out of bounds for {player_count} players")]
    SeatOutOfBounds { seat: usize, player_count: usize },
    #[error("A round in progress cannot have an empty hand")]
    EndedWithPlayerInTurn,
    #[error("A round with no player in turn must have exactly one empty hand")]
    NoPlayerInTurn,
    #[error("Scores cannot be negative")]
    NegativeScore,
    #[error("Score {0} is out of range")]
    ScoreOutOfRange(i64),
    #[error("Target score must be greater than 0")]
    InvalidTarget,
    #[error("Cannot have multiple winners")]
    MultipleWinners,
    #[error("Finished game cannot have a current round")]
    FinishedWithRound,
    #[error("Unfinished game must have a current round")]
    UnfinishedWithoutRound,
    #[error("Unfinished game cannot carry an ended round")]
    EndedRoundInGame,
    #[error("Round players do not match game players")]
    PlayerMismatch,
}

/// Top-level engine error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    IllegalAction(#[from] ActionError),
    #[error(transparent)]
    StateInvariant(#[from] StateError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
