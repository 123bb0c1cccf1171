//! # uno-engine: UNO Rules Engine Core
//!
//! A deterministic UNO engine: deck construction, dealing, turn order with
//! reversal, action and wild cards, uno declarations and catches, scoring and
//! match play. Every state can be exported to a plain-data snapshot and
//! restored exactly, and all randomness is injected so play is replayable.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Color, Card) and snapshot records
//! - [`deck`] - Ordered card stack with injected shuffling
//! - [`random`] - Shuffler and randomizer ports, seeded ChaCha20 generator
//! - [`round`] - The turn-based round state machine
//! - [`game`] - Match play across rounds up to a target score
//! - [`logger`] - JSONL round history
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use uno_engine::cards::Color;
//! use uno_engine::game::{Game, GameConfig};
//! use uno_engine::random::SeededRng;
//!
//! let config = GameConfig {
//!     players: vec!["Ann".into(), "Bo".into(), "Cy".into()],
//!     ..GameConfig::default()
//! };
//! let mut game = Game::new(
//!     config,
//!     Box::new(SeededRng::new(1)),
//!     Box::new(SeededRng::new(2)),
//! )
//! .unwrap();
//!
//! let round = game.current_round().unwrap();
//! let seat = round.player_in_turn().unwrap();
//! match round.legal_plays().first() {
//!     Some(&index) => {
//!         // Wilds need a color; any will do after a wild start card.
//!         let color = round.current_color().or(Some(Color::Red));
//!         game.play(index, color).unwrap();
//!     }
//!     None => {
//!         game.draw().unwrap();
//!     }
//! }
//! assert_ne!(game.current_round().unwrap().player_in_turn(), Some(seat));
//! ```
//!
//! ## Snapshots
//!
//! ```rust
//! use uno_engine::round::{Round, RoundConfig};
//! use uno_engine::random::SeededRng;
//!
//! let players = vec!["Ann".to_string(), "Bo".to_string(), "Cy".to_string()];
//! let round = Round::new(RoundConfig::new(players, 0), Box::new(SeededRng::new(9))).unwrap();
//! let json = serde_json::to_string(&round.to_snapshot()).unwrap();
//!
//! let snapshot = serde_json::from_str(&json).unwrap();
//! let restored = Round::from_snapshot(&snapshot, Box::new(SeededRng::new(9))).unwrap();
//! assert_eq!(restored.to_snapshot(), round.to_snapshot());
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod logger;
pub mod random;
pub mod round;
