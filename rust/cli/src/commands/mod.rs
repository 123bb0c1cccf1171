//! Command handler modules for the `uno` CLI.
//!
//! Each command lives in its own file and exposes one
//! `handle_COMMAND_command(...) -> Result<(), CliError>` function. Output
//! streams are passed in as `&mut dyn Write` so handlers can be tested
//! against in-memory buffers.

pub mod cfg;
pub mod deal;
pub mod sim;
pub mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use sim::handle_sim_command;
pub use verify::handle_verify_command;

use crate::config::Config;
use uno_engine::errors::GameError;
use uno_engine::game::{Game, GameConfig};
use uno_engine::random::SeededRng;

/// Display names for seats: `P1`, `P2`, ...
pub(crate) fn seat_names(players: usize) -> Vec<String> {
    (1..=players).map(|i| format!("P{}", i)).collect()
}

/// Start a match whose shuffles and dealer draws are fixed by `seed`.
pub(crate) fn new_game(settings: &Config, seed: u64) -> Result<Game, GameError> {
    let config = GameConfig {
        players: seat_names(settings.players),
        target_score: settings.target_score,
        cards_per_player: settings.cards_per_player,
    };
    Game::new(
        config,
        Box::new(SeededRng::new(!seed)),
        Box::new(SeededRng::new(seed)),
    )
}
