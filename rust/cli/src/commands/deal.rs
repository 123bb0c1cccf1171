//! Deal command handler.
//!
//! Starts a match and prints the opening position of its first round: dealer,
//! discard top, colour, direction, seat in turn and every hand. With `--json`
//! the full game snapshot is printed instead, ready for `uno verify`.

use super::new_game;
use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_color, format_direction, format_hand, format_top};
use std::io::Write;
use uno_engine::errors::ActionError;

pub fn handle_deal_command(
    settings: &Config,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    let game = new_game(settings, seed)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&game.to_snapshot())?)?;
        return Ok(());
    }

    let round = game
        .current_round()
        .ok_or(CliError::Engine(ActionError::MatchFinished.into()))?;
    let in_turn = match round.player_in_turn() {
        Some(seat) => round.player(seat)?,
        None => "-",
    };

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Dealer: {}", round.player(round.dealer())?)?;
    writeln!(out, "Discard: {}", format_top(round))?;
    writeln!(out, "Color: {}", format_color(round.current_color()))?;
    writeln!(out, "Direction: {}", format_direction(round.direction()))?;
    writeln!(out, "In turn: {}", in_turn)?;
    writeln!(out, "Draw pile: {} cards", round.draw_pile().len())?;
    for (seat, name) in round.players().iter().enumerate() {
        writeln!(out, "{}: {}", name, format_hand(round.hand(seat)?))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uno_engine::game::GameSnapshot;

    fn seeded(seed: u64, players: usize) -> Config {
        Config {
            seed: Some(seed),
            players,
            ..Config::default()
        }
    }

    #[test]
    fn test_deal_command_output_format() {
        let mut out = Vec::new();
        handle_deal_command(&seeded(42, 3), false, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7 + 3, "header lines plus one per player");
        assert_eq!(lines[0], "Seed: 42");
        assert!(lines[1].starts_with("Dealer: P"));
        assert!(lines[7].starts_with("P1: [0] "));
        assert!(lines[9].starts_with("P3: [0] "));
    }

    #[test]
    fn test_deal_command_deterministic() {
        let mut out1 = Vec::new();
        let mut out2 = Vec::new();
        handle_deal_command(&seeded(12345, 4), false, &mut out1).unwrap();
        handle_deal_command(&seeded(12345, 4), false, &mut out2).unwrap();
        assert_eq!(out1, out2, "Same seed should produce identical output");
    }

    #[test]
    fn test_deal_command_without_seed() {
        let mut out = Vec::new();
        let settings = Config::default();
        assert!(handle_deal_command(&settings, false, &mut out).is_ok());
        assert!(String::from_utf8(out).unwrap().starts_with("Seed: "));
    }

    #[test]
    fn test_deal_json_is_a_game_snapshot() {
        let mut out = Vec::new();
        let settings = Config {
            cards_per_player: 5,
            ..seeded(9, 2)
        };
        handle_deal_command(&settings, true, &mut out).unwrap();

        let snapshot: GameSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(snapshot.players, vec!["P1", "P2"]);
        assert_eq!(snapshot.scores, vec![0, 0]);
        let round = snapshot.current_round.expect("fresh game has a round");
        assert!(round.hands.iter().all(|h| h.len() >= 5));
    }
}
