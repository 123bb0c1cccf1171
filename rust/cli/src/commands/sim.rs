//! Simulation command handler.
//!
//! Plays complete matches with the same simple player in every seat: play the
//! first legal card (wilds name the colour the rest of the hand holds most
//! of), draw when nothing is playable, and always say uno before going down
//! to one card. Match `i` is seeded with `seed + i`, so a run is
//! reproducible from its base seed. Every finished round can be written to a
//! JSONL round log.

use super::new_game;
use crate::config::Config;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use uno_engine::cards::{Card, Color, all_colors};
use uno_engine::game::{Game, GameOutcome};
use uno_engine::logger::{RoundLogger, RoundRecord};

/// Plays and draws allowed per match before it is abandoned.
const MAX_ACTIONS_PER_GAME: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchSummary {
    winner: Option<usize>,
    rounds: u32,
}

pub fn handle_sim_command(
    games: u64,
    settings: &Config,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }

    let mut logger = match output.as_deref() {
        Some(p) => {
            let path = PathBuf::from(p);
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            RoundLogger::create(&path)?
        }
        None => RoundLogger::detached(&Utc::now().format("%Y%m%d").to_string()),
    };

    let base_seed = settings.seed.unwrap_or_else(rand::random);
    let mut wins = vec![0u64; settings.players];
    for i in 0..games {
        let seed = base_seed.wrapping_add(i);
        let mut game = new_game(settings, seed)?;
        let summary = play_match(&mut game, seed, &mut logger)?;
        match summary.winner {
            Some(w) => {
                wins[w] += 1;
                writeln!(
                    out,
                    "Game {}: {} wins after {} rounds, scores {:?}",
                    i + 1,
                    game.player(w)?,
                    summary.rounds,
                    game.scores()
                )?;
            }
            None => ui::display_warning(
                err,
                &format!(
                    "game {} abandoned after {} actions without a winner",
                    i + 1,
                    MAX_ACTIONS_PER_GAME
                ),
            )?,
        }
    }

    writeln!(out, "Simulated {} games (seed {})", games, base_seed)?;
    for (seat, count) in wins.iter().enumerate() {
        writeln!(out, "P{}: {} wins", seat + 1, count)?;
    }
    if let Some(p) = output {
        writeln!(out, "Round log: {}", p)?;
    }
    Ok(())
}

/// Drive `game` to its end, logging every finished round.
fn play_match(
    game: &mut Game,
    seed: u64,
    logger: &mut RoundLogger,
) -> Result<MatchSummary, CliError> {
    let mut rounds = 0;
    let mut turns = 0u32;
    let mut dealer = game.current_round().map_or(0, |r| r.dealer());

    for _ in 0..MAX_ACTIONS_PER_GAME {
        let Some(round) = game.current_round() else {
            break;
        };
        let Some(seat) = round.player_in_turn() else {
            break;
        };
        let Some(index) = round.legal_plays().first().copied() else {
            game.draw()?;
            turns += 1;
            continue;
        };
        let hand = round.hand(seat)?;
        let card = hand[index];
        let color = choose_color(hand, index, round.current_color().unwrap_or(Color::Red));
        let declare = hand.len() == 2;

        if declare {
            game.say_uno(seat)?;
        }
        let turn = game.play(index, Some(color))?;
        turns += 1;

        let (end, next_dealer) = match turn.progress {
            GameOutcome::Continues => continue,
            GameOutcome::RoundEnded { round, next_dealer } => (round, Some(next_dealer)),
            GameOutcome::MatchFinished { round, .. } => (round, None),
        };
        rounds += 1;
        let round_id = logger.next_id();
        logger.write(&RoundRecord {
            round_id,
            seed: Some(seed),
            players: game.players().to_vec(),
            dealer,
            winner: end.winner,
            score: end.score,
            turns,
            final_color: Some(card.color().unwrap_or(color)),
            totals: Some(game.scores().to_vec()),
            ts: None,
        })?;
        tracing::debug!(
            seed,
            round = rounds,
            winner = end.winner,
            score = end.score,
            "round logged"
        );

        match next_dealer {
            Some(d) => {
                dealer = d;
                turns = 0;
            }
            None => break,
        }
    }

    Ok(MatchSummary {
        winner: game.winner(),
        rounds,
    })
}

/// Colour most common among the cards kept after playing `played`.
fn choose_color(hand: &[Card], played: usize, fallback: Color) -> Color {
    let mut best = None;
    let mut best_count = 0;
    for color in all_colors() {
        let count = hand
            .iter()
            .enumerate()
            .filter(|&(i, c)| i != played && c.color() == Some(color))
            .count();
        if count > best_count {
            best = Some(color);
            best_count = count;
        }
    }
    best.unwrap_or(fallback)
}
