//! Verify command handler.
//!
//! Checks a file produced by `deal --json`, a host, or `sim --output`:
//!
//! - `game` / `round`: the snapshot is restored through the engine, which
//!   rejects any card-count, turn or score inconsistency.
//! - `log`: every JSONL round record is checked (id format, duplicate ids,
//!   seats in range, totals consistent with the round score). All problems
//!   are reported, not just the first.

use crate::cli::InputKind;
use crate::error::{BatchValidationError, CliError};
use crate::formatters::format_top;
use crate::io_utils::read_text;
use crate::ui;
use std::collections::HashSet;
use std::io::Write;
use uno_engine::game::{Game, GameSnapshot};
use uno_engine::logger::RoundRecord;
use uno_engine::random::identity_shuffler;
use uno_engine::round::{MAX_PLAYERS, MIN_PLAYERS, Round, RoundSnapshot};

/// The `usize` context is the 1-based line number in the log.
type VerifyError = BatchValidationError<usize>;

pub fn handle_verify_command(
    input: String,
    kind: InputKind,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text(&input) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
            return Err(CliError::Io(e));
        }
    };
    tracing::debug!(input = %input, kind = kind.as_str(), "verifying");
    match kind {
        InputKind::Game => verify_game(&content, out),
        InputKind::Round => verify_round(&content, out),
        InputKind::Log => verify_log(&content, out, err),
    }
}

fn verify_game(content: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let snapshot: GameSnapshot = serde_json::from_str(content)?;
    let game = Game::from_snapshot(&snapshot, Box::new(|_: usize| 0usize), identity_shuffler())?;
    match game.winner() {
        Some(w) => writeln!(
            out,
            "OK: finished game, {} won with {} points",
            game.player(w)?,
            game.score(w)?
        )?,
        None => writeln!(
            out,
            "OK: game in progress, {} players, scores {:?}, target {}",
            game.player_count(),
            game.scores(),
            game.target_score()
        )?,
    }
    Ok(())
}

fn verify_round(content: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let snapshot: RoundSnapshot = serde_json::from_str(content)?;
    let round = Round::from_snapshot(&snapshot, identity_shuffler())?;
    match (round.result(), round.player_in_turn()) {
        (Some(end), _) => writeln!(
            out,
            "OK: round ended, {} won {} points",
            round.player(end.winner)?,
            end.score
        )?,
        (None, Some(seat)) => writeln!(
            out,
            "OK: round in progress, {} to play on {}",
            round.player(seat)?,
            format_top(&round)
        )?,
        (None, None) => writeln!(out, "OK")?,
    }
    Ok(())
}

fn verify_log(content: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let mut errors: Vec<VerifyError> = Vec::new();
    let mut seen = HashSet::new();
    let mut rounds = 0usize;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rounds += 1;
        let line_no = idx + 1;
        let rec: RoundRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                errors.push(VerifyError {
                    item_context: line_no,
                    message: format!("Invalid record: {}", e),
                });
                continue;
            }
        };
        if !seen.insert(rec.round_id.clone()) {
            errors.push(VerifyError {
                item_context: line_no,
                message: format!("duplicate round_id {}", rec.round_id),
            });
        }
        errors.extend(check_record(&rec).into_iter().map(|message| VerifyError {
            item_context: line_no,
            message,
        }));
    }

    if rounds == 0 {
        ui::write_error(err, "no rounds found")?;
        return Err(CliError::InvalidInput("empty round log".to_string()));
    }
    if errors.is_empty() {
        writeln!(out, "OK: {} rounds verified", rounds)?;
        return Ok(());
    }
    for e in &errors {
        ui::write_error(err, &e.to_string())?;
    }
    Err(CliError::InvalidInput(format!(
        "{} problem(s) in {} rounds",
        errors.len(),
        rounds
    )))
}

fn valid_round_id(s: &str) -> bool {
    s.is_ascii()
        && s.len() == 15
        && s[0..8].chars().all(|c| c.is_ascii_digit())
        && &s[8..9] == "-"
        && s[9..].chars().all(|c| c.is_ascii_digit())
}

fn check_record(rec: &RoundRecord) -> Vec<String> {
    let mut problems = Vec::new();
    if !valid_round_id(&rec.round_id) {
        problems.push(format!("invalid round_id {}", rec.round_id));
    }
    let n = rec.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        problems.push(format!("{} players is outside {}-{}", n, MIN_PLAYERS, MAX_PLAYERS));
    }
    if rec.dealer >= n {
        problems.push(format!("dealer seat {} out of range", rec.dealer));
    }
    if rec.winner >= n {
        problems.push(format!("winner seat {} out of range", rec.winner));
    }
    if let Some(totals) = &rec.totals {
        if totals.len() != n {
            problems.push(format!("totals has {} entries for {} players", totals.len(), n));
        } else if let Some(&total) = totals.get(rec.winner)
            && total < rec.score
        {
            problems.push(format!(
                "winner total {} is below round score {}",
                total, rec.score
            ));
        }
    }
    problems
}
