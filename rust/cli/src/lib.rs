//! # uno CLI Library
//!
//! Command-line host for the UNO rules engine. It deals games for inspection,
//! runs seeded simulations that write JSONL round logs, and verifies
//! snapshots and logs.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and dispatches to a subcommand, writing to the
//! given streams and returning the process exit code.
//!
//! ```
//! use std::io;
//! let args = vec!["uno", "deal", "--seed", "42", "--players", "3"];
//! let code = uno_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal a game and show the opening position (or its snapshot)
//! - `sim`: Play complete matches automatically and log every round
//! - `verify`: Validate a game snapshot, round snapshot or round log
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
mod macros;
pub mod ui;

use cli::{Commands, UnoCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_sim_command, handle_verify_command,
};
pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["deal", "sim", "verify", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns `0` on success and `2` on any error; help and version output
/// also return `0`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match UnoCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Usage: uno <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: uno --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Deal {
            seed,
            players,
            cards,
            json,
        } => settings(seed, players, None, cards)
            .and_then(|s| handle_deal_command(&s, json, out)),
        Commands::Sim {
            games,
            seed,
            players,
            target,
            output,
        } => settings(seed, players, target, None)
            .and_then(|s| handle_sim_command(games, &s, output, out, err)),
        Commands::Verify { input, kind } => handle_verify_command(input, kind, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

/// Resolved configuration with command-line flags applied last.
fn settings(
    seed: Option<u64>,
    players: Option<usize>,
    target: Option<u32>,
    cards: Option<usize>,
) -> Result<config::Config, CliError> {
    config::load()
        .and_then(|cfg| cfg.with_overrides(seed, players, target, cards))
        .map_err(|e| CliError::Config(e.to_string()))
}
