//! Command-line surface of the `uno` binary.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "uno",
    version,
    about = "UNO rules engine: deal, simulate and verify games"
)]
pub struct UnoCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal a new game and show the opening position
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        players: Option<usize>,
        /// Cards dealt to each player
        #[arg(long)]
        cards: Option<usize>,
        /// Print the game snapshot as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Play complete matches with an automatic player in every seat
    Sim {
        #[arg(long, default_value_t = 1)]
        games: u64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        target: Option<u32>,
        /// Write one JSONL record per finished round to this file
        #[arg(long)]
        output: Option<String>,
    },
    /// Check a snapshot or round log for consistency
    Verify {
        #[arg(long)]
        input: String,
        #[arg(long, value_enum, default_value_t = InputKind::Game)]
        kind: InputKind,
    },
    /// Show resolved configuration and where each value came from
    Cfg,
}

/// What a file passed to `verify` contains.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// Game snapshot JSON
    Game,
    /// Round snapshot JSON
    Round,
    /// JSONL round log written by `sim --output`
    Log,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Game => "game",
            InputKind::Round => "round",
            InputKind::Log => "log",
        }
    }
}
