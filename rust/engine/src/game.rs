//! A match: rounds are played until one player's cumulative score reaches
//! the target.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{Card, Color};
use crate::errors::{ActionError, GameError, StateError};
use crate::random::{BoxedRandomizer, BoxedShuffler};
use crate::round::{
    Action, ActionOutcome, Round, RoundConfig, RoundEnd, RoundOutcome, RoundSnapshot,
    DEFAULT_CARDS_PER_PLAYER, MAX_PLAYERS, MIN_PLAYERS,
};

pub const DEFAULT_TARGET_SCORE: u32 = 500;

/// Parameters for a new match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub players: Vec<String>,
    pub target_score: u32,
    pub cards_per_player: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec!["A".to_string(), "B".to_string()],
            target_score: DEFAULT_TARGET_SCORE,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
        }
    }
}

/// Plain-data export of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub players: Vec<String>,
    pub target_score: i64,
    pub scores: Vec<i64>,
    #[serde(default = "default_cards_per_player")]
    pub cards_per_player: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<RoundSnapshot>,
}

fn default_cards_per_player() -> usize {
    DEFAULT_CARDS_PER_PLAYER
}

/// What a mutation did to the match as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The current round goes on.
    Continues,
    /// A round ended and the next one was dealt by `next_dealer`.
    RoundEnded { round: RoundEnd, next_dealer: usize },
    /// A round ended and its winner's total reached the target.
    MatchFinished { round: RoundEnd, winner: usize },
}

/// Result of a game-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub action: ActionOutcome,
    pub progress: GameOutcome,
}

pub struct Game {
    players: Vec<String>,
    scores: Vec<u32>,
    target_score: u32,
    cards_per_player: usize,
    randomizer: BoxedRandomizer,
    round: Option<Round>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("scores", &self.scores)
            .field("target_score", &self.target_score)
            .field("cards_per_player", &self.cards_per_player)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Start a match and deal its first round with a dealer drawn from
    /// `randomizer`.
    pub fn new(
        config: GameConfig,
        randomizer: BoxedRandomizer,
        shuffler: BoxedShuffler,
    ) -> Result<Self, GameError> {
        let n = config.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(GameError::InvalidConfig(format!(
                "player count must be between {} and {}, got {}",
                MIN_PLAYERS, MAX_PLAYERS, n
            )));
        }
        if config.target_score == 0 {
            return Err(GameError::InvalidConfig(
                "target score must be greater than 0".into(),
            ));
        }
        let mut game = Self {
            scores: vec![0; n],
            players: config.players,
            target_score: config.target_score,
            cards_per_player: config.cards_per_player,
            randomizer,
            round: None,
        };
        game.start_round(shuffler)?;
        tracing::info!(players = n, target = game.target_score, "match started");
        Ok(game)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&str, GameError> {
        self.check_index(index)?;
        Ok(&self.players[index])
    }

    pub fn score(&self, index: usize) -> Result<u32, GameError> {
        self.check_index(index)?;
        Ok(self.scores[index])
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn cards_per_player(&self) -> usize {
        self.cards_per_player
    }

    /// First seat, in seat order, whose total has reached the target.
    pub fn winner(&self) -> Option<usize> {
        self.scores.iter().position(|&s| s >= self.target_score)
    }

    /// The round being played; `None` once the match is decided.
    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn play(&mut self, index: usize, color: Option<Color>) -> Result<Turn, GameError> {
        let result = self.round_mut()?.play(index, color)?;
        let progress = self.settle(result.outcome)?;
        Ok(Turn {
            action: ActionOutcome::Played(result),
            progress,
        })
    }

    pub fn draw(&mut self) -> Result<Option<Card>, GameError> {
        self.round_mut()?.draw()
    }

    pub fn say_uno(&mut self, seat: usize) -> Result<(), GameError> {
        self.round_mut()?.say_uno(seat)
    }

    pub fn catch_uno_failure(&mut self, accuser: usize, accused: usize) -> Result<bool, GameError> {
        self.round_mut()?.catch_uno_failure(accuser, accused)
    }

    /// Apply an action on behalf of `seat` to the current round and settle
    /// the match if the round ended.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<Turn, GameError> {
        let outcome = self.round_mut()?.apply(seat, action)?;
        let progress = match outcome {
            ActionOutcome::Played(result) => self.settle(result.outcome)?,
            _ => GameOutcome::Continues,
        };
        Ok(Turn {
            action: outcome,
            progress,
        })
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self.players.clone(),
            target_score: i64::from(self.target_score),
            scores: self.scores.iter().map(|&s| i64::from(s)).collect(),
            cards_per_player: self.cards_per_player,
            current_round: self.round.as_ref().map(Round::to_snapshot),
        }
    }

    /// Rebuild a match from a snapshot. Inconsistent snapshots are rejected,
    /// never repaired.
    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        randomizer: BoxedRandomizer,
        shuffler: BoxedShuffler,
    ) -> Result<Self, GameError> {
        let target_score = u32::try_from(snapshot.target_score)
            .ok()
            .filter(|&t| t > 0)
            .ok_or(StateError::InvalidTarget)?;
        let n = snapshot.players.len();
        if n < MIN_PLAYERS {
            return Err(StateError::TooFewPlayers(n).into());
        }
        if snapshot.scores.len() != n {
            return Err(StateError::ScoreCount.into());
        }
        let scores = snapshot
            .scores
            .iter()
            .map(|&s| {
                if s < 0 {
                    Err(StateError::NegativeScore)
                } else {
                    u32::try_from(s).map_err(|_| StateError::ScoreOutOfRange(s))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let winners = scores.iter().filter(|&&s| s >= target_score).count();
        if winners > 1 {
            return Err(StateError::MultipleWinners.into());
        }
        // Later rounds are dealt with these settings, so reject them now.
        RoundConfig {
            players: snapshot.players.clone(),
            dealer: 0,
            cards_per_player: snapshot.cards_per_player,
        }
        .validate()?;

        let round = match (winners == 1, &snapshot.current_round) {
            (true, Some(_)) => return Err(StateError::FinishedWithRound.into()),
            (true, None) => None,
            (false, None) => return Err(StateError::UnfinishedWithoutRound.into()),
            (false, Some(rs)) => {
                if rs.players != snapshot.players {
                    return Err(StateError::PlayerMismatch.into());
                }
                let round = Round::from_snapshot(rs, shuffler)?;
                if round.has_ended() {
                    return Err(StateError::EndedRoundInGame.into());
                }
                Some(round)
            }
        };

        Ok(Self {
            players: snapshot.players.clone(),
            scores,
            target_score,
            cards_per_player: snapshot.cards_per_player,
            randomizer,
            round,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), ActionError> {
        if index < self.players.len() {
            Ok(())
        } else {
            Err(ActionError::SeatOutOfBounds {
                seat: index,
                player_count: self.players.len(),
            })
        }
    }

    fn round_mut(&mut self) -> Result<&mut Round, ActionError> {
        self.round.as_mut().ok_or(ActionError::MatchFinished)
    }

    /// Deal a new round with a randomly chosen dealer; returns the dealer.
    fn start_round(&mut self, shuffler: BoxedShuffler) -> Result<usize, GameError> {
        let n = self.players.len();
        let dealer = self.randomizer.bound(n) % n;
        let config = RoundConfig {
            players: self.players.clone(),
            dealer,
            cards_per_player: self.cards_per_player,
        };
        self.round = Some(Round::new(config, shuffler)?);
        Ok(dealer)
    }

    /// Credit a finished round and either deal the next one or close the match.
    fn settle(&mut self, outcome: RoundOutcome) -> Result<GameOutcome, GameError> {
        let RoundOutcome::Ended(end) = outcome else {
            return Ok(GameOutcome::Continues);
        };
        self.scores[end.winner] = self.scores[end.winner].saturating_add(end.score);
        let shuffler = match self.round.take() {
            Some(round) => round.into_shuffler(),
            None => return Err(ActionError::MatchFinished.into()),
        };

        match self.winner() {
            Some(winner) => {
                tracing::info!(winner, scores = ?self.scores, "match finished");
                Ok(GameOutcome::MatchFinished { round: end, winner })
            }
            None => {
                let next_dealer = self.start_round(shuffler)?;
                tracing::debug!(scores = ?self.scores, next_dealer, "next round dealt");
                Ok(GameOutcome::RoundEnded {
                    round: end,
                    next_dealer,
                })
            }
        }
    }
}
