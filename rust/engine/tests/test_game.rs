mod helpers;

use helpers::{names, num, snapshot};
use uno_engine::cards::{Card, Color};
use uno_engine::errors::{ActionError, GameError, StateError};
use uno_engine::game::{Game, GameConfig, GameOutcome, GameSnapshot};
use uno_engine::random::{identity_shuffler, SeededRng};
use uno_engine::round::{ActionOutcome, Direction, RoundEnd};

use Color::{Blue, Red};

/// Two-seat match where seat 0 wins the round with its next play, leaving
/// BLUE 7 (7 points) in seat 1's hand.
fn one_play_from_round_end(scores: Vec<i64>) -> GameSnapshot {
    GameSnapshot {
        players: names(2),
        target_score: 500,
        scores,
        cards_per_player: 7,
        current_round: Some(snapshot(
            vec![vec![num(Red, 5)], vec![num(Blue, 7)]],
            vec![num(Red, 3)],
            Some(0),
            Direction::Clockwise,
        )),
    }
}

fn restore(snap: &GameSnapshot) -> Result<Game, GameError> {
    Game::from_snapshot(snap, Box::new(|_: usize| 1usize), identity_shuffler())
}

fn state_err(snap: &GameSnapshot) -> StateError {
    match restore(snap) {
        Err(GameError::StateInvariant(e)) => e,
        other => panic!("expected a state error, got {:?}", other),
    }
}

#[test]
fn round_end_credits_winner_and_deals_next_round() {
    let mut game = restore(&one_play_from_round_end(vec![10, 20])).unwrap();
    let turn = game.play(0, None).unwrap();
    assert_eq!(
        turn.progress,
        GameOutcome::RoundEnded {
            round: RoundEnd {
                winner: 0,
                score: 7
            },
            next_dealer: 1,
        }
    );
    assert_eq!(game.scores(), &[17, 20]);
    let round = game.current_round().unwrap();
    assert_eq!(round.dealer(), 1);
    assert_eq!(round.hand_size(0).unwrap(), 7);
    assert_eq!(round.hand_size(1).unwrap(), 7);
    assert!(!round.has_ended());
}

#[test]
fn reaching_target_finishes_the_match() {
    let mut game = restore(&one_play_from_round_end(vec![495, 0])).unwrap();
    let turn = game.play(0, None).unwrap();
    assert_eq!(
        turn.progress,
        GameOutcome::MatchFinished {
            round: RoundEnd {
                winner: 0,
                score: 7
            },
            winner: 0,
        }
    );
    assert_eq!(game.winner(), Some(0));
    assert!(game.current_round().is_none());

    let finished = GameError::IllegalAction(ActionError::MatchFinished);
    assert_eq!(game.draw().unwrap_err(), finished);
    assert_eq!(game.play(0, None).unwrap_err(), finished);
    assert_eq!(game.say_uno(0).unwrap_err(), finished);

    // A finished match still exports and restores.
    let snap = game.to_snapshot();
    assert_eq!(snap.scores, vec![502, 0]);
    assert!(snap.current_round.is_none());
    let restored = restore(&snap).unwrap();
    assert_eq!(restored.winner(), Some(0));
}

#[test]
fn mid_round_actions_report_continuation() {
    let mut snap = one_play_from_round_end(vec![0, 0]);
    if let Some(round) = snap.current_round.as_mut() {
        let extra = num(Red, 6).to_record();
        let pos = round.draw_pile.iter().position(|c| *c == extra).unwrap();
        round.hands[0].push(round.draw_pile.remove(pos));
    }
    let mut game = restore(&snap).unwrap();
    let turn = game.play(0, None).unwrap();
    assert_eq!(turn.progress, GameOutcome::Continues);
    assert!(matches!(turn.action, ActionOutcome::Played(_)));
    assert_eq!(game.current_round().unwrap().player_in_turn(), Some(1));
}

#[test]
fn restore_rejects_inconsistent_matches() {
    let mut snap = one_play_from_round_end(vec![0, 0]);
    snap.target_score = 0;
    assert_eq!(state_err(&snap), StateError::InvalidTarget);

    let snap = one_play_from_round_end(vec![0]);
    assert_eq!(state_err(&snap), StateError::ScoreCount);

    let snap = one_play_from_round_end(vec![-5, 0]);
    assert_eq!(state_err(&snap), StateError::NegativeScore);

    let mut snap = one_play_from_round_end(vec![500, 600]);
    snap.current_round = None;
    assert_eq!(state_err(&snap), StateError::MultipleWinners);

    let snap = one_play_from_round_end(vec![500, 0]);
    assert_eq!(state_err(&snap), StateError::FinishedWithRound);

    let mut snap = one_play_from_round_end(vec![0, 0]);
    snap.current_round = None;
    assert_eq!(state_err(&snap), StateError::UnfinishedWithoutRound);

    let mut snap = one_play_from_round_end(vec![0, 0]);
    snap.players = vec!["Ann".into(), "Bo".into()];
    assert_eq!(state_err(&snap), StateError::PlayerMismatch);
}

#[test]
fn restore_rejects_an_ended_round() {
    let mut snap = one_play_from_round_end(vec![0, 0]);
    snap.current_round = Some(snapshot(
        vec![vec![], vec![num(Blue, 7), Card::Wild]],
        vec![num(Red, 5), num(Red, 3)],
        None,
        Direction::Clockwise,
    ));
    assert_eq!(state_err(&snap), StateError::EndedRoundInGame);
}

#[test]
fn new_game_rejects_bad_player_counts() {
    for n in [0, 1, 11] {
        let config = GameConfig {
            players: names(n),
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config, Box::new(SeededRng::new(1)), identity_shuffler()),
            Err(GameError::InvalidConfig(_))
        ));
    }
}

#[test]
fn dealer_is_always_a_valid_seat() {
    for seed in 0..32 {
        let config = GameConfig {
            players: names(3),
            ..GameConfig::default()
        };
        let game = Game::new(
            config,
            Box::new(SeededRng::new(seed)),
            Box::new(SeededRng::new(seed)),
        )
        .unwrap();
        assert!(game.current_round().unwrap().dealer() < 3);
    }
}

#[test]
fn snapshot_survives_json() {
    let game = Game::new(
        GameConfig::default(),
        Box::new(SeededRng::new(4)),
        Box::new(SeededRng::new(5)),
    )
    .unwrap();
    let snap = game.to_snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"targetScore\":500"));
    assert!(json.contains("\"currentRound\""));
    let parsed: GameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snap);
    let restored = restore(&parsed).unwrap();
    assert_eq!(restored.to_snapshot(), snap);
}

#[test]
fn seeded_match_plays_to_completion() {
    let config = GameConfig {
        players: names(3),
        target_score: 100,
        ..GameConfig::default()
    };
    let mut game = Game::new(
        config,
        Box::new(SeededRng::new(11)),
        Box::new(SeededRng::new(12)),
    )
    .unwrap();

    let mut rounds = 0;
    for _ in 0..200_000 {
        let Some(round) = game.current_round() else {
            break;
        };
        let seat = round.player_in_turn().unwrap();
        let color = round.current_color().or(Some(Red));
        let turn = match round.legal_plays().first() {
            Some(&index) => {
                game.say_uno(seat).unwrap();
                game.play(index, color).unwrap()
            }
            None => {
                game.draw().unwrap();
                continue;
            }
        };
        if !matches!(turn.progress, GameOutcome::Continues) {
            rounds += 1;
        }
    }

    let winner = game.winner().expect("match should finish");
    assert!(game.score(winner).unwrap() >= 100);
    assert!(rounds >= 1);
    assert_eq!(
        game.scores().iter().filter(|&&s| s >= 100).count(),
        1,
        "exactly one seat reaches the target"
    );
}
