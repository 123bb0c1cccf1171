mod helpers;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use helpers::{num, round, snapshot};
use uno_engine::cards::{Card, Color};
use uno_engine::errors::{ActionError, GameError, StateError};
use uno_engine::random::identity_shuffler;
use uno_engine::round::{Direction, Round, RoundEnd, RoundOutcome};

use Color::{Blue, Green, Red, Yellow};

fn closing_round() -> Round {
    round(
        vec![
            vec![num(Red, 5)],
            vec![num(Blue, 7), Card::Wild],
            vec![Card::Skip(Green), num(Yellow, 0)],
        ],
        num(Red, 2),
        0,
    )
}

#[test]
fn emptying_a_hand_ends_the_round() {
    let mut r = closing_round();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));
    {
        let calls = Arc::clone(&calls);
        let seen = Arc::clone(&seen);
        r.on_end(move |end| {
            calls.fetch_add(1, Ordering::SeqCst);
            *seen.lock().unwrap() = Some(*end);
        });
    }

    let played = r.play(0, None).unwrap();
    let expected = RoundEnd {
        winner: 0,
        score: 7 + 50 + 20,
    };
    assert_eq!(played.outcome, RoundOutcome::Ended(expected));
    assert_eq!(r.player_in_turn(), None);
    assert!(r.has_ended());
    assert_eq!(r.winner(), Some(0));
    assert_eq!(r.score(), Some(77));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock().unwrap(), Some(expected));
}

#[test]
fn every_listener_fires_once_in_order() {
    let mut r = closing_round();
    let log = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let log = Arc::clone(&log);
        r.on_end(move |_| log.lock().unwrap().push(id));
    }
    r.play(0, None).unwrap();
    assert!(r.draw().is_err());
    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn ended_round_rejects_all_mutations() {
    let mut r = closing_round();
    r.play(0, None).unwrap();
    let ended = GameError::IllegalAction(ActionError::RoundEnded);
    assert_eq!(r.play(0, None).unwrap_err(), ended);
    assert_eq!(r.draw().unwrap_err(), ended);
    assert_eq!(r.say_uno(1).unwrap_err(), ended);
    assert_eq!(r.catch_uno_failure(1, 2).unwrap_err(), ended);
    assert!(r.legal_plays().is_empty());
}

#[test]
fn final_draw_two_counts_penalty_cards() {
    let mut r = round(
        vec![vec![Card::Draw(Red)], vec![num(Blue, 7)]],
        num(Red, 2),
        0,
    );
    // Draw pile starts with BLUE 0 and BLUE 1 in canonical order.
    let end = match r.play(0, None).unwrap().outcome {
        RoundOutcome::Ended(end) => end,
        RoundOutcome::Continues => panic!("round should have ended"),
    };
    assert_eq!(r.hand_size(1).unwrap(), 3);
    assert_eq!(end.score, 7 + 0 + 1);
}

#[test]
fn ended_round_snapshot_restores_winner_and_score() {
    let mut r = closing_round();
    r.play(0, None).unwrap();
    let snap = r.to_snapshot();
    assert_eq!(snap.player_in_turn, None);
    let restored = Round::from_snapshot(&snap, identity_shuffler()).unwrap();
    assert_eq!(restored.winner(), Some(0));
    assert_eq!(restored.score(), Some(77));
}

#[test]
fn snapshot_with_player_in_turn_and_empty_hand_is_rejected() {
    let snap = snapshot(
        vec![vec![], vec![num(Blue, 7)]],
        vec![num(Red, 2)],
        Some(1),
        Direction::Clockwise,
    );
    assert_eq!(
        Round::from_snapshot(&snap, identity_shuffler()).unwrap_err(),
        GameError::StateInvariant(StateError::EndedWithPlayerInTurn)
    );
}

#[test]
fn snapshot_without_player_in_turn_needs_one_empty_hand() {
    let snap = snapshot(
        vec![vec![num(Red, 9)], vec![num(Blue, 7)]],
        vec![num(Red, 2)],
        None,
        Direction::Clockwise,
    );
    assert_eq!(
        Round::from_snapshot(&snap, identity_shuffler()).unwrap_err(),
        GameError::StateInvariant(StateError::NoPlayerInTurn)
    );
}
