//! One round of UNO: deal, play until a hand empties, score.
//!
//! A [`Round`] is a one-way state machine. While in progress exactly one seat
//! is in turn; the play that empties a hand ends the round, freezes winner and
//! score, and notifies every end listener exactly once. Every mutation checks
//! all of its preconditions before changing anything, so a failed call leaves
//! the round untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::cards::{full_deck, Card, CardRecord, Color};
use crate::deck::{Deck, DECK_SIZE};
use crate::errors::{ActionError, GameError, StateError};
use crate::random::BoxedShuffler;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const DEFAULT_CARDS_PER_PLAYER: usize = 7;
/// Cards drawn by a player caught not saying uno.
pub const UNO_PENALTY: usize = 2;
/// Cards kept out of the deal: the start card and a small draw pile.
const UNDEALT_RESERVE: usize = 9;
/// Most cards that can go into hands in one deal, across all seats.
pub const MAX_DEALT_CARDS: usize = DECK_SIZE - UNDEALT_RESERVE;

/// Direction of play around the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

impl Direction {
    fn sign(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::Counterclockwise => -1,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
        }
    }
}

/// Parameters for dealing a new round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub players: Vec<String>,
    pub dealer: usize,
    pub cards_per_player: usize,
}

impl RoundConfig {
    pub fn new(players: Vec<String>, dealer: usize) -> Self {
        Self {
            players,
            dealer,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), GameError> {
        let n = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(GameError::InvalidConfig(format!(
                "player count must be between {} and {}, got {}",
                MIN_PLAYERS, MAX_PLAYERS, n
            )));
        }
        if self.dealer >= n {
            return Err(ActionError::SeatOutOfBounds {
                seat: self.dealer,
                player_count: n,
            }
            .into());
        }
        if self.cards_per_player == 0 || n * self.cards_per_player > MAX_DEALT_CARDS {
            return Err(GameError::InvalidConfig(format!(
                "cannot deal {} cards to {} players",
                self.cards_per_player, n
            )));
        }
        Ok(())
    }
}

/// Final result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEnd {
    pub winner: usize,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continues,
    Ended(RoundEnd),
}

/// Result of a successful play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayResult {
    pub card: Card,
    pub outcome: RoundOutcome,
}

/// A move submitted by a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Play {
        index: usize,
        color: Option<Color>,
    },
    Draw,
    SayUno,
    CatchUno {
        accused: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Played(PlayResult),
    /// `None` when neither pile had a card left.
    Drew(Option<Card>),
    SaidUno,
    Caught(bool),
}

/// Callback run once when the round ends.
pub type EndListener = Box<dyn FnMut(&RoundEnd) + Send>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct UnoFlags {
    declared: bool,
    exposed: bool,
}

/// Plain-data export of a round.
///
/// Uno declarations are session state and are not included; a restored round
/// starts with every seat unexposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    pub players: Vec<String>,
    pub hands: Vec<Vec<CardRecord>>,
    pub draw_pile: Vec<CardRecord>,
    /// Most recent first.
    pub discard_pile: Vec<CardRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_color: Option<Color>,
    pub current_direction: Direction,
    pub dealer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_in_turn: Option<usize>,
}

pub struct Round {
    players: Vec<String>,
    hands: Vec<Vec<Card>>,
    draw_pile: Deck,
    discard_pile: Deck,
    /// `None` after a wild start card until someone plays a colored card or
    /// names a color.
    current_color: Option<Color>,
    direction: Direction,
    player_in_turn: Option<usize>,
    dealer: usize,
    uno: Vec<UnoFlags>,
    result: Option<RoundEnd>,
    shuffler: BoxedShuffler,
    listeners: Vec<EndListener>,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("players", &self.players)
            .field("hands", &self.hands)
            .field("draw_pile", &self.draw_pile.len())
            .field("discard_top", &self.discard_pile.peek())
            .field("current_color", &self.current_color)
            .field("direction", &self.direction)
            .field("player_in_turn", &self.player_in_turn)
            .field("dealer", &self.dealer)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl Round {
    /// Shuffle a fresh deck, deal, and flip the start card.
    ///
    /// Cards are dealt one at a time starting at seat 0. The start card takes
    /// effect as if the dealer had played it. A wild start card leaves no
    /// color in play, so the first player may play any card.
    pub fn new(config: RoundConfig, mut shuffler: BoxedShuffler) -> Result<Self, GameError> {
        config.validate()?;
        let RoundConfig {
            players,
            dealer,
            cards_per_player,
        } = config;
        let n = players.len();

        let mut deck = Deck::standard();
        deck.shuffle(shuffler.as_mut());

        let mut hands = vec![Vec::with_capacity(cards_per_player); n];
        for _ in 0..cards_per_player {
            for hand in hands.iter_mut() {
                let card = deck
                    .deal()
                    .ok_or_else(|| GameError::InvalidConfig("deck exhausted while dealing".into()))?;
                hand.push(card);
            }
        }

        let top = deck
            .deal()
            .ok_or_else(|| GameError::InvalidConfig("no card left to start the discard pile".into()))?;

        let mut round = Self {
            players,
            hands,
            draw_pile: deck,
            discard_pile: Deck::from_cards([top]),
            current_color: top.color(),
            direction: Direction::Clockwise,
            player_in_turn: None,
            dealer,
            uno: vec![UnoFlags::default(); n],
            result: None,
            shuffler,
            listeners: Vec::new(),
        };
        let first = round.resolve_effect(dealer, top);
        round.player_in_turn = Some(first);

        tracing::debug!(
            players = n,
            dealer,
            start_card = %top,
            first_player = first,
            "round dealt"
        );
        Ok(round)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Result<&str, GameError> {
        self.check_seat(seat)?;
        Ok(&self.players[seat])
    }

    pub fn hand(&self, seat: usize) -> Result<&[Card], GameError> {
        self.check_seat(seat)?;
        Ok(&self.hands[seat])
    }

    pub fn hand_size(&self, seat: usize) -> Result<usize, GameError> {
        self.hand(seat).map(<[Card]>::len)
    }

    pub fn draw_pile(&self) -> &Deck {
        &self.draw_pile
    }

    /// Discard pile, most recent card first.
    pub fn discard_pile(&self) -> &Deck {
        &self.discard_pile
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard_pile.peek().copied()
    }

    /// Color in play; `None` while a wild start card has not been answered.
    pub fn current_color(&self) -> Option<Color> {
        self.current_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Seat expected to act, or `None` once the round has ended.
    pub fn player_in_turn(&self) -> Option<usize> {
        self.player_in_turn
    }

    pub fn has_ended(&self) -> bool {
        self.result.is_some()
    }

    pub fn winner(&self) -> Option<usize> {
        self.result.map(|r| r.winner)
    }

    pub fn score(&self) -> Option<u32> {
        self.result.map(|r| r.score)
    }

    pub fn result(&self) -> Option<RoundEnd> {
        self.result
    }

    /// Whether `seat` holds one card without having said uno.
    pub fn is_exposed(&self, seat: usize) -> bool {
        self.uno.get(seat).is_some_and(|f| f.exposed)
    }

    /// Whether the seat in turn may play the card at `index`.
    pub fn can_play(&self, index: usize) -> bool {
        let (Some(seat), Some(top)) = (self.player_in_turn, self.discard_top()) else {
            return false;
        };
        self.hands[seat]
            .get(index)
            .is_some_and(|card| card.can_play_on(&top, self.current_color))
    }

    pub fn can_play_any(&self) -> bool {
        !self.legal_plays().is_empty()
    }

    /// Hand indices the seat in turn may legally play.
    pub fn legal_plays(&self) -> Vec<usize> {
        match self.player_in_turn {
            Some(seat) => (0..self.hands[seat].len())
                .filter(|&i| self.can_play(i))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Register a callback for round end. Listeners run synchronously inside
    /// the play that ends the round, in registration order.
    pub fn on_end<F>(&mut self, listener: F)
    where
        F: FnMut(&RoundEnd) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Play the card at `index` from the hand of the seat in turn.
    ///
    /// `color` is required for wild cards and ignored otherwise.
    pub fn play(&mut self, index: usize, color: Option<Color>) -> Result<PlayResult, GameError> {
        let seat = self.player_in_turn.ok_or(ActionError::RoundEnded)?;
        let hand = &self.hands[seat];
        let card = *hand.get(index).ok_or(ActionError::CardIndexOutOfBounds {
            index,
            hand_size: hand.len(),
        })?;
        let top = self.discard_top().ok_or(StateError::EmptyDiscardPile)?;
        match self.current_color {
            Some(color) if !card.can_play_on(&top, Some(color)) => {
                return Err(ActionError::IllegalCard { card, top, color }.into());
            }
            _ => {}
        }
        let next_color = match card.color() {
            Some(c) => c,
            None => color.ok_or(ActionError::MissingWildColor)?,
        };

        self.hands[seat].remove(index);
        self.discard_pile.push_front(card);
        self.current_color = Some(next_color);
        let remaining = self.hands[seat].len();
        let flags = &mut self.uno[seat];
        flags.exposed = remaining == 1 && !flags.declared;
        flags.declared = false;

        let next = self.resolve_effect(seat, card);
        tracing::debug!(seat, card = %card, color = %next_color, next, "card played");

        if remaining > 0 {
            self.player_in_turn = Some(next);
            return Ok(PlayResult {
                card,
                outcome: RoundOutcome::Continues,
            });
        }

        let end = self.finish(seat);
        Ok(PlayResult {
            card,
            outcome: RoundOutcome::Ended(end),
        })
    }

    /// Draw one card for the seat in turn and pass the turn on.
    ///
    /// An empty draw pile is refilled from the discard pile (all but its top
    /// card) and reshuffled first.
    pub fn draw(&mut self) -> Result<Option<Card>, GameError> {
        let seat = self.player_in_turn.ok_or(ActionError::RoundEnded)?;
        let card = self.take_card();
        if let Some(card) = card {
            self.hands[seat].push(card);
        }
        self.uno[seat] = UnoFlags::default();
        let next = self.step(seat, 1);
        self.player_in_turn = Some(next);
        tracing::debug!(seat, drew = card.is_some(), next, "card drawn");
        Ok(card)
    }

    pub fn say_uno(&mut self, seat: usize) -> Result<(), GameError> {
        self.check_active()?;
        self.check_seat(seat)?;
        self.uno[seat] = UnoFlags {
            declared: true,
            exposed: false,
        };
        tracing::debug!(seat, "uno declared");
        Ok(())
    }

    /// Accuse `accused` of holding one card without having said uno.
    ///
    /// Returns `Ok(true)` and applies the penalty when the accusation holds,
    /// `Ok(false)` with no effect otherwise.
    pub fn catch_uno_failure(&mut self, accuser: usize, accused: usize) -> Result<bool, GameError> {
        self.check_active()?;
        self.check_seat(accuser)?;
        self.check_seat(accused)?;
        if accuser == accused || self.hands[accused].len() != 1 || !self.uno[accused].exposed {
            return Ok(false);
        }
        self.draw_into(accused, UNO_PENALTY);
        self.uno[accused].exposed = false;
        tracing::debug!(accuser, accused, "uno failure caught");
        Ok(true)
    }

    /// Apply an action on behalf of `seat`, checking that it is that seat's
    /// turn for plays and draws.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<ActionOutcome, GameError> {
        self.check_seat(seat)?;
        match action {
            Action::Play { index, color } => {
                self.check_turn(seat)?;
                self.play(index, color).map(ActionOutcome::Played)
            }
            Action::Draw => {
                self.check_turn(seat)?;
                self.draw().map(ActionOutcome::Drew)
            }
            Action::SayUno => self.say_uno(seat).map(|_| ActionOutcome::SaidUno),
            Action::CatchUno { accused } => self
                .catch_uno_failure(seat, accused)
                .map(ActionOutcome::Caught),
        }
    }

    pub fn to_snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            players: self.players.clone(),
            hands: self
                .hands
                .iter()
                .map(|h| h.iter().map(Card::to_record).collect())
                .collect(),
            draw_pile: self.draw_pile.to_snapshot(),
            discard_pile: self.discard_pile.to_snapshot(),
            current_color: self.current_color,
            current_direction: self.direction,
            dealer: self.dealer,
            player_in_turn: self.player_in_turn,
        }
    }

    /// Rebuild a round from a snapshot, validating every field before
    /// producing a live value.
    pub fn from_snapshot(snapshot: &RoundSnapshot, shuffler: BoxedShuffler) -> Result<Self, GameError> {
        let n = snapshot.players.len();
        if n < MIN_PLAYERS {
            return Err(StateError::TooFewPlayers(n).into());
        }
        if snapshot.hands.len() != n {
            return Err(StateError::HandCount {
                hands: snapshot.hands.len(),
                players: n,
            }
            .into());
        }
        let hands = snapshot
            .hands
            .iter()
            .map(|h| Deck::from_snapshot(h).map(|d| d.cards()))
            .collect::<Result<Vec<_>, _>>()?;
        let draw_pile = Deck::from_snapshot(&snapshot.draw_pile)?;
        let discard_pile = Deck::from_snapshot(&snapshot.discard_pile)?;
        let top = discard_pile
            .peek()
            .copied()
            .ok_or(StateError::EmptyDiscardPile)?;

        check_composition(
            hands
                .iter()
                .flatten()
                .chain(draw_pile.iter())
                .chain(discard_pile.iter()),
        )?;

        for seat in std::iter::once(snapshot.dealer).chain(snapshot.player_in_turn) {
            if seat >= n {
                return Err(StateError::SeatOutOfBounds {
                    seat,
                    player_count: n,
                }
                .into());
            }
        }

        let empty: Vec<usize> = (0..n).filter(|&s| hands[s].is_empty()).collect();
        let winner = match (snapshot.player_in_turn, empty.as_slice()) {
            (Some(_), []) => None,
            (Some(_), _) => return Err(StateError::EndedWithPlayerInTurn.into()),
            (None, [seat]) => Some(*seat),
            (None, _) => return Err(StateError::NoPlayerInTurn.into()),
        };

        let current_color = snapshot.current_color.or_else(|| top.color());

        let result = winner.map(|winner| RoundEnd {
            winner,
            score: score_hands(&hands),
        });

        Ok(Self {
            players: snapshot.players.clone(),
            hands,
            draw_pile,
            discard_pile,
            current_color,
            direction: snapshot.current_direction,
            player_in_turn: snapshot.player_in_turn,
            dealer: snapshot.dealer,
            uno: vec![UnoFlags::default(); n],
            result,
            shuffler,
            listeners: Vec::new(),
        })
    }

    /// Hand the shuffler back, e.g. to deal the next round.
    pub fn into_shuffler(self) -> BoxedShuffler {
        self.shuffler
    }

    fn check_seat(&self, seat: usize) -> Result<(), ActionError> {
        if seat < self.players.len() {
            Ok(())
        } else {
            Err(ActionError::SeatOutOfBounds {
                seat,
                player_count: self.players.len(),
            })
        }
    }

    fn check_active(&self) -> Result<(), ActionError> {
        if self.has_ended() {
            Err(ActionError::RoundEnded)
        } else {
            Ok(())
        }
    }

    fn check_turn(&self, seat: usize) -> Result<(), ActionError> {
        let expected = self.player_in_turn.ok_or(ActionError::RoundEnded)?;
        if seat == expected {
            Ok(())
        } else {
            Err(ActionError::NotPlayersTurn {
                expected,
                actual: seat,
            })
        }
    }

    /// Seat `steps` places away from `seat` in the current direction.
    fn step(&self, seat: usize, steps: usize) -> usize {
        let n = self.players.len() as isize;
        let offset = steps as isize * self.direction.sign();
        (seat as isize + offset).rem_euclid(n) as usize
    }

    /// Apply the effect of `card` played by `actor` and return the next seat.
    fn resolve_effect(&mut self, actor: usize, card: Card) -> usize {
        match card {
            Card::Numbered { .. } | Card::Wild => self.step(actor, 1),
            Card::Skip(_) => self.step(actor, 2),
            // Two players: reversing would hand the actor a second turn, so skip instead.
            Card::Reverse(_) if self.players.len() == 2 => self.step(actor, 2),
            Card::Reverse(_) => {
                self.direction = self.direction.reversed();
                self.step(actor, 1)
            }
            Card::Draw(_) => {
                let victim = self.step(actor, 1);
                self.draw_into(victim, 2);
                self.step(actor, 2)
            }
            Card::WildDraw => {
                let victim = self.step(actor, 1);
                self.draw_into(victim, 4);
                self.step(actor, 2)
            }
        }
    }

    fn draw_into(&mut self, seat: usize, count: usize) {
        for _ in 0..count {
            match self.take_card() {
                Some(card) => self.hands[seat].push(card),
                None => break,
            }
        }
        self.uno[seat].exposed = false;
    }

    fn take_card(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() {
            self.recycle_discards();
        }
        self.draw_pile.deal()
    }

    fn recycle_discards(&mut self) {
        let Some(top) = self.discard_top() else {
            return;
        };
        let mut is_top = true;
        let mut recycled = self
            .discard_pile
            .filter(|_| !std::mem::replace(&mut is_top, false));
        if recycled.is_empty() {
            return;
        }
        recycled.shuffle(self.shuffler.as_mut());
        tracing::debug!(cards = recycled.len(), "discard pile recycled into draw pile");
        self.draw_pile = recycled;
        self.discard_pile = Deck::from_cards([top]);
    }

    fn finish(&mut self, winner: usize) -> RoundEnd {
        let end = RoundEnd {
            winner,
            score: score_hands(&self.hands),
        };
        self.result = Some(end);
        self.player_in_turn = None;
        tracing::info!(winner, score = end.score, "round ended");
        for mut listener in std::mem::take(&mut self.listeners) {
            listener(&end);
        }
        end
    }
}

/// Sum of point values of every card still held.
pub fn score_hands(hands: &[Vec<Card>]) -> u32 {
    hands.iter().flatten().map(Card::points).sum()
}

fn check_composition<'a>(cards: impl Iterator<Item = &'a Card>) -> Result<(), StateError> {
    let mut counts: HashMap<Card, isize> = HashMap::new();
    let mut total = 0;
    for card in cards {
        *counts.entry(*card).or_default() += 1;
        total += 1;
    }
    if total != DECK_SIZE {
        return Err(StateError::CardCount {
            expected: DECK_SIZE,
            actual: total,
        });
    }
    for card in full_deck() {
        *counts.entry(card).or_default() -= 1;
    }
    match counts.into_iter().find(|(_, c)| *c != 0) {
        Some((card, _)) => Err(StateError::CardComposition(card)),
        None => Ok(()),
    }
}
