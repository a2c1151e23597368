//! Turn driver: owns a [`Game`] and the players seated at it.

use super::error::{GameError, RuleViolation};
use super::event::{MoveEvent, MoveObserver};
use super::state::{Game, Outcome};
use super::view::PrivateView;
use crate::model::moves::Move;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use tracing::{Level, event};

/// A participant that chooses moves from its own perspective.
///
/// Players learn about the game only through [`MoveEvent`]s and the
/// [`PrivateView`]s handed to them; they never see the raw [`Game`].
pub trait Player {
    fn seat(&self) -> usize;

    /// Called once when the player takes its seat.
    fn init(&mut self, _view: &PrivateView<&Game>) {}

    /// Called after every live move, with the game in its post-move state.
    fn observe(&mut self, event: &MoveEvent, view: &PrivateView<&Game>);

    /// Picks the next move. The view may be used to rearrange the player's
    /// own hand before answering.
    fn take_turn(&mut self, view: &mut PrivateView<&mut Game>) -> Result<Move, GameError>;
}

/// Forwards an engine event to `player` through a view of its own seat.
pub fn notify_player<P: Player + ?Sized>(player: &mut P, event: &MoveEvent, game: &Game) {
    let view = PrivateView::new(player.seat(), game);
    player.observe(event, &view);
}

struct Seats<'a>(&'a mut [Option<Box<dyn Player>>]);

impl MoveObserver for Seats<'_> {
    fn observe_move(&mut self, event: &MoveEvent, game: &Game) {
        for player in self.0.iter_mut().flatten() {
            notify_player(player.as_mut(), event, game);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub player: usize,
    #[serde(rename = "move")]
    pub mv: Move,
    pub event: MoveEvent,
}

impl TurnRecord {
    /// Short human-readable outcome, e.g. `R1 -> OK` for a play.
    pub fn detail(&self) -> String {
        match &self.event {
            MoveEvent::Play { face, success, .. } => {
                if *success {
                    format!("{face} -> OK")
                } else {
                    format!("{face} -> FUSE")
                }
            }
            MoveEvent::Discard { face, .. } => face.to_string(),
            MoveEvent::TellColor { matches, .. } | MoveEvent::TellNumber { matches, .. } => {
                format!("{} card(s)", matches.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub turns: usize,
    pub score: u32,
    pub outcome: Option<Outcome>,
    pub lives: u8,
    pub tokens: u8,
    pub stacks: [u8; 5],
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, w, y] = self.stacks;
        let status = match self.outcome {
            Some(outcome) => outcome.label(),
            None => "In progress",
        };
        write!(
            f,
            "{status}: score {} after {} turns | R{r} G{g} B{b} W{w} Y{y} | lives {} tokens {}",
            self.score, self.turns, self.lives, self.tokens
        )
    }
}

pub struct Table {
    game: Game,
    seats: Vec<Option<Box<dyn Player>>>,
    turns: usize,
}

impl Table {
    pub fn new(game: Game) -> Self {
        let seats = (0..game.num_players()).map(|_| None).collect();
        Self {
            game,
            seats,
            turns: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.game.outcome()
    }

    /// Seats `player` at the position it reports and lets it look at the
    /// starting deal.
    pub fn register(&mut self, mut player: Box<dyn Player>) -> Result<(), GameError> {
        let seat = player.seat();
        let players = self.seats.len();
        let slot = self
            .seats
            .get_mut(seat)
            .ok_or(RuleViolation::NoSuchPlayer {
                player: seat,
                players,
            })?;
        if slot.is_some() {
            return Err(GameError::SeatTaken { seat });
        }

        player.init(&PrivateView::new(seat, &self.game));
        *slot = Some(player);
        Ok(())
    }

    /// Parses and applies a move on behalf of the current player.
    pub fn submit(&mut self, text: &str) -> Result<TurnRecord, GameError> {
        let mv: Move = text.parse()?;
        self.apply(mv)
    }

    /// Asks the current player for a move and applies it.
    pub fn play_turn(&mut self) -> Result<TurnRecord, GameError> {
        if self.game.is_over() {
            return Err(RuleViolation::GameOver.into());
        }
        let seat = self.game.current_player();
        let player = self
            .seats
            .get_mut(seat)
            .and_then(Option::as_mut)
            .ok_or(GameError::MissingPlayer { seat })?;

        let mut view = PrivateView::new(seat, &mut self.game);
        let mv = player.take_turn(&mut view)?;
        self.apply(mv)
    }

    /// Plays until the game ends or `max_turns` turns have been taken in
    /// total. Moves in `imposed` are consumed first, in order, regardless of
    /// whose turn it is.
    pub fn run(
        &mut self,
        max_turns: Option<usize>,
        mut imposed: VecDeque<Move>,
    ) -> Result<GameSummary, GameError> {
        while !self.game.is_over() {
            if max_turns.is_some_and(|limit| self.turns >= limit) {
                event!(
                    target: "hanabi_core::table",
                    Level::INFO,
                    turn = self.turns,
                    "stopping early"
                );
                break;
            }

            match imposed.pop_front() {
                Some(mv) => self.apply(mv)?,
                None => self.play_turn()?,
            };
        }

        let summary = self.summary();
        if let Some(outcome) = summary.outcome {
            event!(
                target: "hanabi_core::table",
                Level::INFO,
                outcome = %outcome,
                score = summary.score,
                turns = summary.turns,
                "game over"
            );
        }
        Ok(summary)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            turns: self.turns,
            score: self.game.score(),
            outcome: self.game.outcome(),
            lives: self.game.lives(),
            tokens: self.game.tokens(),
            stacks: self.game.stacks(),
        }
    }

    fn apply(&mut self, mv: Move) -> Result<TurnRecord, GameError> {
        let player = self.game.current_player();
        self.game.apply(&mv, &mut Seats(&mut self.seats))?;

        let event = match self.game.last_move() {
            Some(event) => event.clone(),
            None => return Err(RuleViolation::GameOver.into()),
        };
        let record = TurnRecord {
            turn: self.turns,
            player,
            mv,
            event,
        };
        self.turns += 1;

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "hanabi_core::table",
                Level::INFO,
                turn = record.turn,
                player,
                mv = %record.mv,
                detail = %record.detail(),
                tokens = self.game.tokens(),
                lives = self.game.lives(),
                score = self.game.score(),
                "turn played"
            );
        }
        Ok(record)
    }
}
