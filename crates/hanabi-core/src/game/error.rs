use crate::model::card::CardFace;
use crate::model::color::Color;
use crate::model::deck::DeckError;
use crate::model::moves::MoveParseError;
use thiserror::Error;

/// An illegal move attempted against a game, live or hypothetical.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("at least one token is required to give a hint")]
    NoTokens,
    #[error("player {player} cannot give a hint to themselves")]
    SelfHint { player: usize },
    #[error("player {player} holds no {color} card")]
    NoMatchingColor { player: usize, color: Color },
    #[error("player {player} holds no card numbered {number}")]
    NoMatchingNumber { player: usize, number: u8 },
    #[error("slot {slot} is outside a hand of {len} cards")]
    NoSuchSlot { slot: usize, len: usize },
    #[error("there is no player {player} in a {players}-player game")]
    NoSuchPlayer { player: usize, players: usize },
    #[error("the game is already over")]
    GameOver,
}

/// Programmer errors: calls that no legal game flow should produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    #[error("hand reordering must be a permutation of the current hand")]
    InvalidReorder,
    #[error("player {player}'s own hand is hidden from their view")]
    HiddenHand { player: usize },
    #[error("slot {slot} is outside player {player}'s hand")]
    NoSuchCard { player: usize, slot: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Invalid(#[from] InvalidOperation),
    #[error(transparent)]
    Parse(#[from] MoveParseError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("hanabi needs 2 to 5 players, found {found}")]
    PlayerCount { found: usize },
    #[error("seat {seat} is outside a {players}-player game")]
    NoSuchSeat { seat: usize, players: usize },
    #[error("{face} accounts for {found} cards, a full deck holds {expected}")]
    CardCount {
        face: CardFace,
        found: usize,
        expected: usize,
    },
    #[error("seat {seat} already has a registered player")]
    SeatTaken { seat: usize },
    #[error("no player is registered for seat {seat}")]
    MissingPlayer { seat: usize },
    #[error("no move produced a finite score for player {seat}")]
    NoScorableMove { seat: usize },
}
