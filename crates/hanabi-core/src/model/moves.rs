use crate::model::color::Color;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A move in canonical form. `Display` and `FromStr` round-trip through the
/// textual representation used by the runner and by move enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Play { slot: usize },
    Discard { slot: usize },
    TellColor { player: usize, color: Color },
    TellNumber { player: usize, number: u8 },
}

impl Move {
    pub const fn is_tell(self) -> bool {
        matches!(self, Move::TellColor { .. } | Move::TellNumber { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play { slot } => write!(f, "play {slot}"),
            Move::Discard { slot } => write!(f, "discard {slot}"),
            Move::TellColor { player, color } => {
                write!(f, "tell player {player} about color {color}")
            }
            Move::TellNumber { player, number } => {
                write!(f, "tell player {player} about number {number}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("empty move text")]
    Empty,
    #[error("unrecognised move '{0}'")]
    Unrecognised(String),
    #[error("invalid index '{0}'")]
    InvalidIndex(String),
    #[error("unknown color '{0}'")]
    UnknownColor(String),
}

fn parse_index(raw: &str) -> Result<usize, MoveParseError> {
    raw.parse::<usize>()
        .map_err(|_| MoveParseError::InvalidIndex(raw.to_string()))
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(MoveParseError::Empty),
            ["play", slot] => Ok(Move::Play {
                slot: parse_index(slot)?,
            }),
            ["discard", slot] => Ok(Move::Discard {
                slot: parse_index(slot)?,
            }),
            ["tell", "player", player, "about", "color", color] => Ok(Move::TellColor {
                player: parse_index(player)?,
                color: color
                    .parse()
                    .map_err(|_| MoveParseError::UnknownColor(color.to_string()))?,
            }),
            ["tell", "player", player, "about", "number", number] => {
                let number = number
                    .parse::<u8>()
                    .map_err(|_| MoveParseError::InvalidIndex(number.to_string()))?;
                Ok(Move::TellNumber {
                    player: parse_index(player)?,
                    number,
                })
            }
            _ => Err(MoveParseError::Unrecognised(s.trim().to_string())),
        }
    }
}
