use super::error::GameError;
use super::state::{Game, GameParts, MAX_PLAYERS, MAX_TOKENS, MIN_PLAYERS, Outcome};
use crate::model::card::{Card, CardFace};
use crate::model::deck::{Deck, DeckError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub face: CardFace,
    #[serde(default)]
    pub color_known: bool,
    #[serde(default)]
    pub number_known: bool,
}

impl CardSnapshot {
    fn capture(card: &Card) -> Self {
        Self {
            face: card.face(),
            color_known: card.color_known(),
            number_known: card.number_known(),
        }
    }

    fn restore(self) -> Result<Card, DeckError> {
        if !CardFace::is_valid_number(self.face.number) {
            return Err(DeckError::InvalidNumber(self.face.number));
        }
        let mut card = Card::from_face(self.face);
        if self.color_known {
            card.reveal_color();
        }
        if self.number_known {
            card.reveal_number();
        }
        Ok(card)
    }
}

/// Full, omniscient picture of a game. Card identities are not kept; a
/// restored game hands out fresh ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub hands: Vec<Vec<CardSnapshot>>,
    pub deck: Vec<CardSnapshot>,
    pub discard_pile: Vec<CardSnapshot>,
    pub stacks: [u8; 5],
    pub tokens: u8,
    pub lives: u8,
    pub current_player: usize,
    #[serde(default)]
    pub last_round_from: Option<usize>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let cards = |pile: &[Card]| -> Vec<CardSnapshot> {
            pile.iter().map(CardSnapshot::capture).collect()
        };
        GameSnapshot {
            hands: (0..game.num_players())
                .map(|seat| cards(game.hand(seat)))
                .collect(),
            deck: game.draw_pile().iter().map(CardSnapshot::capture).collect(),
            discard_pile: cards(game.discard_pile()),
            stacks: game.stacks(),
            tokens: game.tokens(),
            lives: game.lives(),
            current_player: game.current_player(),
            last_round_from: game.last_round_from(),
            outcome: game.outcome(),
        }
    }

    pub fn restore(self) -> Result<Game, GameError> {
        let players = self.hands.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(GameError::PlayerCount { found: players });
        }
        if self.current_player >= players {
            return Err(GameError::NoSuchSeat {
                seat: self.current_player,
                players,
            });
        }
        if let Some(&height) = self.stacks.iter().find(|&&height| height > 5) {
            return Err(DeckError::InvalidNumber(height).into());
        }
        self.check_conservation()?;

        let restore_all = |cards: Vec<CardSnapshot>| -> Result<Vec<Card>, DeckError> {
            cards.into_iter().map(CardSnapshot::restore).collect()
        };
        let hands = self
            .hands
            .into_iter()
            .map(restore_all)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Game::from_parts(GameParts {
            hands,
            deck: Deck::from_cards(restore_all(self.deck)?),
            discard_pile: restore_all(self.discard_pile)?,
            stacks: self.stacks,
            tokens: self.tokens.min(MAX_TOKENS),
            lives: self.lives,
            current_player: self.current_player,
            last_round_from: self.last_round_from.filter(|&seat| seat < players),
            outcome: self.outcome,
        }))
    }

    /// Every face must be accounted for exactly as often as a full deck
    /// holds it, counting a stack at height `n` as holding 1..=n.
    fn check_conservation(&self) -> Result<(), GameError> {
        for face in CardFace::all() {
            let held = self
                .hands
                .iter()
                .flatten()
                .chain(&self.deck)
                .chain(&self.discard_pile)
                .filter(|card| card.face == face)
                .count();
            let stacked = usize::from(self.stacks[face.color.index()] >= face.number);
            let expected = usize::from(face.copies());
            if held + stacked != expected {
                return Err(GameError::CardCount {
                    face,
                    found: held + stacked,
                    expected,
                });
            }
        }
        Ok(())
    }

    pub fn to_json(game: &Game) -> serde_json::Result<String> {
        let snapshot = Self::capture(game);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
