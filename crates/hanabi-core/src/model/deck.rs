use crate::model::card::{Card, CardFace};
use crate::model::color::Color;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use thiserror::Error;

pub const DECK_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("a full deck holds only {copies} copies of {face}")]
    TooManyCopies { face: CardFace, copies: u8 },
    #[error("card number {0} is outside 1..=5")]
    InvalidNumber(u8),
}

/// Ordered draw pile. Cards are drawn from the front.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Full 50-card deck, grouped by color then number.
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for face in CardFace::all() {
            for _ in 0..face.copies() {
                cards.push_back(Card::from_face(face));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Self::standard().cards.into();
        cards.shuffle(rng);
        Self {
            cards: cards.into(),
        }
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Full deck with `prefix` on top, followed by the rest of the
    /// composition in standard order.
    pub fn stacked(prefix: &[CardFace]) -> Result<Self, DeckError> {
        let mut remaining = [[0u8; 5]; 5];
        for face in CardFace::all() {
            remaining[face.color.index()][face.number as usize - 1] = face.copies();
        }

        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for &face in prefix {
            if !CardFace::is_valid_number(face.number) {
                return Err(DeckError::InvalidNumber(face.number));
            }
            let slot = &mut remaining[face.color.index()][face.number as usize - 1];
            if *slot == 0 {
                return Err(DeckError::TooManyCopies {
                    face,
                    copies: face.copies(),
                });
            }
            *slot -= 1;
            cards.push_back(Card::from_face(face));
        }

        for color in Color::ALL {
            for (offset, count) in remaining[color.index()].iter().enumerate() {
                for _ in 0..*count {
                    cards.push_back(Card::new(color, offset as u8 + 1));
                }
            }
        }

        Ok(Self { cards })
    }

    /// Arbitrary pile; used for hypothetical continuations.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
