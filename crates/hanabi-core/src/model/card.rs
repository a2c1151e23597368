use crate::model::color::Color;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CARD_ID: AtomicU64 = AtomicU64::new(1);

/// Numbers printed on Hanabi cards, lowest first.
pub const NUMBERS: [u8; 5] = [1, 2, 3, 4, 5];

/// Identity of a physical card, independent of its face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u64);

impl CardId {
    /// Allocates an identity no other card in this process has used.
    pub fn fresh() -> Self {
        CardId(NEXT_CARD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The (color, number) pair printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardFace {
    pub color: Color,
    pub number: u8,
}

impl CardFace {
    pub const fn new(color: Color, number: u8) -> Self {
        Self { color, number }
    }

    pub const fn is_valid_number(number: u8) -> bool {
        number >= 1 && number <= 5
    }

    /// Physical copies of each number per color in a full deck.
    pub const fn copies_of(number: u8) -> u8 {
        match number {
            1 => 3,
            2..=4 => 2,
            5 => 1,
            _ => 0,
        }
    }

    pub const fn copies(self) -> u8 {
        Self::copies_of(self.number)
    }

    pub fn all() -> impl Iterator<Item = CardFace> {
        Color::ALL
            .into_iter()
            .flat_map(|color| NUMBERS.into_iter().map(move |number| CardFace::new(color, number)))
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.initial(), self.number)
    }
}

/// A physical card. Only the two knowledge flags ever change, and only from
/// unknown to known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    face: CardFace,
    color_known: bool,
    number_known: bool,
}

impl Card {
    pub fn new(color: Color, number: u8) -> Self {
        Self::from_face(CardFace::new(color, number))
    }

    pub fn from_face(face: CardFace) -> Self {
        Self {
            id: CardId::fresh(),
            face,
            color_known: false,
            number_known: false,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn color(&self) -> Color {
        self.face.color
    }

    pub fn number(&self) -> u8 {
        self.face.number
    }

    pub fn color_known(&self) -> bool {
        self.color_known
    }

    pub fn number_known(&self) -> bool {
        self.number_known
    }

    pub(crate) fn reveal_color(&mut self) -> bool {
        let newly = !self.color_known;
        self.color_known = true;
        newly
    }

    pub(crate) fn reveal_number(&mut self) -> bool {
        let newly = !self.number_known;
        self.number_known = true;
        newly
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.face.color.initial(),
            if self.color_known { "+" } else { "" },
            self.face.number,
            if self.number_known { "+" } else { "" }
        )
    }
}
