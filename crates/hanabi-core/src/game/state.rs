use super::error::{GameError, InvalidOperation, RuleViolation};
use super::event::{HintMatch, MoveEvent, MoveObserver};
use crate::model::card::{Card, CardFace, CardId, NUMBERS};
use crate::model::color::Color;
use crate::model::deck::Deck;
use crate::model::moves::Move;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_TOKENS: u8 = 8;
pub const DEFAULT_LIVES: u8 = 3;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    /// Lives ran out.
    LossBomb,
    /// The last round finished without completing every stack.
    LossExhausted,
}

impl Outcome {
    pub const fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::LossBomb => "Lose - bomb",
            Outcome::LossExhausted => "Lose - moves",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Over(Outcome),
}

pub(crate) struct GameParts {
    pub hands: Vec<Vec<Card>>,
    pub deck: Deck,
    pub discard_pile: Vec<Card>,
    pub stacks: [u8; 5],
    pub tokens: u8,
    pub lives: u8,
    pub current_player: usize,
    pub last_round_from: Option<usize>,
    pub outcome: Option<Outcome>,
}

/// Authoritative Hanabi state machine.
///
/// `Clone` is a deep copy: cards are plain values, so a cloned game shares
/// nothing mutable with its source. Hypothetical replay relies on this.
#[derive(Debug, Clone)]
pub struct Game {
    hands: Vec<Vec<Card>>,
    deck: Deck,
    discard_pile: Vec<Card>,
    stacks: [u8; 5],
    tokens: u8,
    lives: u8,
    current_player: usize,
    cards_per_player: usize,
    /// Seat that drew the last card, once the draw pile is exhausted.
    last_round_from: Option<usize>,
    status: GameStatus,
    last_move: Option<MoveEvent>,
}

impl Game {
    pub fn new(num_players: usize, deck: Deck) -> Result<Self, GameError> {
        Self::with_lives(num_players, deck, DEFAULT_LIVES)
    }

    /// Deals hands player by player from the top of `deck`.
    pub fn with_lives(num_players: usize, mut deck: Deck, lives: u8) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::PlayerCount { found: num_players });
        }

        let cards_per_player = if num_players > 3 { 4 } else { 5 };
        let mut hands = Vec::with_capacity(num_players);
        for _ in 0..num_players {
            let mut hand = Vec::with_capacity(cards_per_player);
            for _ in 0..cards_per_player {
                if let Some(card) = deck.draw() {
                    hand.push(card);
                }
            }
            hands.push(hand);
        }

        Ok(Self {
            hands,
            deck,
            discard_pile: Vec::new(),
            stacks: [0; 5],
            tokens: MAX_TOKENS,
            lives,
            current_player: 0,
            cards_per_player,
            last_round_from: None,
            status: GameStatus::InProgress,
            last_move: None,
        })
    }

    /// Reassembles a game from saved parts. Callers validate ranges.
    pub(crate) fn from_parts(parts: GameParts) -> Self {
        let status = match parts.outcome {
            Some(outcome) => GameStatus::Over(outcome),
            None => GameStatus::InProgress,
        };
        Self {
            cards_per_player: if parts.hands.len() > 3 { 4 } else { 5 },
            hands: parts.hands,
            deck: parts.deck,
            discard_pile: parts.discard_pile,
            stacks: parts.stacks,
            tokens: parts.tokens,
            lives: parts.lives,
            current_player: parts.current_player,
            last_round_from: parts.last_round_from,
            status,
            last_move: None,
        }
    }

    pub(crate) fn last_round_from(&self) -> Option<usize> {
        self.last_round_from
    }

    /// Overrides the starting token count (clamped to the cap).
    pub fn with_tokens(mut self, tokens: u8) -> Self {
        self.tokens = tokens.min(MAX_TOKENS);
        self
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn cards_per_player(&self) -> usize {
        self.cards_per_player
    }

    pub fn tokens(&self) -> u8 {
        self.tokens
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn hand(&self, seat: usize) -> &[Card] {
        self.hands.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn draw_pile(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn stack(&self, color: Color) -> u8 {
        self.stacks[color.index()]
    }

    pub fn stacks(&self) -> [u8; 5] {
        self.stacks
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::Over(outcome) => Some(outcome),
            GameStatus::InProgress => None,
        }
    }

    pub fn last_move(&self) -> Option<&MoveEvent> {
        self.last_move.as_ref()
    }

    pub fn is_last_round(&self) -> bool {
        self.last_round_from.is_some()
    }

    pub fn score(&self) -> u32 {
        self.stacks.iter().map(|&height| height as u32).sum()
    }

    /// Faces consumed by successful plays, implied by the stack heights.
    pub fn played_faces(&self) -> impl Iterator<Item = CardFace> + '_ {
        Color::ALL.into_iter().flat_map(move |color| {
            (1..=self.stacks[color.index()]).map(move |number| CardFace::new(color, number))
        })
    }

    /// False once the discard pile holds every copy of any single face.
    ///
    /// One blocked color flags the whole game, not only that color.
    pub fn is_winnable(&self) -> bool {
        for color in Color::ALL {
            for number in NUMBERS {
                let face = CardFace::new(color, number);
                let discarded = self
                    .discard_pile
                    .iter()
                    .filter(|card| card.face() == face)
                    .count();
                if discarded >= face.copies() as usize {
                    return false;
                }
            }
        }
        true
    }

    pub fn apply(
        &mut self,
        mv: &Move,
        observer: &mut dyn MoveObserver,
    ) -> Result<(), RuleViolation> {
        match *mv {
            Move::Play { slot } => self.play_card(slot, observer).map(|_| ()),
            Move::Discard { slot } => self.discard(slot, observer),
            Move::TellColor { player, color } => self.tell_color(player, color, observer),
            Move::TellNumber { player, number } => self.tell_number(player, number, observer),
        }
    }

    /// Plays the card at `slot`. Returns whether it landed on its stack.
    pub fn play_card(
        &mut self,
        slot: usize,
        observer: &mut dyn MoveObserver,
    ) -> Result<bool, RuleViolation> {
        self.ensure_in_progress()?;
        let actor = self.current_player;
        self.check_slot(actor, slot)?;

        let card = self.hands[actor].remove(slot);
        let face = card.face();
        let success = self.stacks[face.color.index()] + 1 == face.number;

        if success {
            self.stacks[face.color.index()] = face.number;
            if face.number == 5 {
                self.tokens = (self.tokens + 1).min(MAX_TOKENS);
                if self.stacks.iter().all(|&height| height == 5) {
                    self.status = GameStatus::Over(Outcome::Win);
                }
            }
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.status = GameStatus::Over(Outcome::LossBomb);
            }
        }

        let event = MoveEvent::Play {
            actor,
            slot,
            card: card.id(),
            face,
            success,
        };
        if !success {
            self.discard_pile.push(card);
        }
        self.draw_replacement(actor);
        self.finish_move(event, observer);
        Ok(success)
    }

    /// Discards the card at `slot`. Regains a token unless already at the cap.
    pub fn discard(
        &mut self,
        slot: usize,
        observer: &mut dyn MoveObserver,
    ) -> Result<(), RuleViolation> {
        self.ensure_in_progress()?;
        let actor = self.current_player;
        self.check_slot(actor, slot)?;

        if self.tokens < MAX_TOKENS {
            self.tokens += 1;
        }

        let card = self.hands[actor].remove(slot);
        let event = MoveEvent::Discard {
            actor,
            slot,
            card: card.id(),
            face: card.face(),
        };
        self.discard_pile.push(card);
        self.draw_replacement(actor);
        self.finish_move(event, observer);
        Ok(())
    }

    pub fn tell_color(
        &mut self,
        player: usize,
        color: Color,
        observer: &mut dyn MoveObserver,
    ) -> Result<(), RuleViolation> {
        self.check_tell(player)?;
        if !self.hands[player].iter().any(|card| card.color() == color) {
            return Err(RuleViolation::NoMatchingColor { player, color });
        }

        self.tokens -= 1;
        let matches = self.hands[player]
            .iter_mut()
            .enumerate()
            .filter(|(_, card)| card.color() == color)
            .map(|(slot, card)| HintMatch {
                slot,
                card: card.id(),
                newly_known: card.reveal_color(),
            })
            .collect();

        let event = MoveEvent::TellColor {
            actor: self.current_player,
            recipient: player,
            color,
            matches,
        };
        self.finish_move(event, observer);
        Ok(())
    }

    pub fn tell_number(
        &mut self,
        player: usize,
        number: u8,
        observer: &mut dyn MoveObserver,
    ) -> Result<(), RuleViolation> {
        self.check_tell(player)?;
        if !self.hands[player].iter().any(|card| card.number() == number) {
            return Err(RuleViolation::NoMatchingNumber { player, number });
        }

        self.tokens -= 1;
        let matches = self.hands[player]
            .iter_mut()
            .enumerate()
            .filter(|(_, card)| card.number() == number)
            .map(|(slot, card)| HintMatch {
                slot,
                card: card.id(),
                newly_known: card.reveal_number(),
            })
            .collect();

        let event = MoveEvent::TellNumber {
            actor: self.current_player,
            recipient: player,
            number,
            matches,
        };
        self.finish_move(event, observer);
        Ok(())
    }

    /// Rearranges `seat`'s hand to follow `order`, which must list every card
    /// currently in that hand exactly once.
    pub fn reorder_hand(&mut self, seat: usize, order: &[CardId]) -> Result<(), InvalidOperation> {
        let hand = self
            .hands
            .get_mut(seat)
            .ok_or(InvalidOperation::InvalidReorder)?;

        let unique: HashSet<CardId> = order.iter().copied().collect();
        if order.len() != hand.len()
            || unique.len() != order.len()
            || hand.iter().any(|card| !unique.contains(&card.id()))
        {
            return Err(InvalidOperation::InvalidReorder);
        }

        hand.sort_by_key(|card| order.iter().position(|id| *id == card.id()));
        Ok(())
    }

    pub(crate) fn replace_hand(&mut self, seat: usize, cards: Vec<Card>) {
        if let Some(hand) = self.hands.get_mut(seat) {
            *hand = cards;
        }
    }

    pub(crate) fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    fn ensure_in_progress(&self) -> Result<(), RuleViolation> {
        if self.is_over() {
            return Err(RuleViolation::GameOver);
        }
        Ok(())
    }

    fn check_slot(&self, seat: usize, slot: usize) -> Result<(), RuleViolation> {
        let len = self.hands[seat].len();
        if slot >= len {
            return Err(RuleViolation::NoSuchSlot { slot, len });
        }
        Ok(())
    }

    fn check_tell(&self, player: usize) -> Result<(), RuleViolation> {
        self.ensure_in_progress()?;
        if self.tokens == 0 {
            return Err(RuleViolation::NoTokens);
        }
        if player >= self.num_players() {
            return Err(RuleViolation::NoSuchPlayer {
                player,
                players: self.num_players(),
            });
        }
        if player == self.current_player {
            return Err(RuleViolation::SelfHint { player });
        }
        Ok(())
    }

    fn draw_replacement(&mut self, seat: usize) {
        if let Some(card) = self.deck.draw() {
            self.hands[seat].push(card);
        }
    }

    fn finish_move(&mut self, event: MoveEvent, observer: &mut dyn MoveObserver) {
        self.last_move = Some(event.clone());
        observer.observe_move(&event, self);
        self.end_turn();
    }

    fn end_turn(&mut self) {
        match self.last_round_from {
            None if self.deck.is_empty() => {
                self.last_round_from = Some(self.current_player);
            }
            Some(seat) if seat == self.current_player && !self.is_over() => {
                self.status = GameStatus::Over(Outcome::LossExhausted);
            }
            _ => {}
        }
        self.current_player = (self.current_player + 1) % self.num_players();
    }
}
