use super::error::{InvalidOperation, RuleViolation};
use super::event::{MoveEvent, Silent};
use super::state::{Game, Outcome};
use crate::model::card::{Card, CardId};
use crate::model::color::Color;
use crate::model::deck::Deck;
use crate::model::moves::Move;
use std::borrow::{Borrow, BorrowMut};

/// What the viewer publicly knows about one of their own cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnCardKnowledge {
    pub id: CardId,
    pub color: Option<Color>,
    pub number: Option<u8>,
}

/// One player's restricted perspective on a [`Game`].
///
/// `G` is the handle to the game: `&Game` for a live read-only view,
/// `Game` for a hypothetical continuation the view owns, `&mut Game` when the
/// viewer may also rearrange their own hand.
#[derive(Debug, Clone)]
pub struct PrivateView<G> {
    seat: usize,
    game: G,
}

impl<G: Borrow<Game>> PrivateView<G> {
    pub fn new(seat: usize, game: G) -> Self {
        Self { seat, game }
    }

    fn inner(&self) -> &Game {
        <G as Borrow<Game>>::borrow(&self.game)
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn num_players(&self) -> usize {
        self.inner().num_players()
    }

    pub fn cards_per_player(&self) -> usize {
        self.inner().cards_per_player()
    }

    pub fn tokens(&self) -> u8 {
        self.inner().tokens()
    }

    pub fn lives(&self) -> u8 {
        self.inner().lives()
    }

    pub fn current_player(&self) -> usize {
        self.inner().current_player()
    }

    pub fn is_my_turn(&self) -> bool {
        !self.is_over() && self.current_player() == self.seat
    }

    pub fn stack(&self, color: Color) -> u8 {
        self.inner().stack(color)
    }

    pub fn discard_pile(&self) -> &[Card] {
        self.inner().discard_pile()
    }

    pub fn deck_remaining(&self) -> usize {
        self.inner().deck_remaining()
    }

    pub fn last_move(&self) -> Option<&MoveEvent> {
        self.inner().last_move()
    }

    pub fn score(&self) -> u32 {
        self.inner().score()
    }

    pub fn is_winnable(&self) -> bool {
        self.inner().is_winnable()
    }

    pub fn is_over(&self) -> bool {
        self.inner().is_over()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.inner().outcome()
    }

    pub fn own_card_count(&self) -> usize {
        self.inner().hand(self.seat).len()
    }

    /// Identities of the viewer's cards, in hand order.
    pub fn own_hand(&self) -> Vec<CardId> {
        self.inner().hand(self.seat).iter().map(Card::id).collect()
    }

    pub fn own_hand_knowledge(&self) -> Vec<OwnCardKnowledge> {
        self.inner()
            .hand(self.seat)
            .iter()
            .map(|card| OwnCardKnowledge {
                id: card.id(),
                color: card.color_known().then(|| card.color()),
                number: card.number_known().then(|| card.number()),
            })
            .collect()
    }

    pub fn own_card_index(&self, id: CardId) -> Option<usize> {
        self.inner()
            .hand(self.seat)
            .iter()
            .position(|card| card.id() == id)
    }

    pub fn card_id(&self, slot: usize) -> Option<CardId> {
        self.inner().hand(self.seat).get(slot).map(Card::id)
    }

    /// Every hand except the viewer's, with seat numbers.
    pub fn other_hands(&self) -> impl Iterator<Item = (usize, &[Card])> + '_ {
        let game = self.inner();
        (0..game.num_players())
            .filter(move |&player| player != self.seat)
            .map(move |player| (player, game.hand(player)))
    }

    pub fn player_hand(&self, player: usize) -> Result<&[Card], InvalidOperation> {
        if player == self.seat {
            return Err(InvalidOperation::HiddenHand { player });
        }
        Ok(self.inner().hand(player))
    }

    pub fn player_card(&self, player: usize, slot: usize) -> Result<&Card, InvalidOperation> {
        self.player_hand(player)?
            .get(slot)
            .ok_or(InvalidOperation::NoSuchCard { player, slot })
    }

    /// Canonical moves open to the viewer: every discard, every play, then
    /// (with a token available) every hint that matches at least one card,
    /// per teammate in seat order, colors before numbers.
    ///
    /// Empty unless it is the viewer's turn.
    pub fn available_moves(&self) -> Vec<Move> {
        if !self.is_my_turn() {
            return Vec::new();
        }

        let game = self.inner();
        let hand_len = self.own_card_count();
        let mut moves: Vec<Move> = (0..hand_len).map(|slot| Move::Discard { slot }).collect();
        moves.extend((0..hand_len).map(|slot| Move::Play { slot }));

        if game.tokens() == 0 {
            return moves;
        }

        for (player, hand) in self.other_hands() {
            let mut colors: Vec<Color> = Vec::new();
            let mut numbers: Vec<u8> = Vec::new();
            for card in hand {
                if !colors.contains(&card.color()) {
                    colors.push(card.color());
                }
                if !numbers.contains(&card.number()) {
                    numbers.push(card.number());
                }
            }
            moves.extend(
                colors
                    .into_iter()
                    .map(|color| Move::TellColor { player, color }),
            );
            moves.extend(
                numbers
                    .into_iter()
                    .map(|number| Move::TellNumber { player, number }),
            );
        }

        moves
    }

    /// The state that would follow if the viewer's hand were
    /// `hypothetical_hand`, the next draw were `hypothetical_next`, and the
    /// current player made `mv`. The underlying game is cloned; nothing is
    /// mutated and no observer is notified.
    pub fn test_move(
        &self,
        mv: &Move,
        hypothetical_hand: Vec<Card>,
        hypothetical_next: Option<Card>,
    ) -> Result<PrivateView<Game>, RuleViolation> {
        let mut hypothetical = self.inner().clone();
        hypothetical.replace_hand(self.seat, hypothetical_hand);
        hypothetical.replace_deck(Deck::from_cards(hypothetical_next.into_iter().collect()));
        hypothetical.apply(mv, &mut Silent)?;
        Ok(PrivateView::new(self.seat, hypothetical))
    }
}

impl<G: BorrowMut<Game>> PrivateView<G> {
    /// Rearranges the viewer's own hand; `order` must be a permutation of
    /// [`own_hand`](Self::own_hand).
    pub fn reorder_hand(&mut self, order: &[CardId]) -> Result<(), InvalidOperation> {
        let seat = self.seat;
        <G as BorrowMut<Game>>::borrow_mut(&mut self.game).reorder_hand(seat, order)
    }
}

#[cfg(test)]
mod tests {
    use super::PrivateView;
    use crate::game::error::InvalidOperation;
    use crate::game::event::Silent;
    use crate::game::state::Game;
    use crate::model::card::{Card, CardFace};
    use crate::model::color::Color;
    use crate::model::deck::Deck;
    use crate::model::moves::Move;

    fn scripted_game(players: usize) -> Game {
        use Color::*;
        let prefix = [
            (Red, 1), (Green, 3), (Blue, 1), (Blue, 2), (Yellow, 1),
            (Yellow, 5), (Yellow, 2), (Red, 4), (White, 4), (Red, 5),
            (Green, 1), (Red, 1), (White, 2), (White, 5), (Blue, 3),
            (White, 1),
        ]
        .map(|(color, number)| CardFace::new(color, number));
        Game::new(players, Deck::stacked(&prefix).unwrap()).unwrap()
    }

    fn texts(moves: &[Move]) -> Vec<String> {
        moves.iter().map(Move::to_string).collect()
    }

    #[test]
    fn starting_position_lists_plays_discards_and_hints() {
        let game = scripted_game(2);
        let view = PrivateView::new(0, &game);
        let moves = texts(&view.available_moves());

        assert_eq!(moves.len(), 16);
        for slot in 0..5 {
            assert!(moves.contains(&format!("play {slot}")));
            assert!(moves.contains(&format!("discard {slot}")));
        }
        for hint in [
            "tell player 1 about number 2",
            "tell player 1 about number 4",
            "tell player 1 about number 5",
            "tell player 1 about color white",
            "tell player 1 about color red",
            "tell player 1 about color yellow",
        ] {
            assert!(moves.contains(&hint.to_string()), "{hint}");
        }
        assert_eq!(moves[0], "discard 0");
        assert_eq!(moves[5], "play 0");
    }

    #[test]
    fn no_hints_without_tokens() {
        let game = scripted_game(2).with_tokens(0);
        let view = PrivateView::new(0, &game);
        let moves = view.available_moves();
        assert_eq!(moves.len(), 10);
        assert!(moves.iter().all(|mv| !mv.is_tell()));
    }

    #[test]
    fn no_moves_outside_own_turn() {
        let game = scripted_game(2);
        assert!(PrivateView::new(1, &game).available_moves().is_empty());
    }

    #[test]
    fn test_move_applies_hypothesis_to_a_clone() {
        let game = scripted_game(2).with_tokens(1);
        let view = PrivateView::new(0, &game);

        let hypothetical_hand = [Color::Red, Color::Green, Color::Blue, Color::Yellow, Color::White]
            .map(|color| Card::new(color, 1))
            .to_vec();
        let next = Card::new(Color::Green, 5);
        let next_id = next.id();

        let result = view
            .test_move(&Move::Discard { slot: 0 }, hypothetical_hand, Some(next))
            .unwrap();

        assert_eq!(result.tokens(), 2);
        assert_eq!(result.own_hand().last(), Some(&next_id));
        assert_eq!(result.discard_pile()[0].face(), CardFace::new(Color::Red, 1));
        assert_eq!(result.deck_remaining(), 0);

        assert_eq!(game.tokens(), 1);
        assert!(game.discard_pile().is_empty());
        assert_eq!(game.current_player(), 0);
    }

    #[test]
    fn own_hand_is_hidden_from_other_hand_accessors() {
        let game = scripted_game(3);
        let view = PrivateView::new(1, &game);
        assert_eq!(
            view.player_hand(1).unwrap_err(),
            InvalidOperation::HiddenHand { player: 1 }
        );
        assert_eq!(view.player_card(2, 1).unwrap().face(), CardFace::new(Color::Red, 1));
        assert!(matches!(
            view.player_card(2, 9),
            Err(InvalidOperation::NoSuchCard { .. })
        ));
        let seats: Vec<usize> = view.other_hands().map(|(seat, _)| seat).collect();
        assert_eq!(seats, vec![0, 2]);
    }

    #[test]
    fn own_knowledge_reflects_hints_only() {
        let mut game = scripted_game(2);
        game.discard(0, &mut Silent).unwrap();
        game.tell_color(0, Color::Blue, &mut Silent).unwrap();

        let view = PrivateView::new(0, &game);
        let knowledge = view.own_hand_knowledge();
        // hand is now G3 B1 B2 Y1 + replacement
        assert_eq!(knowledge[1].color, Some(Color::Blue));
        assert_eq!(knowledge[2].color, Some(Color::Blue));
        assert_eq!(knowledge[0].color, None);
        assert!(knowledge.iter().all(|k| k.number.is_none()));
    }

    #[test]
    fn reorder_through_mutable_view() {
        let mut game = scripted_game(2).with_tokens(1);
        let mut view = PrivateView::new(0, &mut game);
        let original = view.own_hand();
        let reversed: Vec<_> = original.iter().rev().copied().collect();

        view.reorder_hand(&reversed).unwrap();
        assert_eq!(view.own_hand(), reversed);
        assert_eq!(view.card_id(0), original.last().copied());
        assert_eq!(view.own_card_index(original[0]), Some(4));
        assert_eq!(
            view.reorder_hand(&original[1..]).unwrap_err(),
            InvalidOperation::InvalidReorder
        );
    }
}
