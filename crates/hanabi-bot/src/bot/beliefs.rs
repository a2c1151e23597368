use hanabi_core::belief::OptionTracker;
use hanabi_core::game::{Game, MoveEvent, PrivateView};
use hanabi_core::model::card::{Card, CardFace};
use hanabi_core::model::color::Color;
use std::borrow::Borrow;

/// One player's trackers: one per own hand slot plus one for the draw pile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefState {
    seat: usize,
    hand: Vec<OptionTracker>,
    deck: OptionTracker,
}

impl BeliefState {
    /// Starts from the full deck minus everything the viewer can see.
    pub fn from_view<G: Borrow<Game>>(view: &PrivateView<G>) -> Self {
        let mut visible: Vec<CardFace> = view
            .other_hands()
            .flat_map(|(_, hand)| hand.iter().map(Card::face))
            .collect();
        visible.extend(view.discard_pile().iter().map(Card::face));
        for color in Color::ALL {
            visible.extend((1..=view.stack(color)).map(|number| CardFace::new(color, number)));
        }

        let initial = OptionTracker::unseen(visible);
        Self {
            seat: view.seat(),
            hand: vec![initial; view.own_card_count()],
            deck: initial,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn hand_trackers(&self) -> &[OptionTracker] {
        &self.hand
    }

    pub fn deck_tracker(&self) -> &OptionTracker {
        &self.deck
    }

    /// Folds one public event into the trackers. `view` must show the state
    /// right after the move, as delivered to observers.
    pub fn observe<G: Borrow<Game>>(&mut self, event: &MoveEvent, view: &PrivateView<G>) {
        match event {
            MoveEvent::TellColor {
                recipient,
                color,
                matches,
                ..
            } => {
                if *recipient != self.seat {
                    return;
                }
                for (slot, tracker) in self.hand.iter_mut().enumerate() {
                    if matches.iter().any(|m| m.slot == slot) {
                        tracker.color_is(*color);
                    } else {
                        tracker.color_is_not(*color);
                    }
                }
            }
            MoveEvent::TellNumber {
                recipient,
                number,
                matches,
                ..
            } => {
                if *recipient != self.seat {
                    return;
                }
                for (slot, tracker) in self.hand.iter_mut().enumerate() {
                    if matches.iter().any(|m| m.slot == slot) {
                        tracker.number_is(*number);
                    } else {
                        tracker.number_is_not(*number);
                    }
                }
            }
            MoveEvent::Discard {
                actor, slot, face, ..
            }
            | MoveEvent::Play {
                actor, slot, face, ..
            } => {
                if *actor == self.seat {
                    self.shift(*slot, view.own_card_count());
                    self.remove_everywhere(*face);
                    return;
                }

                // a full hand means the actor drew a replacement, now visible
                let Ok(hand) = view.player_hand(*actor) else {
                    return;
                };
                if hand.len() == view.cards_per_player() {
                    if let Some(card) = hand.last() {
                        self.remove_everywhere(card.face());
                    }
                }
            }
        }
    }

    /// Drops the tracker at `removed`; the replacement slot, if the owner
    /// now holds more cards than trackers, starts from the deck tracker.
    pub fn shift(&mut self, removed: usize, own_card_count: usize) {
        if removed < self.hand.len() {
            self.hand.remove(removed);
        }
        if self.deck.has_options() && own_card_count > self.hand.len() {
            self.hand.push(self.deck);
        }
    }

    fn remove_everywhere(&mut self, face: CardFace) {
        self.deck.remove_instance(face);
        for tracker in &mut self.hand {
            tracker.remove_instance(face);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BeliefState;
    use hanabi_core::belief::OptionTracker;
    use hanabi_core::game::{Game, PrivateView};
    use hanabi_core::model::card::CardFace;
    use hanabi_core::model::color::Color;
    use hanabi_core::model::deck::Deck;

    #[test]
    fn fresh_game_sees_only_teammates() {
        let game = Game::new(2, Deck::standard()).unwrap();
        let beliefs = BeliefState::from_view(&PrivateView::new(1, &game));
        // seat 0 holds R1 R1 R1 R2 R2
        assert_eq!(beliefs.hand_trackers().len(), 5);
        assert_eq!(beliefs.deck_tracker().get(CardFace::new(Color::Red, 1)), 0);
        assert_eq!(beliefs.deck_tracker().get(CardFace::new(Color::Red, 2)), 0);
        assert_eq!(beliefs.deck_tracker().total(), 45);
    }

    #[test]
    fn shift_appends_only_when_a_card_was_drawn() {
        let game = Game::new(2, Deck::standard()).unwrap();
        let mut beliefs = BeliefState::from_view(&PrivateView::new(0, &game));
        beliefs.hand[2] = OptionTracker::from_counts([(CardFace::new(Color::Blue, 4), 1)]);

        beliefs.shift(1, 5);
        assert_eq!(beliefs.hand.len(), 5);
        assert_eq!(beliefs.hand[1].total(), 1);
        assert_eq!(beliefs.hand[4], beliefs.deck);

        beliefs.shift(0, 4);
        assert_eq!(beliefs.hand.len(), 4);
    }

    #[test]
    fn shift_skips_exhausted_deck_tracker() {
        let game = Game::new(2, Deck::standard()).unwrap();
        let mut beliefs = BeliefState::from_view(&PrivateView::new(0, &game));
        beliefs.deck = OptionTracker::empty();
        beliefs.shift(0, 5);
        assert_eq!(beliefs.hand.len(), 4);
    }
}
