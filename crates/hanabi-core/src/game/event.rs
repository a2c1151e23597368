//! Public move outcomes and the observer capability used to broadcast them.

use super::state::Game;
use crate::model::card::{CardFace, CardId};
use crate::model::color::Color;
use serde::{Deserialize, Serialize};

/// One hand position touched by a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintMatch {
    pub slot: usize,
    pub card: CardId,
    /// False when the attribute had already been revealed by an earlier hint.
    pub newly_known: bool,
}

/// Information visible to every player after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveEvent {
    TellColor {
        actor: usize,
        recipient: usize,
        color: Color,
        matches: Vec<HintMatch>,
    },
    TellNumber {
        actor: usize,
        recipient: usize,
        number: u8,
        matches: Vec<HintMatch>,
    },
    Discard {
        actor: usize,
        slot: usize,
        card: CardId,
        face: CardFace,
    },
    Play {
        actor: usize,
        slot: usize,
        card: CardId,
        face: CardFace,
        success: bool,
    },
}

impl MoveEvent {
    pub fn actor(&self) -> usize {
        match self {
            MoveEvent::TellColor { actor, .. }
            | MoveEvent::TellNumber { actor, .. }
            | MoveEvent::Discard { actor, .. }
            | MoveEvent::Play { actor, .. } => *actor,
        }
    }

    /// Slots of the recipient's hand that matched a hint; empty for other moves.
    pub fn hinted_slots(&self) -> Vec<usize> {
        match self {
            MoveEvent::TellColor { matches, .. } | MoveEvent::TellNumber { matches, .. } => {
                matches.iter().map(|m| m.slot).collect()
            }
            MoveEvent::Discard { .. } | MoveEvent::Play { .. } => Vec::new(),
        }
    }
}

/// Receives move events from the rule engine. The game passes itself in its
/// post-move state, before the turn pointer advances.
pub trait MoveObserver {
    fn observe_move(&mut self, event: &MoveEvent, game: &Game);
}

/// Observer that ignores everything; hypothetical replay uses it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl MoveObserver for Silent {
    fn observe_move(&mut self, _event: &MoveEvent, _game: &Game) {}
}

/// Collects every event it sees. Handy for drivers and tests.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<MoveEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MoveEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl MoveObserver for EventLog {
    fn observe_move(&mut self, event: &MoveEvent, _game: &Game) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{HintMatch, MoveEvent};
    use crate::model::card::{CardFace, CardId};
    use crate::model::color::Color;

    #[test]
    fn actor_and_hinted_slots_are_exposed() {
        let tell = MoveEvent::TellColor {
            actor: 1,
            recipient: 0,
            color: Color::Green,
            matches: vec![HintMatch {
                slot: 2,
                card: CardId::fresh(),
                newly_known: true,
            }],
        };
        assert_eq!(tell.actor(), 1);
        assert_eq!(tell.hinted_slots(), vec![2]);

        let discard = MoveEvent::Discard {
            actor: 2,
            slot: 0,
            card: CardId::fresh(),
            face: CardFace::new(Color::Red, 1),
        };
        assert_eq!(discard.actor(), 2);
        assert!(discard.hinted_slots().is_empty());
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let play = MoveEvent::Play {
            actor: 0,
            slot: 1,
            card: CardId::fresh(),
            face: CardFace::new(Color::Blue, 2),
            success: false,
        };
        let json = serde_json::to_string(&play).unwrap();
        assert!(json.contains("\"kind\":\"play\""));
        assert!(json.contains("\"color\":\"blue\""));
    }
}
