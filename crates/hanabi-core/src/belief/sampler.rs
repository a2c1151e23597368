//! Draws concrete hidden hands from per-slot trackers.

use super::tracker::OptionTracker;
use crate::model::card::CardFace;
use rand::Rng;
use thiserror::Error;

/// One concrete guess at the viewer's hidden cards and the next draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenState {
    pub hand: Vec<CardFace>,
    /// `None` when the deck tracker has nothing left once the hand is drawn.
    pub next_card: Option<CardFace>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("no face can occupy hand slot {slot} after earlier draws")]
    NoFeasibleCard { slot: usize },
}

#[derive(Debug, Default)]
pub struct HiddenStateSampler;

impl HiddenStateSampler {
    /// Samples each slot in order without replacement: faces drawn for
    /// earlier slots are removed from later slots and from the deck tracker.
    pub fn sample<R: Rng + ?Sized>(
        hand: &[OptionTracker],
        deck: &OptionTracker,
        rng: &mut R,
    ) -> Result<HiddenState, SamplingError> {
        let mut drawn: Vec<CardFace> = Vec::with_capacity(hand.len());

        for (slot, tracker) in hand.iter().enumerate() {
            let mut options = *tracker;
            for &face in &drawn {
                options.remove_instance(face);
            }
            let face =
                select_weighted_face(&options, rng).ok_or(SamplingError::NoFeasibleCard { slot })?;
            drawn.push(face);
        }

        let mut deck_options = *deck;
        for &face in &drawn {
            deck_options.remove_instance(face);
        }
        let next_card = select_weighted_face(&deck_options, rng);

        Ok(HiddenState {
            hand: drawn,
            next_card,
        })
    }

    /// `count` independent samples, failures included so callers can count them.
    pub fn sample_many<R: Rng + ?Sized>(
        hand: &[OptionTracker],
        deck: &OptionTracker,
        count: usize,
        rng: &mut R,
    ) -> Vec<Result<HiddenState, SamplingError>> {
        (0..count).map(|_| Self::sample(hand, deck, rng)).collect()
    }
}

fn select_weighted_face<R: Rng + ?Sized>(tracker: &OptionTracker, rng: &mut R) -> Option<CardFace> {
    let total = tracker.total();
    if total == 0 {
        return None;
    }

    let mut choice = rng.gen_range(0..total);
    for (face, count) in tracker.iter() {
        let weight = count as u32;
        if choice < weight {
            return Some(face);
        }
        choice -= weight;
    }

    None
}
