//! Depth-zero Monte Carlo move selection.

use super::beliefs::BeliefState;
use super::params::BotParams;
use hanabi_core::belief::HiddenStateSampler;
use hanabi_core::game::{Game, GameError, PrivateView};
use hanabi_core::model::card::Card;
use hanabi_core::model::moves::Move;
use rand::Rng;
use std::borrow::Borrow;
use tracing::{Level, event};

/// Averaged result for one candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEstimate {
    pub mv: Move,
    pub expected: f64,
    /// Samples that produced a score; rejected samples are not counted.
    pub evaluated: usize,
}

/// Static value of a state: score plus weighted lives and tokens, less the
/// penalty once the game can no longer be won.
pub fn evaluate_depth_zero<G: Borrow<Game>>(view: &PrivateView<G>, params: &BotParams) -> f64 {
    let draft = view.score() as f64
        + params.lives_weight * view.lives() as f64
        + params.tokens_weight * view.tokens() as f64;
    if view.is_winnable() {
        draft
    } else {
        draft - params.unwinnable_penalty
    }
}

/// Scores every available move by replaying it against freshly sampled
/// hidden states. Moves whose samples all failed are left out.
pub fn estimate_moves<G, R>(
    view: &PrivateView<G>,
    beliefs: &BeliefState,
    params: &BotParams,
    rng: &mut R,
) -> Vec<MoveEstimate>
where
    G: Borrow<Game>,
    R: Rng + ?Sized,
{
    let deck_has_cards = view.deck_remaining() > 0;
    let mut estimates = Vec::new();

    for mv in view.available_moves() {
        let samples = HiddenStateSampler::sample_many(
            beliefs.hand_trackers(),
            beliefs.deck_tracker(),
            params.samples,
            rng,
        );

        let mut total = 0.0;
        let mut evaluated = 0usize;
        let mut rejected = 0usize;
        for sample in samples {
            let Ok(state) = sample else {
                rejected += 1;
                continue;
            };
            let hand: Vec<Card> = state.hand.iter().copied().map(Card::from_face).collect();
            let next = if deck_has_cards {
                state.next_card.map(Card::from_face)
            } else {
                None
            };
            match view.test_move(&mv, hand, next) {
                Ok(result) => {
                    total += evaluate_depth_zero(&result, params);
                    evaluated += 1;
                }
                Err(_) => rejected += 1,
            }
        }

        if rejected > 0 {
            event!(
                target: "hanabi_bot::search",
                Level::TRACE,
                seat = view.seat(),
                mv = %mv,
                rejected,
                evaluated,
                "samples rejected"
            );
        }
        if evaluated > 0 {
            estimates.push(MoveEstimate {
                mv,
                expected: total / evaluated as f64,
                evaluated,
            });
        }
    }

    estimates
}

/// Picks the move with the highest expected depth-zero value. Ties keep
/// the move enumerated first.
pub fn choose_move<G, R>(
    view: &PrivateView<G>,
    beliefs: &BeliefState,
    params: &BotParams,
    rng: &mut R,
) -> Result<Move, GameError>
where
    G: Borrow<Game>,
    R: Rng + ?Sized,
{
    let estimates = estimate_moves(view, beliefs, params, rng);

    let mut best: Option<&MoveEstimate> = None;
    for estimate in &estimates {
        if !estimate.expected.is_finite() {
            continue;
        }
        if best.is_none_or(|current| estimate.expected > current.expected) {
            best = Some(estimate);
        }
    }

    let best = best.ok_or(GameError::NoScorableMove { seat: view.seat() })?;
    if tracing::enabled!(Level::DEBUG) {
        event!(
            target: "hanabi_bot::search",
            Level::DEBUG,
            seat = view.seat(),
            candidates = estimates.len(),
            chosen = %best.mv,
            expected = best.expected,
            samples = best.evaluated,
            "move chosen"
        );
    }
    Ok(best.mv)
}

#[cfg(test)]
mod tests {
    use super::{choose_move, evaluate_depth_zero};
    use crate::bot::beliefs::BeliefState;
    use crate::bot::params::BotParams;
    use hanabi_core::game::{Game, GameError, PrivateView, Silent};
    use hanabi_core::model::deck::Deck;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn depth_zero_weights_lives_and_tokens() {
        let game = Game::new(2, Deck::standard()).unwrap().with_tokens(4);
        let params = BotParams {
            lives_weight: 2.0,
            tokens_weight: 0.25,
            ..BotParams::default()
        };
        let value = evaluate_depth_zero(&PrivateView::new(0, &game), &params);
        assert!((value - 7.0).abs() < 1e-12);
    }

    #[test]
    fn no_move_outside_own_turn() {
        let mut game = Game::new(2, Deck::standard()).unwrap();
        game.discard(0, &mut Silent).unwrap();
        let view = PrivateView::new(0, &game);
        let beliefs = BeliefState::from_view(&view);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            choose_move(&view, &beliefs, &BotParams::default().with_samples(4), &mut rng).unwrap_err(),
            GameError::NoScorableMove { seat: 0 }
        );
    }
}
