mod beliefs;
mod params;
mod search;

pub use beliefs::BeliefState;
pub use params::BotParams;
pub use search::{MoveEstimate, choose_move, estimate_moves, evaluate_depth_zero};

use hanabi_core::belief::OptionTracker;
use hanabi_core::game::{
    Game, GameError, MoveEvent, MoveObserver, Player, PrivateView, notify_player,
};
use hanabi_core::model::moves::Move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::borrow::Borrow;

/// Player that tracks beliefs about its own hand and picks the move with
/// the best sampled depth-zero value.
#[derive(Debug, Clone)]
pub struct BayesianPlayer {
    seat: usize,
    params: BotParams,
    rng: StdRng,
    beliefs: Option<BeliefState>,
}

impl BayesianPlayer {
    pub fn new(seat: usize, params: BotParams) -> Self {
        Self {
            seat,
            rng: StdRng::seed_from_u64(params.seed),
            params,
            beliefs: None,
        }
    }

    /// A player already initialised against `view`, for driving a game by hand.
    pub fn attached<G: Borrow<Game>>(view: &PrivateView<G>, params: BotParams) -> Self {
        let mut player = Self::new(view.seat(), params);
        player.beliefs = Some(BeliefState::from_view(view));
        player
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    pub fn beliefs(&self) -> Option<&BeliefState> {
        self.beliefs.as_ref()
    }

    /// Empty until the player has been initialised.
    pub fn hand_trackers(&self) -> &[OptionTracker] {
        self.beliefs
            .as_ref()
            .map(BeliefState::hand_trackers)
            .unwrap_or(&[])
    }

    pub fn deck_tracker(&self) -> Option<&OptionTracker> {
        self.beliefs.as_ref().map(BeliefState::deck_tracker)
    }

    pub fn evaluate<G: Borrow<Game>>(&self, view: &PrivateView<G>) -> f64 {
        evaluate_depth_zero(view, &self.params)
    }
}

/// Lets a game driven by hand feed this player directly; it still only
/// sees its own seat's view.
impl MoveObserver for BayesianPlayer {
    fn observe_move(&mut self, event: &MoveEvent, game: &Game) {
        notify_player(self, event, game);
    }
}

impl Player for BayesianPlayer {
    fn seat(&self) -> usize {
        self.seat
    }

    fn init(&mut self, view: &PrivateView<&Game>) {
        self.beliefs = Some(BeliefState::from_view(view));
    }

    fn observe(&mut self, event: &MoveEvent, view: &PrivateView<&Game>) {
        if let Some(beliefs) = self.beliefs.as_mut() {
            beliefs.observe(event, view);
        }
    }

    fn take_turn(&mut self, view: &mut PrivateView<&mut Game>) -> Result<Move, GameError> {
        let beliefs = self
            .beliefs
            .get_or_insert_with(|| BeliefState::from_view(view));
        choose_move(view, beliefs, &self.params, &mut self.rng)
    }
}
