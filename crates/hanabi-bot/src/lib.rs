pub mod bot;

pub use bot::{BayesianPlayer, BeliefState, BotParams, MoveEstimate};
