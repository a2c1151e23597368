//! Belief tracking over a player's hidden cards.
//!
//! - `tracker`: per-slot face counts and their update operations.
//! - `sampler`: draws concrete hidden states consistent with the trackers.

mod sampler;
mod tracker;

pub use sampler::{HiddenState, HiddenStateSampler, SamplingError};
pub use tracker::OptionTracker;
