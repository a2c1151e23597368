use serde::{Deserialize, Serialize};

/// Tunable parameters for the sampling player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotParams {
    /// Hidden states drawn per candidate move (default: 100)
    pub samples: usize,

    /// Added per remaining life in a depth-zero evaluation (default: 1.0)
    pub lives_weight: f64,

    /// Added per remaining hint token (default: 1.0)
    pub tokens_weight: f64,

    /// Subtracted when the resulting state can no longer reach 25 (default: 20.0)
    pub unwinnable_penalty: f64,

    /// Seed for the player's private RNG (default: 123)
    pub seed: u64,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            samples: 100,
            lives_weight: 1.0,
            tokens_weight: 1.0,
            unwinnable_penalty: 20.0,
            seed: 123,
        }
    }
}

impl BotParams {
    /// Replaces fields for which `read` yields a parsable value.
    pub fn overlay<F>(mut self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(samples) = read("HANABI_BOT_SAMPLES")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
        {
            self.samples = samples;
        }

        let weight = |raw: String| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        };
        if let Some(value) = read("HANABI_BOT_LIVES_WEIGHT").and_then(weight) {
            self.lives_weight = value;
        }
        if let Some(value) = read("HANABI_BOT_TOKENS_WEIGHT").and_then(weight) {
            self.tokens_weight = value;
        }
        if let Some(value) = read("HANABI_BOT_UNWINNABLE_PENALTY").and_then(weight) {
            self.unwinnable_penalty = value;
        }

        if let Some(seed) = read("HANABI_BOT_SEED").and_then(|raw| raw.trim().parse::<u64>().ok()) {
            self.seed = seed;
        }

        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }
}
